use chatterbox_storage::{KeyValueStore, Message, MessageLog, now_millis};

use crate::chat::render::{Renderer, TimeFormat};
use crate::chat::simulator::PlaceholderId;
use crate::chat::view::ChatView;

/// Rendered conversation plus its persisted copy.
///
/// `messages` mirrors the rows on screen in display order, typing
/// placeholders excluded.
#[derive(Debug)]
pub struct Transcript<S, V> {
    log: MessageLog<S>,
    view: V,
    renderer: Renderer,
    messages: Vec<Message>,
}

impl<S, V> Transcript<S, V>
where
    S: KeyValueStore,
    V: ChatView,
{
    pub fn new(log: MessageLog<S>, view: V, renderer: Renderer) -> Self {
        Self {
            log,
            view,
            renderer,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn log(&self) -> &MessageLog<S> {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLog<S> {
        &mut self.log
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn set_time_format(&mut self, time_format: TimeFormat) {
        self.renderer.set_time_format(time_format);
    }

    /// Renders a message and, when persistence is on, appends it to the log.
    pub fn append(&mut self, message: Message) {
        self.render(message.clone());
        self.log.append(&message);
    }

    /// Replaces whatever is on screen with `messages`, without persisting.
    pub fn show_history(&mut self, messages: Vec<Message>) {
        self.view.clear_items();
        self.messages.clear();
        for message in messages {
            self.render(message);
        }
    }

    pub fn show_placeholder(&mut self, id: PlaceholderId, text: &str) {
        let item = self.renderer.render_placeholder(id, text, now_millis());
        self.view.append_item(&item);
        self.view.scroll_to_latest();
    }

    pub fn remove_placeholder(&mut self, id: PlaceholderId) {
        self.view.remove_item(&id.to_string());
    }

    /// Rebuilds the message list from what is on screen.
    ///
    /// Every entry is stamped with the current time; the original send
    /// times are not kept.
    pub fn get_all_from_view(&self) -> Vec<Message> {
        let now = now_millis();
        self.messages
            .iter()
            .map(|message| message.restamped(now))
            .collect()
    }

    /// Overwrites the stored log with the on-screen conversation.
    pub fn resync_storage(&mut self) {
        let messages = self.get_all_from_view();
        tracing::debug!(count = messages.len(), "re-syncing message log from view");
        self.log.save(&messages);
    }

    /// Empties the view, and the stored log when persistence is on.
    pub fn clear(&mut self) {
        self.view.clear_items();
        self.messages.clear();
        self.log.clear();
    }

    fn render(&mut self, message: Message) {
        let item = self.renderer.render(&message);
        self.view.append_item(&item);
        self.view.scroll_to_latest();
        self.messages.push(message);
    }
}
