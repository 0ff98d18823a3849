use chatterbox_storage::{Author, KeyValueStore, Message, MessageId, MessageLog, now_millis};
use rand::Rng;

use crate::chat::events::{ChatEvent, persistence_status};
use crate::chat::render::{Renderer, TimeFormat};
use crate::chat::simulator::{PendingReply, ReplyEpoch, ReplySimulator};
use crate::chat::transcript::Transcript;
use crate::chat::view::ChatView;
use crate::settings::ChatSettings;

/// Single owner of all chat state: view, stored log, persistence flag and
/// reply bookkeeping.
///
/// The session never sleeps. [`submit`](Self::submit) hands back a
/// [`PendingReply`]; the host waits `delay` and passes it to
/// [`deliver_reply`](Self::deliver_reply).
#[derive(Debug)]
pub struct ChatSession<S, V, R> {
    transcript: Transcript<S, V>,
    simulator: ReplySimulator<R>,
    epoch: ReplyEpoch,
    greeting: String,
    typing_text: String,
}

impl<S, V, R> ChatSession<S, V, R>
where
    S: KeyValueStore,
    V: ChatView,
    R: Rng,
{
    pub fn new(store: S, view: V, rng: R, settings: &ChatSettings) -> Self {
        let log = MessageLog::new(
            store,
            settings.storage_key.clone(),
            settings.persistence_enabled,
        );
        let renderer = Renderer::new(settings.user_label.clone(), settings.bot_label.clone());

        Self {
            transcript: Transcript::new(log, view, renderer),
            simulator: ReplySimulator::new(rng, settings.delay_policy()),
            epoch: ReplyEpoch::default(),
            greeting: settings.greeting.clone(),
            typing_text: settings.typing_text.clone(),
        }
    }

    /// Replaces the `HH:MM` clock on message rows, e.g. with a
    /// locale-aware formatter. Call before [`bootstrap`](Self::bootstrap).
    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.transcript.set_time_format(time_format);
        self
    }

    pub fn transcript(&self) -> &Transcript<S, V> {
        &self.transcript
    }

    pub fn view(&self) -> &V {
        self.transcript.view()
    }

    pub fn view_mut(&mut self) -> &mut V {
        self.transcript.view_mut()
    }

    pub fn store(&self) -> &S {
        self.transcript.log().store()
    }

    pub fn persistence_enabled(&self) -> bool {
        self.transcript.log().is_enabled()
    }

    pub fn epoch(&self) -> ReplyEpoch {
        self.epoch
    }

    /// Shows the stored history, or the greeting when there is none.
    pub fn bootstrap(&mut self) {
        let stored = self.transcript.log().load();
        if stored.is_empty() {
            tracing::debug!("no stored history; showing greeting");
            let greeting = Message::new(
                MessageId::greeting(),
                Author::Bot,
                self.greeting.clone(),
                now_millis(),
            );
            self.transcript.append(greeting);
        } else {
            tracing::debug!(count = stored.len(), "restoring stored history");
            self.transcript.show_history(stored);
        }

        self.refresh_status();
    }

    /// Dispatches one UI event. Only submissions can yield a pending reply.
    pub fn handle(&mut self, event: ChatEvent) -> Option<PendingReply> {
        match event {
            ChatEvent::Submit(input) => self.submit(&input),
            ChatEvent::Clear => {
                self.clear();
                None
            }
            ChatEvent::TogglePersistence => {
                self.toggle_persistence();
                None
            }
        }
    }

    /// Sends the trimmed input as a user message and starts a reply.
    ///
    /// Blank input is ignored and leaves the input field untouched.
    pub fn submit(&mut self, input: &str) -> Option<PendingReply> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.append(Message::user(text));
        let pending = self.simulator.schedule(text, self.epoch);
        self.transcript
            .show_placeholder(pending.placeholder(), &self.typing_text);
        tracing::debug!(
            placeholder = %pending.placeholder(),
            delay_ms = pending.delay().as_millis() as u64,
            "scheduled bot reply"
        );

        let view = self.transcript.view_mut();
        view.reset_input();
        view.focus_input();
        Some(pending)
    }

    /// Replaces a placeholder with its generated reply.
    ///
    /// Returns `false` when a clear happened after the reply was scheduled;
    /// such replies are dropped.
    pub fn deliver_reply(&mut self, pending: PendingReply) -> bool {
        if pending.epoch() != self.epoch {
            tracing::debug!(
                placeholder = %pending.placeholder(),
                "dropping reply scheduled before the last clear"
            );
            return false;
        }

        self.transcript.remove_placeholder(pending.placeholder());
        let reply = self.simulator.compose(&pending);
        self.transcript.append(reply);
        true
    }

    /// Empties the conversation and invalidates pending replies.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.epoch = self.epoch.next();
        self.transcript.view_mut().focus_input();
    }

    /// Flips persistence. Turning it on re-syncs storage from the view;
    /// turning it off leaves stored data alone.
    pub fn toggle_persistence(&mut self) -> bool {
        let enabled = !self.persistence_enabled();
        self.transcript.log_mut().set_enabled(enabled);
        self.refresh_status();

        if enabled {
            self.transcript.resync_storage();
        }

        tracing::debug!(enabled, "persistence toggled");
        enabled
    }

    fn refresh_status(&mut self) {
        let status = persistence_status(self.persistence_enabled());
        self.transcript.view_mut().set_status(status);
    }
}

#[cfg(test)]
mod tests {
    use chatterbox_storage::{DEFAULT_STORAGE_KEY, MemoryStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::chat::simulator::EMPTY_INPUT_REPLY;
    use crate::chat::view::recording::RecordingView;
    use crate::settings::DEFAULT_GREETING;

    type TestSession = ChatSession<MemoryStore, RecordingView, StdRng>;

    fn session_with(store: MemoryStore) -> TestSession {
        ChatSession::new(
            store,
            RecordingView::default(),
            StdRng::seed_from_u64(11),
            &ChatSettings::default(),
        )
    }

    fn started(store: MemoryStore) -> TestSession {
        let mut session = session_with(store);
        session.bootstrap();
        session
    }

    fn stored(session: &TestSession) -> Vec<Message> {
        let raw = session.store().raw(DEFAULT_STORAGE_KEY).unwrap_or("[]");
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn fresh_session_greets_and_persists_the_greeting() {
        let session = started(MemoryStore::new());

        assert_eq!(session.view().texts(), vec![DEFAULT_GREETING]);
        assert_eq!(session.view().status, "Persistence: on");

        let log = stored(&session);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id(), &MessageId::greeting());
        assert_eq!(log[0].who(), Author::Bot);
    }

    #[test]
    fn stored_history_is_rendered_in_order_without_greeting() {
        let history = vec![
            Message::new(MessageId::new("m_1"), Author::User, "first", 1),
            Message::new(MessageId::new("m_2"), Author::Bot, "second", 2),
        ];
        let store = MemoryStore::with_entry(
            DEFAULT_STORAGE_KEY,
            serde_json::to_string(&history).unwrap(),
        );

        let session = started(store);

        assert_eq!(session.view().texts(), vec!["first", "second"]);
        assert_eq!(stored(&session), history);
    }

    #[test]
    fn malformed_storage_falls_back_to_greeting() {
        let session = started(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "{oops"));

        assert_eq!(session.view().texts(), vec![DEFAULT_GREETING]);
        assert_eq!(stored(&session).len(), 1);
    }

    #[test]
    fn submit_renders_user_message_then_one_reply() {
        let mut session = started(MemoryStore::new());

        let pending = session.submit("  hello  ").unwrap();

        assert_eq!(session.view().texts(), vec![DEFAULT_GREETING, "hello", "Typing…"]);
        assert_eq!(session.view().typing_rows(), 1);
        assert_eq!(session.view().input_resets, 1);
        assert_eq!(pending.delay().as_millis(), 825);
        assert_eq!(stored(&session).len(), 2);

        assert!(session.deliver_reply(pending));

        let view = session.view();
        assert_eq!(view.typing_rows(), 0);
        assert_eq!(view.items.len(), 3);
        let reply = &view.items[2];
        assert_eq!(reply.who, Author::Bot);
        assert!(reply.text.contains("hello"));
        assert_ne!(reply.text, EMPTY_INPUT_REPLY);

        let log = stored(&session);
        assert_eq!(log.len(), 3);
        assert_eq!(log[2].who(), Author::Bot);
    }

    #[test]
    fn blank_submissions_are_ignored() {
        let mut session = started(MemoryStore::new());

        assert!(session.submit("   ").is_none());
        assert!(session.handle(ChatEvent::submit("")).is_none());

        assert_eq!(session.view().items.len(), 1);
        assert_eq!(session.view().input_resets, 0);
    }

    #[test]
    fn overlapping_replies_each_land_once() {
        let mut session = started(MemoryStore::new());

        let first = session.submit("one").unwrap();
        let second = session.submit("two").unwrap();
        assert_eq!(session.view().typing_rows(), 2);

        assert!(session.deliver_reply(second));
        assert!(session.deliver_reply(first));

        assert_eq!(session.view().typing_rows(), 0);
        assert_eq!(session.transcript().messages().len(), 5);
        assert_eq!(stored(&session).len(), 5);
    }

    #[test]
    fn replies_scheduled_before_a_clear_are_dropped() {
        let mut session = started(MemoryStore::new());
        let pending = session.submit("hello").unwrap();

        session.handle(ChatEvent::Clear);
        assert_eq!(session.epoch(), pending.epoch().next());

        assert!(!session.deliver_reply(pending));
        assert!(session.view().items.is_empty());
        assert_eq!(session.store().raw(DEFAULT_STORAGE_KEY), None);
        assert_eq!(session.view().focus_requests, 2);
    }

    #[test]
    fn toggle_off_send_toggle_on_resyncs_from_view() {
        let old_history = vec![Message::new(
            MessageId::greeting(),
            Author::Bot,
            "Welcome back",
            1_000,
        )];
        let mut session = started(MemoryStore::with_entry(
            DEFAULT_STORAGE_KEY,
            serde_json::to_string(&old_history).unwrap(),
        ));

        assert!(!session.toggle_persistence());
        assert_eq!(session.view().status, "Persistence: off");

        let pending = session.submit("hi").unwrap();
        assert!(session.deliver_reply(pending));
        // Nothing new was written while persistence was off.
        assert_eq!(stored(&session), old_history);

        let before_toggle = now_millis();
        assert!(session.handle(ChatEvent::TogglePersistence).is_none());
        assert_eq!(session.view().status, "Persistence: on");

        let log = stored(&session);
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].text(), "Welcome back");
        assert_eq!(log[1].text(), "hi");
        assert_eq!(log[1].who(), Author::User);
        assert_eq!(log[2].who(), Author::Bot);
        assert!(log.iter().all(|message| message.timestamp_millis() >= before_toggle));
    }

    #[test]
    fn reply_landing_while_persistence_is_off_is_only_rendered() {
        let mut session = started(MemoryStore::new());
        let pending = session.submit("hello").unwrap();

        session.toggle_persistence();
        assert!(session.deliver_reply(pending));

        assert_eq!(session.transcript().messages().len(), 3);
        assert_eq!(stored(&session).len(), 2);
    }

    #[test]
    fn clearing_while_persistence_is_off_keeps_the_stored_log() {
        let history = vec![Message::new(
            MessageId::new("m_1"),
            Author::User,
            "keep me",
            1_000,
        )];
        let mut session = started(MemoryStore::with_entry(
            DEFAULT_STORAGE_KEY,
            serde_json::to_string(&history).unwrap(),
        ));

        session.toggle_persistence();
        session.clear();

        assert!(session.view().items.is_empty());
        assert!(session.transcript().messages().is_empty());
        assert_eq!(stored(&session), history);

        // Turning persistence back on syncs the now empty view.
        session.toggle_persistence();
        assert!(stored(&session).is_empty());
    }

    #[test]
    fn custom_time_format_is_used_for_every_row() {
        let mut session =
            session_with(MemoryStore::new()).with_time_format(|_| "9:30 PM".to_string());
        session.bootstrap();
        session.submit("hello").unwrap();

        let view = session.view();
        assert_eq!(view.items[0].meta, "Chatter-Box • 9:30 PM");
        assert_eq!(view.items[1].meta, "You • 9:30 PM");
        assert_eq!(view.items[2].meta, "Chatter-Box • 9:30 PM");
    }

    #[test]
    fn disabled_persistence_at_startup_still_greets() {
        let settings = ChatSettings {
            persistence_enabled: false,
            ..ChatSettings::default()
        };
        let mut session = ChatSession::new(
            MemoryStore::new(),
            RecordingView::default(),
            StdRng::seed_from_u64(3),
            &settings,
        );

        session.bootstrap();

        assert_eq!(session.view().texts(), vec![DEFAULT_GREETING]);
        assert_eq!(session.view().status, "Persistence: off");
        assert!(session.store().is_empty());
    }
}
