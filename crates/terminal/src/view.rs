use std::io::Write;

use chatterbox::chat::{ChatView, ListItem};

/// Line-oriented chat view.
///
/// A terminal cannot take rows back, so removing a typing row and clearing
/// print a marker instead.
pub struct TerminalView<W> {
    out: W,
}

impl<W> TerminalView<W>
where
    W: Write,
{
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn notice(&mut self, text: &str) {
        self.write_line(text);
    }

    fn write_line(&mut self, line: &str) {
        if let Err(error) = writeln!(self.out, "{line}") {
            tracing::warn!("failed to write to terminal: {error}");
        }
    }
}

impl<W> ChatView for TerminalView<W>
where
    W: Write,
{
    fn append_item(&mut self, item: &ListItem) {
        let line = if item.typing {
            format!("  [{}] {}", item.meta, item.text)
        } else {
            format!("[{}] {}", item.meta, item.text)
        };
        self.write_line(&line);
    }

    fn remove_item(&mut self, id: &str) {
        tracing::trace!(id, "typing row replaced");
    }

    fn clear_items(&mut self) {
        self.write_line("-- conversation cleared --");
    }

    fn scroll_to_latest(&mut self) {
        if let Err(error) = self.out.flush() {
            tracing::warn!("failed to flush terminal: {error}");
        }
    }

    fn set_status(&mut self, status: &str) {
        self.write_line(&format!("({status})"));
    }

    fn reset_input(&mut self) {}

    fn focus_input(&mut self) {
        self.scroll_to_latest();
    }
}
