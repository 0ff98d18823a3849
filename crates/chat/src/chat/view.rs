use crate::chat::render::ListItem;

/// The UI surface a session drives: a scrollable list, a status line and an
/// input field.
pub trait ChatView {
    fn append_item(&mut self, item: &ListItem);
    /// Removes one row; only ever called for typing placeholders.
    fn remove_item(&mut self, id: &str);
    fn clear_items(&mut self);
    fn scroll_to_latest(&mut self);
    fn set_status(&mut self, status: &str);
    fn reset_input(&mut self);
    fn focus_input(&mut self);
}

impl<T> ChatView for Box<T>
where
    T: ChatView + ?Sized,
{
    fn append_item(&mut self, item: &ListItem) {
        (**self).append_item(item);
    }

    fn remove_item(&mut self, id: &str) {
        (**self).remove_item(id);
    }

    fn clear_items(&mut self) {
        (**self).clear_items();
    }

    fn scroll_to_latest(&mut self) {
        (**self).scroll_to_latest();
    }

    fn set_status(&mut self, status: &str) {
        (**self).set_status(status);
    }

    fn reset_input(&mut self) {
        (**self).reset_input();
    }

    fn focus_input(&mut self) {
        (**self).focus_input();
    }
}
