use std::collections::HashMap;

use chatterbox::chat::{ChatView, ListItem};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

pub const FORM_ID: &str = "chatForm";
pub const INPUT_ID: &str = "messageInput";
pub const LIST_ID: &str = "messages";
pub const CLEAR_BUTTON_ID: &str = "clearBtn";
pub const PERSIST_BUTTON_ID: &str = "persistBtn";
pub const STATUS_ID: &str = "persistState";

pub fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{id} not found")))
}

/// Chat view over the page's `<ul id="messages">`, status line and input.
pub struct DomView {
    document: Document,
    list: Element,
    input: HtmlInputElement,
    status: Element,
    // Typing rows by id, so removal never goes through a selector.
    placeholders: HashMap<String, Element>,
}

impl DomView {
    pub fn mount(document: &Document) -> Result<Self, JsValue> {
        let input = element_by_id(document, INPUT_ID)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| JsValue::from_str(&format!("#{INPUT_ID} is not an <input>")))?;

        Ok(Self {
            document: document.clone(),
            list: element_by_id(document, LIST_ID)?,
            input,
            status: element_by_id(document, STATUS_ID)?,
            placeholders: HashMap::new(),
        })
    }

    pub fn input_value(&self) -> String {
        self.input.value()
    }

    fn try_append(&mut self, item: &ListItem) -> Result<(), JsValue> {
        let row = self.document.create_element("li")?;
        row.set_class_name(item.class_name());
        row.set_attribute("data-id", &item.id)?;
        row.set_inner_html(&item.inner_html());
        self.list.append_child(&row)?;

        if item.typing {
            self.placeholders.insert(item.id.clone(), row);
        }
        Ok(())
    }
}

impl ChatView for DomView {
    fn append_item(&mut self, item: &ListItem) {
        if let Err(error) = self.try_append(item) {
            log::warn!("failed to append message row {}: {error:?}", item.id);
        }
    }

    fn remove_item(&mut self, id: &str) {
        if let Some(row) = self.placeholders.remove(id) {
            row.remove();
        }
    }

    fn clear_items(&mut self) {
        self.list.set_inner_html("");
        self.placeholders.clear();
    }

    fn scroll_to_latest(&mut self) {
        self.list.set_scroll_top(self.list.scroll_height());
    }

    fn set_status(&mut self, status: &str) {
        self.status.set_text_content(Some(status));
    }

    fn reset_input(&mut self) {
        self.input.set_value("");
    }

    fn focus_input(&mut self) {
        if let Err(error) = self.input.focus() {
            log::debug!("failed to focus message input: {error:?}");
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
pub(crate) mod tests {
    use chatterbox::chat::{PlaceholderId, Renderer};
    use chatterbox::storage::Message;
    use wasm_bindgen_test::*;

    use super::*;

    /// Replaces the page body with the widget's markup.
    pub(crate) fn widget_page() -> Document {
        let document = web_sys::window().unwrap().document().unwrap();
        document.body().unwrap().set_inner_html(
            r#"<ul id="messages"></ul>
            <form id="chatForm"><input id="messageInput"></form>
            <button id="clearBtn"></button>
            <button id="persistBtn"></button>
            <span id="persistState"></span>"#,
        );
        document
    }

    #[wasm_bindgen_test]
    fn typing_rows_are_removed_by_id() {
        let document = widget_page();
        let mut view = DomView::mount(&document).unwrap();
        let renderer = Renderer::new("You", "Chatter-Box");
        let list = element_by_id(&document, LIST_ID).unwrap();

        view.append_item(&renderer.render(&Message::user("<b>hi</b>")));
        view.append_item(&renderer.render_placeholder(PlaceholderId::new(0), "Typing…", 0));
        assert_eq!(list.child_element_count(), 2);

        view.remove_item("t_0");
        // Unknown ids and message rows are left alone.
        view.remove_item("t_9");

        assert_eq!(list.child_element_count(), 1);
        let row = list.first_element_child().unwrap();
        assert_eq!(row.class_name(), "message user");
        assert!(row.inner_html().contains("&lt;b&gt;hi&lt;/b&gt;"));

        view.clear_items();
        assert_eq!(list.child_element_count(), 0);
    }

    #[wasm_bindgen_test]
    fn status_and_input_are_updated_in_place() {
        let document = widget_page();
        let mut view = DomView::mount(&document).unwrap();
        let input = element_by_id(&document, INPUT_ID)
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap();
        input.set_value("draft");

        assert_eq!(view.input_value(), "draft");
        view.reset_input();
        view.set_status("Persistence: off");

        assert_eq!(input.value(), "");
        assert_eq!(
            element_by_id(&document, STATUS_ID).unwrap().text_content().as_deref(),
            Some("Persistence: off")
        );
    }

    #[wasm_bindgen_test]
    fn mounting_without_the_list_fails() {
        let document = widget_page();
        element_by_id(&document, LIST_ID).unwrap().remove();

        assert!(DomView::mount(&document).is_err());
    }
}
