use std::cell::RefCell;
use std::rc::Rc;

use chatterbox::{ChatEvent, ChatSession, ChatSettings};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, Window};

pub mod clock;
pub mod dom;
pub mod local_storage;
pub mod timer;

use dom::{CLEAR_BUTTON_ID, DomView, FORM_ID, PERSIST_BUTTON_ID, element_by_id};
use local_storage::LocalStorage;

pub type WidgetSession = ChatSession<LocalStorage, DomView, StdRng>;

/// Initialize WASM module
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Chatter-Box WASM module initialized");
}

/// An event listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// Chat widget bound to the page's form, buttons and message list.
#[wasm_bindgen]
pub struct ChatWidget {
    session: Rc<RefCell<WidgetSession>>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ChatWidget {
    /// Mounts the widget and shows stored history or the greeting.
    ///
    /// `settings` is an optional object with any of the `ChatSettings` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<ChatWidget, JsValue> {
        let settings: ChatSettings = if settings.is_undefined() || settings.is_null() {
            ChatSettings::default()
        } else {
            serde_wasm_bindgen::from_value(settings)?
        };
        let settings = settings.normalized();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        let view = DomView::mount(&document)?;
        let store = LocalStorage::open(&window);
        let mut session = ChatSession::new(store, view, StdRng::from_entropy(), &settings)
            .with_time_format(clock::locale_time);
        session.bootstrap();
        let session = Rc::new(RefCell::new(session));

        let listeners = vec![
            Listener::attach(
                element_by_id(&document, FORM_ID)?.into(),
                "submit",
                submit_handler(window.clone(), Rc::clone(&session)),
            )?,
            Listener::attach(
                element_by_id(&document, CLEAR_BUTTON_ID)?.into(),
                "click",
                event_handler(Rc::clone(&session), ChatEvent::Clear),
            )?,
            Listener::attach(
                element_by_id(&document, PERSIST_BUTTON_ID)?.into(),
                "click",
                event_handler(Rc::clone(&session), ChatEvent::TogglePersistence),
            )?,
        ];

        log::info!(
            "chat widget mounted (persistence {})",
            if settings.persistence_enabled { "on" } else { "off" }
        );
        Ok(Self {
            session,
            _listeners: listeners,
        })
    }

    /// Sends `text` as if it had been typed into the form.
    pub fn send(&self, text: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let pending = self.session.borrow_mut().handle(ChatEvent::submit(text));
        if let Some(pending) = pending {
            timer::schedule_reply(&window, Rc::downgrade(&self.session), pending);
        }
        Ok(())
    }

    pub fn clear(&self) {
        self.session.borrow_mut().handle(ChatEvent::Clear);
    }

    /// Flips persistence and returns the new state.
    #[wasm_bindgen(js_name = togglePersistence)]
    pub fn toggle_persistence(&self) -> bool {
        self.session.borrow_mut().toggle_persistence()
    }

    #[wasm_bindgen(getter, js_name = persistenceEnabled)]
    pub fn persistence_enabled(&self) -> bool {
        self.session.borrow().persistence_enabled()
    }
}

fn submit_handler(
    window: Window,
    session: Rc<RefCell<WidgetSession>>,
) -> impl FnMut(Event) + 'static {
    move |event: Event| {
        event.prevent_default();
        let input = session.borrow().view().input_value();
        let pending = session.borrow_mut().handle(ChatEvent::Submit(input));
        if let Some(pending) = pending {
            timer::schedule_reply(&window, Rc::downgrade(&session), pending);
        }
    }
}

fn event_handler(
    session: Rc<RefCell<WidgetSession>>,
    event: ChatEvent,
) -> impl FnMut(Event) + 'static {
    move |_: Event| {
        session.borrow_mut().handle(event.clone());
    }
}
