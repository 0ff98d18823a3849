use std::cell::RefCell;
use std::rc::Weak;

use chatterbox::PendingReply;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::WidgetSession;

/// Arms a one-shot `setTimeout` that hands `pending` back to the session.
///
/// The timer holds a weak reference: a widget freed from JavaScript before
/// the timer fires simply drops the reply.
pub fn schedule_reply(
    window: &Window,
    session: Weak<RefCell<WidgetSession>>,
    pending: PendingReply,
) {
    let delay_ms = i32::try_from(pending.delay().as_millis()).unwrap_or(i32::MAX);
    let callback = Closure::once_into_js(move || {
        let Some(session) = session.upgrade() else {
            log::debug!("widget dropped before reply {} fired", pending.placeholder());
            return;
        };
        session.borrow_mut().deliver_reply(pending);
    });

    if let Err(error) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref::<js_sys::Function>(),
            delay_ms,
        )
    {
        log::warn!("failed to schedule bot reply: {error:?}");
    }
}
