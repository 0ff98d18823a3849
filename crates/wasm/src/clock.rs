use js_sys::{Array, Date, Intl, Object, Reflect};
use wasm_bindgen::JsValue;

/// Browser-locale `hour:minute`, e.g. `09:30 PM` in en-US or `21:30` in de-DE.
///
/// Falls back to the session's `HH:MM` when `Intl` refuses to format.
pub fn locale_time(ts: i64) -> String {
    let options = Object::new();
    for field in ["hour", "minute"] {
        if let Err(error) = Reflect::set(&options, &field.into(), &"2-digit".into()) {
            log::debug!("failed to set time format option {field}: {error:?}");
        }
    }

    let format = Intl::DateTimeFormat::new(&Array::new(), &options).format();
    let date = Date::new(&JsValue::from_f64(ts as f64));

    format
        .call1(&JsValue::UNDEFINED, &date)
        .ok()
        .and_then(|formatted| formatted.as_string())
        .unwrap_or_else(|| chatterbox::chat::format_time(ts))
}
