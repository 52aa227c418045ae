//! `web-sys` implementations of the session manager's host capabilities

mod document;
mod page;
mod scheduler;
mod storage;

pub use document::BrowserDocument;
pub use page::BrowserPage;
pub use scheduler::BrowserScheduler;
pub use storage::BrowserStore;

use portal_auth_core::Error;
use wasm_bindgen::JsValue;

/// Describe a thrown JS value
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

pub(crate) fn dom_error(context: &str, value: JsValue) -> Error {
    Error::dom(format!("{context}: {}", describe(&value)))
}
