//! Browser adapters for the fulcrum-core ports.
//!
//! Everything here touches `window`; the core never does.

pub mod api;
pub mod router;
pub mod storage;

use wasm_bindgen::JsValue;

/// Render a thrown JS value as a readable message.
pub(crate) fn js_error(value: JsValue) -> String {
    match gloo_utils::errors::JsError::try_from(value) {
        Ok(err) => err.to_string(),
        Err(not_error) => not_error.to_string(),
    }
}
