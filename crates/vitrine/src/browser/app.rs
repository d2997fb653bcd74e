//! WASM entry point.

use wasm_bindgen::prelude::*;
use web_sys::{window, Document};

/// Install the panic hook and route `tracing` output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if tracing_wasm::try_set_as_global_default().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Log to browser console.
#[wasm_bindgen]
pub fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub(crate) fn document() -> Result<Document, JsValue> {
    Ok(window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?)
}
