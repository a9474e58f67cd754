//! Fulcrum App — WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles all platform adapters and hands them to the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use fulcrum_types::config::ClientConfig;

const CANVAS_ID: &str = "fulcrum_canvas";

/// WASM entry point
#[wasm_bindgen(start)]
pub async fn main() -> Result<(), JsValue> {
    // Initialize logging
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Fulcrum WASM starting...");

    // Token, store and route are settled before the first frame
    let config = ClientConfig::default();
    let services = app::Services::bootstrap(&config).await;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("No canvas element with id 'fulcrum_canvas'"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Element is not a canvas"))?;

    let web_options = eframe::WebOptions::default();
    eframe::WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(|cc| Ok(Box::new(app::FulcrumApp::new(cc, services)))),
        )
        .await
        .inspect_err(|e| log::error!("Failed to start eframe: {:?}", e))
}
