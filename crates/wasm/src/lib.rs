//! Browser host: binds the swimlane core to the page's DOM.
//!
//! Expects `#scenario` (a `<select>`), `#currentScenario` (status label), and
//! `#diagram` (the container the SVG is written into).

mod fetch;
mod page;

use swimlane_core::loader::parse_dataset;
use swimlane_core::svg::render_svg;
use swimlane_core::views::{Diagram, render_swimlane};
use swimlane_core::{CollapseState, LayoutConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let doc = document.clone();
        let on_ready = Closure::once_into_js(move || {
            if let Err(e) = page::mount(&doc) {
                web_sys::console::error_1(&e);
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        Ok(())
    } else {
        page::mount(&document)
    }
}

fn render_default(data: &[u8]) -> Result<Diagram, JsError> {
    let dataset = parse_dataset(data).map_err(|e| JsError::new(&e.to_string()))?;
    let collapse = CollapseState::for_lanes(dataset.lane_names());
    Ok(render_swimlane(&dataset, &collapse, &LayoutConfig::default()))
}

/// Render a dataset document (JSON bytes) to a standalone SVG string.
#[wasm_bindgen]
pub fn render_svg_from_json(data: &[u8]) -> Result<String, JsError> {
    let diagram = render_default(data)?;
    Ok(render_svg(&diagram.commands, diagram.width, diagram.height))
}

/// Render a dataset document (JSON bytes), returning render commands as JSON.
#[wasm_bindgen]
pub fn render_commands_json(data: &[u8]) -> Result<String, JsError> {
    let diagram = render_default(data)?;
    serde_json::to_string(&diagram.commands).map_err(|e| JsError::new(&e.to_string()))
}
