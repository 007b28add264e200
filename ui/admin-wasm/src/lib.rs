//! PC Maker admin panel WASM frontend
//!
//! Enhances the server-rendered admin pages: repeatable form fields,
//! dropdowns, confirmation prompts, auto-hiding alerts, file inputs and
//! currency formatting. Each concern lives in its own module.

pub mod behaviors;
pub mod config;
pub mod console;
pub mod dom;
pub mod events;
pub mod fields;
pub mod logging;
pub mod state;

use pm_ui_types::Behavior;
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub use fields::{add_form_field, remove_form_field, renumber_form_fields};

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    init()
}

fn init() -> Result<(), JsValue> {
    // Inline onclick handlers may fire before the page is fully parsed
    fields::install_globals()?;

    let document = dom::document();
    if document.ready_state() == "loading" {
        events::on(&document, "DOMContentLoaded", |_| enhance_page());
    } else {
        enhance_page();
    }
    Ok(())
}

fn enhance_page() {
    state::set_config(config::load());
    behaviors::enhance_page(&state::config());
    console::debug("admin UI ready");
}

/// Attach one behavior to an element inserted after page load, e.g.
/// `enhance(el, { kind: "money-format" })`. Omitted options take their
/// defaults.
#[wasm_bindgen]
pub fn enhance(element: JsValue, behavior: JsValue) -> Result<(), JsValue> {
    let element = element
        .dyn_into::<Element>()
        .map_err(|_| JsValue::from_str("enhance: first argument must be an element"))?;
    let behavior: Behavior = serde_wasm_bindgen::from_value(behavior)?;
    behaviors::enhance(&element, &behavior);
    Ok(())
}
