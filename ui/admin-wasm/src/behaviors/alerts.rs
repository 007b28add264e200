//! Flash messages dismiss themselves after a delay.

use super::bootstrap;
use gloo_timers::callback::Timeout;
use pm_ui_types::AlertOptions;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

pub fn enhance(alert: &Element, opts: &AlertOptions) {
    let alert = alert.clone();
    let opts = opts.clone();
    Timeout::new(opts.delay_ms, move || dismiss(&alert, &opts)).forget();
}

/// Prefer the alert's own close button so Bootstrap's fade runs; without
/// one, close through `bootstrap.Alert`, and without Bootstrap just remove it.
fn dismiss(alert: &Element, opts: &AlertOptions) {
    if !alert.is_connected() {
        return;
    }
    let close = alert
        .query_selector(&opts.close_selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    if let Some(close) = close {
        close.click();
        return;
    }
    match bootstrap::construct("Alert", alert) {
        Some(instance) if bootstrap::call(&instance, "close") => {}
        _ => alert.remove(),
    }
}
