//! Event binding.
//!
//! Listeners live for the whole page, so every closure is leaked with
//! `Closure::forget` once attached.

use crate::console;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

/// Attach `handler` to `event` on `target`.
pub fn on<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        console::warn(&format!("failed to bind {event} listener: {e:?}"));
    }
    cb.forget();
}

pub fn on_click<F>(target: &EventTarget, handler: F)
where
    F: FnMut(Event) + 'static,
{
    on(target, "click", handler);
}

pub fn on_change<F>(target: &EventTarget, handler: F)
where
    F: FnMut(Event) + 'static,
{
    on(target, "change", handler);
}
