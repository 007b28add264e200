//! Interop with the page's global `bootstrap` object, when one is loaded.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// `new bootstrap[component](el)`, or `None` when Bootstrap is absent.
pub fn construct(component: &str, el: &Element) -> Option<JsValue> {
    let bootstrap = Reflect::get(&js_sys::global(), &JsValue::from_str("bootstrap")).ok()?;
    if bootstrap.is_undefined() || bootstrap.is_null() {
        return None;
    }
    let ctor = Reflect::get(&bootstrap, &JsValue::from_str(component))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Reflect::construct(&ctor, &Array::of1(el)).ok()
}

/// Call a zero-argument method on a component instance.
pub fn call(instance: &JsValue, method: &str) -> bool {
    Reflect::get(instance, &JsValue::from_str(method))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .is_some_and(|f| f.call0(instance).is_ok())
}
