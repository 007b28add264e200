//! Repeatable form fields on the live DOM.
//!
//! `DomHost` implements [`FieldHost`] over `web_sys`, so the add / remove
//! rules are the same ones exercised against `pm_fields::MemoryTree`.
//! The exported functions are also installed on `window` for inline
//! `onclick="addFormField('items', 'item-tpl')"` handlers.

use crate::dom;
use crate::state;
use pm_fields::{FieldHost, FieldManager, FieldRules};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DocumentFragment, Element, HtmlTemplateElement};

pub struct DomHost;

fn js_err(e: JsValue) -> String {
    format!("{:?}", e)
}

impl FieldHost for DomHost {
    type Node = Element;
    type Fragment = DocumentFragment;
    type Error = String;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        dom::by_id(id)
    }

    fn instantiate(&mut self, template: &Element) -> Result<Option<DocumentFragment>, String> {
        let Some(template) = template.dyn_ref::<HtmlTemplateElement>() else {
            return Ok(None);
        };
        let copy = template.content().clone_node_with_deep(true).map_err(js_err)?;
        copy.dyn_into::<DocumentFragment>()
            .map(Some)
            .map_err(|_| "template clone is not a fragment".to_string())
    }

    fn children(&self, container: &Element) -> Vec<Element> {
        let children = container.children();
        (0..children.length()).filter_map(|i| children.item(i)).collect()
    }

    fn child_count(&self, container: &Element) -> usize {
        container.child_element_count() as usize
    }

    fn fragment_fields(&self, fragment: &DocumentFragment, rules: &FieldRules) -> Vec<Element> {
        fragment
            .query_selector_all(&rules.field_selector())
            .map(|nl| dom::elements(&nl))
            .unwrap_or_default()
    }

    fn element_fields(&self, element: &Element, rules: &FieldRules) -> Vec<Element> {
        let selector = rules.field_selector();
        let mut fields = Vec::new();
        if dom::matches(element, &selector) {
            fields.push(element.clone());
        }
        fields.extend(dom::query_all_within(element, &selector));
        fields
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) -> Result<(), String> {
        node.set_attribute(name, value).map_err(js_err)
    }

    fn append(&mut self, container: &Element, fragment: DocumentFragment) -> Result<(), String> {
        container.append_child(&fragment).map(|_| ()).map_err(js_err)
    }

    fn closest_group(&self, node: &Element, rules: &FieldRules) -> Option<Element> {
        dom::closest(node, &rules.group_selector())
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn detach(&mut self, node: &Element) -> Result<(), String> {
        node.remove();
        Ok(())
    }
}

fn manager() -> FieldManager<DomHost> {
    FieldManager::new(DomHost, state::with(|s| s.config.fields.clone()))
}

// The manager's quiet forms report through `tracing`; `logging` forwards
// those events to the console.

/// Append a copy of `#templateId` to `#containerId`, indexing its field
/// names at the container's current child count. Unknown ids do nothing.
#[wasm_bindgen(js_name = addFormField)]
pub fn add_form_field(container_id: &str, template_id: &str) {
    manager().add(container_id, template_id);
}

/// Remove the field group enclosing `element` (usually the clicked
/// remove button). Anything that is not inside a group is ignored.
#[wasm_bindgen(js_name = removeFormField)]
pub fn remove_form_field(element: JsValue) {
    let Ok(element) = element.dyn_into::<Element>() else {
        debug!("remove form field skipped: argument is not an element");
        return;
    };
    manager().remove(&element);
}

/// Reindex every group in `#containerId` to its position.
#[wasm_bindgen(js_name = renumberFormFields)]
pub fn renumber_form_fields(container_id: &str) {
    manager().renumber(container_id);
}

/// Expose the field functions as `window` globals.
pub fn install_globals() -> Result<(), JsValue> {
    let window = dom::window();

    let add = Closure::wrap(Box::new(move |container: JsValue, template: JsValue| {
        if let (Some(c), Some(t)) = (container.as_string(), template.as_string()) {
            add_form_field(&c, &t);
        }
    }) as Box<dyn FnMut(JsValue, JsValue)>);
    js_sys::Reflect::set(&window, &JsValue::from_str("addFormField"), add.as_ref())?;
    add.forget();

    let remove = Closure::wrap(Box::new(move |element: JsValue| {
        remove_form_field(element);
    }) as Box<dyn FnMut(JsValue)>);
    js_sys::Reflect::set(&window, &JsValue::from_str("removeFormField"), remove.as_ref())?;
    remove.forget();

    let renumber = Closure::wrap(Box::new(move |container: JsValue| {
        if let Some(c) = container.as_string() {
            renumber_form_fields(&c);
        }
    }) as Box<dyn FnMut(JsValue)>);
    js_sys::Reflect::set(&window, &JsValue::from_str("renumberFormFields"), renumber.as_ref())?;
    renumber.forget();

    Ok(())
}
