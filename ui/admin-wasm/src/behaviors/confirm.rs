//! Confirmation prompts in front of destructive actions.

use crate::dom;
use crate::events;
use pm_ui_types::{ConfirmFollowUp, ConfirmOptions, DeleteGuardOptions};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlFormElement};

fn confirm(message: &str) -> bool {
    dom::window().confirm_with_message(message).unwrap_or(false)
}

/// Legacy `.btn-delete`: the click proceeds only if the user accepts.
pub fn enhance_delete(button: &Element, opts: &DeleteGuardOptions) {
    let message = opts.message.clone();
    events::on_click(button, move |e| {
        if !confirm(&message) {
            e.prevent_default();
        }
    });
}

/// `[data-confirm]`: the default action is always cancelled. On accept the
/// enclosing form is submitted, or a link is followed.
pub fn enhance_confirm(el: &Element, opts: &ConfirmOptions) {
    let opts = opts.clone();
    events::on_click(el, move |e| {
        e.prevent_default();
        let Some(el) = dom::current_target(&e) else { return };
        let attribute = el.get_attribute(&opts.attribute);
        if !confirm(opts.message_for(attribute.as_deref())) {
            return;
        }
        let form = dom::closest(&el, "form").and_then(|f| f.dyn_into::<HtmlFormElement>().ok());
        match ConfirmFollowUp::resolve(form.is_some(), &el.tag_name(), el.get_attribute("href")) {
            ConfirmFollowUp::SubmitForm => {
                if let Some(form) = form {
                    let _ = form.submit();
                }
            }
            ConfirmFollowUp::Navigate(href) => {
                let _ = dom::window().location().set_href(&href);
            }
            ConfirmFollowUp::Nothing => {}
        }
    });
}
