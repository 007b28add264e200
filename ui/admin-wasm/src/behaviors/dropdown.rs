//! Dropdown menus: a toggle opens the menu right after it and closes every
//! other open menu. A click anywhere else on the page closes them all.

use crate::dom;
use crate::events;
use crate::state;
use pm_ui_types::DropdownOptions;
use web_sys::Element;

pub fn enhance(toggle: &Element, opts: &DropdownOptions) {
    bind_outside_closer(opts);
    let opts = opts.clone();
    events::on_click(toggle, move |e| {
        e.prevent_default();
        let Some(toggle) = dom::current_target(&e) else { return };
        let Some(menu) = toggle.next_element_sibling() else { return };
        if dom::has_class(&menu, &opts.open_class) {
            dom::remove_class(&menu, &opts.open_class);
        } else {
            close_all(&opts);
            dom::add_class(&menu, &opts.open_class);
        }
    });
}

fn close_all(opts: &DropdownOptions) {
    for menu in dom::query_all(&opts.open_menu_selector()) {
        dom::remove_class(&menu, &opts.open_class);
    }
}

// Once per page, however many toggles there are.
fn bind_outside_closer(opts: &DropdownOptions) {
    if !state::claim_dropdown_closer() {
        return;
    }
    let opts = opts.clone();
    events::on_click(&dom::document(), move |e| {
        let Some(target) = dom::event_target(&e) else { return };
        let on_toggle = dom::matches(&target, &opts.toggle_selector);
        let in_menu = dom::closest(&target, &opts.menu_selector).is_some();
        if !on_toggle && !in_menu {
            close_all(&opts);
        }
    });
}
