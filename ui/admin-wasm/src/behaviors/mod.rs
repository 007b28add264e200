//! Progressive enhancements for server-rendered admin pages.
//!
//! Every behavior is a [`Behavior`] value: a selector plus options. At
//! start-up [`enhance_page`] attaches each configured behavior to the
//! elements its selector matches; `enhance()` in the crate root does the
//! same for a single element added later.

mod alerts;
mod bootstrap;
mod confirm;
mod dropdown;
mod files;
mod money;
mod sidebar;
mod tooltip;

use crate::console;
use crate::dom;
use pm_ui_types::{AdminUiConfig, Behavior};
use web_sys::Element;

/// Attach one behavior to one element.
pub fn enhance(el: &Element, behavior: &Behavior) {
    match behavior {
        Behavior::Tooltip(_) => tooltip::enhance(el),
        Behavior::Dropdown(opts) => dropdown::enhance(el, opts),
        Behavior::SidebarToggle(opts) => sidebar::enhance(el, opts),
        Behavior::AutoHideAlert(opts) => alerts::enhance(el, opts),
        Behavior::DeleteGuard(opts) => confirm::enhance_delete(el, opts),
        Behavior::ConfirmGuard(opts) => confirm::enhance_confirm(el, opts),
        Behavior::FilePreview(opts) => files::enhance_preview(el, opts),
        Behavior::FileLabel(opts) => files::enhance_label(el, opts),
        Behavior::MoneyFormat(style) => money::enhance(el, style),
    }
}

/// Attach every configured behavior to the current document.
pub fn enhance_page(config: &AdminUiConfig) {
    for behavior in config.behaviors() {
        let targets = dom::query_all(behavior.selector());
        if targets.is_empty() {
            continue;
        }
        console::debug(&format!("{}: {} element(s)", behavior.kind(), targets.len()));
        for el in &targets {
            enhance(el, &behavior);
        }
    }
}
