use crate::dom;
use crate::events;
use pm_ui_types::SidebarOptions;
use web_sys::Element;

/// Mobile navbar toggler: shows or hides the sidebar.
pub fn enhance(toggle: &Element, opts: &SidebarOptions) {
    let opts = opts.clone();
    events::on_click(toggle, move |_| {
        if let Some(sidebar) = dom::query(&opts.sidebar_selector) {
            dom::toggle_class(&sidebar, &opts.open_class);
        }
    });
}
