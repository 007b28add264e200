use super::bootstrap;
use crate::console;
use web_sys::Element;

pub fn enhance(el: &Element) {
    if bootstrap::construct("Tooltip", el).is_none() {
        console::debug("bootstrap.Tooltip unavailable; tooltip skipped");
    }
}
