use crate::dom;
use pm_format::MoneyFormatter;
use pm_ui_types::MoneyStyle;
use web_sys::Element;

/// Rewrite the element's numeric text as currency. Text that does not start
/// with a number is left alone.
pub fn enhance(el: &Element, style: &MoneyStyle) {
    let text = el.text_content().unwrap_or_default();
    if let Some(formatted) = MoneyFormatter::new(style.clone()).format_text(&text) {
        dom::set_text(el, &formatted);
    }
}
