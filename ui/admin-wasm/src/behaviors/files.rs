//! File inputs: image preview and the custom file label.

use crate::console;
use crate::dom;
use crate::events;
use pm_ui_types::{FileLabelOptions, FilePreviewOptions};
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, File, FileReader, HtmlInputElement, ProgressEvent};

fn first_file(e: &Event) -> Option<File> {
    let input = e.current_target()?.dyn_into::<HtmlInputElement>().ok()?;
    input.files()?.get(0)
}

/// Show the chosen image in the element named by the input's
/// `data-preview` attribute. Nothing is bound when that element is missing.
pub fn enhance_preview(input: &Element, opts: &FilePreviewOptions) {
    let attribute = input.get_attribute(&opts.attribute);
    let Some(preview) = opts.preview_id(attribute.as_deref()).and_then(dom::by_id) else {
        return;
    };
    events::on_change(input, move |e| {
        let Some(file) = first_file(&e) else { return };
        if let Err(err) = read_into(&file, preview.clone()) {
            console::warn(&format!("image preview failed: {err:?}"));
        }
    });
}

fn read_into(file: &File, preview: Element) -> Result<(), JsValue> {
    let reader = FileReader::new()?;
    let onload = Closure::once(move |e: ProgressEvent| {
        let Some(reader) = e.target().and_then(|t| t.dyn_into::<FileReader>().ok()) else {
            return;
        };
        let Some(url) = reader.result().ok().and_then(|r| r.as_string()) else { return };
        let _ = preview.set_attribute("src", &url);
        dom::set_style(&preview, "display", "block");
    });
    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();
    reader.read_as_data_url(file)
}

/// Write the selected file's name into the label that follows the input.
pub fn enhance_label(input: &Element, opts: &FileLabelOptions) {
    let opts = opts.clone();
    events::on_change(input, move |e| {
        let Some(input) = dom::current_target(&e) else { return };
        let Some(label) = input.next_element_sibling() else { return };
        if !dom::has_class(&label, &opts.label_class) {
            return;
        }
        let name = first_file(&e).map(|f| f.name());
        dom::set_text(&label, &opts.label_text(name.as_deref()));
    });
}
