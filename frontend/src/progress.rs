//! Progress chip sync: the spine chips mirror field completion.

use shared::{step_complete, ChainConfig, StepId, CHIP_SELECTOR, CHIP_STEP_DATA_KEY, DONE_CLASS};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

/// Toggle the done state of every progress chip from its step's field values.
pub fn sync_chips(document: &Document, chain: &ChainConfig) {
    let Ok(chips) = document.query_selector_all(CHIP_SELECTOR) else {
        return;
    };
    for index in 0..chips.length() {
        let Some(chip) = chips
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let step = chip
            .dataset()
            .get(CHIP_STEP_DATA_KEY)
            .and_then(|value| value.parse::<StepId>().ok());
        // Chips naming no step or an unknown one resolve to zero fields and
        // the all-of check passes vacuously, so they read as done.
        let values: Vec<Option<String>> = match step.and_then(|step| chain.fields_for(step)) {
            Some(fields) => vec![
                field_value(document, &fields.cause),
                field_value(document, &fields.effect),
            ],
            None => Vec::new(),
        };
        let done = step_complete(values.iter().map(|value| value.as_deref()));
        let _ = chip.class_list().toggle_with_force(DONE_CLASS, done);
    }
}

/// Current value of a form field. Absent elements and elements that are not
/// text inputs yield nothing, which keeps the step incomplete.
fn field_value(document: &Document, id: &str) -> Option<String> {
    let element = document.get_element_by_id(id)?;
    if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        return Some(textarea.value());
    }
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    None
}
