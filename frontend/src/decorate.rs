//! Field decoration: Cause/Effect labels and the continue jump buttons.

use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use shared::{
    ChainConfig, CAUSE_LABEL_HTML, CAUSE_MARKER_CLASS, CONTINUE_BUTTON_CLASSES,
    CONTINUE_BUTTON_HTML, EFFECT_LABEL_HTML, EFFECT_MARKER_CLASS, HIGHLIGHT_CLASS, HIGHLIGHT_MS,
    JUMP_DATA_KEY,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, FocusOptions, HtmlElement, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

/// Insert the Cause/Effect label blocks above every chain field. The marker
/// class doubles as the already-decorated guard, so repeated passes are safe.
pub fn decorate_fields(document: &Document, chain: &ChainConfig) {
    for (_, fields) in chain.steps() {
        label_field(document, &fields.cause, CAUSE_MARKER_CLASS, CAUSE_LABEL_HTML);
        label_field(document, &fields.effect, EFFECT_MARKER_CLASS, EFFECT_LABEL_HTML);
    }
}

fn label_field(document: &Document, id: &str, marker: &str, label_html: &str) {
    let Some(field) = document.get_element_by_id(id) else {
        return;
    };
    if field.class_list().contains(marker) {
        return;
    }
    let _ = field.class_list().add_1(marker);
    let _ = field.insert_adjacent_html("beforebegin", label_html);
}

/// Insert a jump button after each pair's source field and return the click
/// listeners so the wiring owns their lifetime. The button element is
/// inserted at most once; the listener is attached fresh on every pass, so
/// buttons keep working after the active wiring is replaced.
pub fn install_continue_buttons(document: &Document, chain: &ChainConfig) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for pair in chain.pairs() {
        let Some(from) = document.get_element_by_id(&pair.from) else {
            continue;
        };
        let button = existing_jump_button(&from)
            .or_else(|| insert_jump_button(document, &from, &pair.to));
        let Some(button) = button else {
            continue;
        };

        let target_id = pair.to.clone();
        let target_document = document.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            jump_to(&target_document, &target_id);
        }));
    }
    listeners
}

fn existing_jump_button(field: &Element) -> Option<HtmlElement> {
    field
        .next_element_sibling()
        .and_then(|sibling| sibling.dyn_into::<HtmlElement>().ok())
        .filter(|sibling| sibling.dataset().get(JUMP_DATA_KEY).is_some())
}

fn insert_jump_button(document: &Document, from: &Element, target_id: &str) -> Option<HtmlElement> {
    let button: HtmlElement = document.create_element("button").ok()?.dyn_into().ok()?;
    let _ = button.set_attribute("type", "button");
    let _ = button.dataset().set(JUMP_DATA_KEY, target_id);
    button.set_class_name(CONTINUE_BUTTON_CLASSES);
    button.set_inner_html(CONTINUE_BUTTON_HTML);
    from.insert_adjacent_element("afterend", &button).ok()?;
    Some(button)
}

/// Scroll the target field into view, pulse its highlight and focus it
/// without a second scroll. The target is looked up at click time, so fields
/// removed after wiring are silently skipped.
fn jump_to(document: &Document, target_id: &str) {
    let Some(target) = document.get_element_by_id(target_id) else {
        return;
    };

    let scroll_options = ScrollIntoViewOptions::new();
    scroll_options.set_behavior(ScrollBehavior::Smooth);
    scroll_options.set_block(ScrollLogicalPosition::Center);
    target.scroll_into_view_with_scroll_into_view_options(&scroll_options);

    let _ = target.class_list().add_1(HIGHLIGHT_CLASS);
    let highlighted = target.clone();
    spawn_local(async move {
        TimeoutFuture::new(HIGHLIGHT_MS).await;
        let _ = highlighted.class_list().remove_1(HIGHLIGHT_CLASS);
    });

    if let Some(target) = target.dyn_ref::<HtmlElement>() {
        let focus_options = FocusOptions::new();
        focus_options.set_prevent_scroll(true);
        let _ = target.focus_with_options(&focus_options);
    }
}
