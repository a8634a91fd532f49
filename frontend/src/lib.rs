//! Timeline wiring for the causal-chain worksheet page.
//!
//! The page ships as static HTML with bare textareas and progress chips;
//! this crate layers the working pieces on top: Cause/Effect labels, the
//! SVG connector overlay between consecutive steps, continue buttons that
//! jump down the chain, and chip state that follows field completion.

pub mod dataflow;
pub mod trigger;

mod debug_utils;

#[cfg(target_arch = "wasm32")]
mod decorate;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod progress;
#[cfg(target_arch = "wasm32")]
mod wiring;

pub use trigger::RedrawTrigger;
#[cfg(target_arch = "wasm32")]
pub use wiring::{TimelineWiring, WireError};

#[cfg(target_arch = "wasm32")]
mod entry {
    use shared::ChainConfig;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use crate::debug_utils;
    use crate::wiring::{TimelineWiring, WireError};

    thread_local! {
        // Keeps the listeners, observer and repaint loop of the current
        // wiring alive for the page lifetime.
        static ACTIVE_WIRING: RefCell<Option<Rc<TimelineWiring>>> = RefCell::new(None);
    }

    /// Entry point for the host page. `config` may be `undefined` or `null`
    /// for the built-in chain, or an object shaped like
    /// `{ "A": { "cause": "cause-a", "effect": "effect-a" }, ... }` to
    /// override it. When the script runs before the DOM is parsed, wiring is
    /// deferred to `DOMContentLoaded`.
    #[wasm_bindgen(js_name = initTimelineWiring)]
    pub fn init_timeline_wiring(config: JsValue) -> Result<(), JsValue> {
        let chain = if config.is_undefined() || config.is_null() {
            ChainConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(JsValue::from)?
        };

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("timeline wiring needs a browser document"))?;

        if document.ready_state() == "loading" {
            // The deferred path has no caller left to report to, so install
            // failures only reach the console.
            gloo_events::EventListener::once(&document, "DOMContentLoaded", move |_| {
                if let Err(error) = wire_now(chain) {
                    debug_utils::debug_log(&format!("timeline wiring failed: {error}"));
                }
            })
            .forget();
            return Ok(());
        }

        wire_now(chain).map_err(|error| JsValue::from_str(&error.to_string()))
    }

    fn wire_now(chain: ChainConfig) -> Result<(), WireError> {
        let summary = format!(
            "timeline wiring ready: {} steps, {} connectors",
            chain.len(),
            chain.pairs().len()
        );
        let wiring = TimelineWiring::install(chain)?;
        ACTIVE_WIRING.with(|active| *active.borrow_mut() = Some(wiring));
        debug_utils::debug_log(&summary);
        Ok(())
    }

}

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);
