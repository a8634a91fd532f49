//! The connector surface: one absolutely positioned SVG covering the page.

use shared::{
    Connector, ARROW_FILL, CONNECTOR_FILTER, CONNECTOR_STROKE, CONNECTOR_STROKE_WIDTH, OVERLAY_ID,
};
use web_sys::{Document, Element};

use crate::wiring::WireError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

// Inline fallback so the overlay covers the page even when the host
// stylesheet does not position `#causal-overlay` itself.
const OVERLAY_STYLE: &str =
    "position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none";

/// Owned handle to the single connector surface appended to `<body>`.
pub struct Overlay {
    svg: Element,
}

impl Overlay {
    /// Find or create `#causal-overlay`. Creation is skipped when an earlier
    /// pass (or the host page itself) already provides the element.
    pub fn ensure(document: &Document) -> Result<Self, WireError> {
        if let Some(existing) = document.get_element_by_id(OVERLAY_ID) {
            return Ok(Self { svg: existing });
        }

        let svg = document
            .create_element_ns(Some(SVG_NS), "svg")
            .map_err(|_| WireError::OverlayUnsupported)?;
        svg.set_id(OVERLAY_ID);
        let _ = svg.set_attribute("aria-hidden", "true");
        let _ = svg.set_attribute("style", OVERLAY_STYLE);

        let body = document.body().ok_or(WireError::NoBody)?;
        let _ = body.append_child(&svg);
        Ok(Self { svg })
    }

    /// Match the drawing frame to the scaled viewport. Aspect ratio is not
    /// preserved, so the units stay pinned to the viewport on odd resizes.
    pub fn set_frame(&self, width: f64, height: f64) {
        let _ = self.svg.set_attribute("viewBox", &format!("0 0 {width} {height}"));
        let _ = self.svg.set_attribute("preserveAspectRatio", "none");
    }

    /// Drop every drawn connector.
    pub fn clear(&self) {
        while let Some(child) = self.svg.first_child() {
            let _ = self.svg.remove_child(&child);
        }
    }

    /// Append the curve and the arrowhead for one connector.
    pub fn draw(&self, document: &Document, connector: &Connector) {
        let Ok(curve) = document.create_element_ns(Some(SVG_NS), "path") else {
            return;
        };
        let _ = curve.set_attribute("d", &connector.curve_path());
        let _ = curve.set_attribute("fill", "none");
        let _ = curve.set_attribute("stroke", CONNECTOR_STROKE);
        let _ = curve.set_attribute("stroke-width", CONNECTOR_STROKE_WIDTH);
        let _ = curve.set_attribute("stroke-linecap", "round");
        let _ = curve.set_attribute("filter", CONNECTOR_FILTER);

        let Ok(arrow) = document.create_element_ns(Some(SVG_NS), "path") else {
            return;
        };
        let _ = arrow.set_attribute("d", &connector.arrowhead_path());
        let _ = arrow.set_attribute("fill", ARROW_FILL);

        let _ = self.svg.append_child(&curve);
        let _ = self.svg.append_child(&arrow);
    }

    pub fn element(&self) -> &Element {
        &self.svg
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use shared::Point;
    use wasm_bindgen_test::*;

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    #[wasm_bindgen_test]
    fn ensure_creates_the_overlay_exactly_once() {
        let document = document();
        let first = Overlay::ensure(&document).unwrap();
        let second = Overlay::ensure(&document).unwrap();

        assert!(first.element().is_same_node(Some(second.element().as_ref())));
        assert_eq!(
            first.element().get_attribute("aria-hidden").as_deref(),
            Some("true")
        );

        let overlays = document
            .query_selector_all(&format!("#{OVERLAY_ID}"))
            .unwrap();
        assert_eq!(overlays.length(), 1);
    }

    #[wasm_bindgen_test]
    fn draw_appends_a_curve_and_an_arrow_inside_the_frame() {
        let document = document();
        let overlay = Overlay::ensure(&document).unwrap();
        overlay.set_frame(1000.0, 500.0);
        overlay.clear();

        let connector = Connector {
            from: Point { x: 0.0, y: 0.0 },
            to: Point { x: 100.0, y: 50.0 },
        };
        overlay.draw(&document, &connector);

        assert_eq!(overlay.element().child_element_count(), 2);
        assert_eq!(
            overlay.element().get_attribute("viewBox").as_deref(),
            Some("0 0 1000 500")
        );
        assert_eq!(
            overlay.element().get_attribute("preserveAspectRatio").as_deref(),
            Some("none")
        );

        let curve = overlay.element().first_element_child().unwrap();
        assert_eq!(
            curve.get_attribute("d").as_deref(),
            Some("M 0 0 C 50 0, 50 50, 100 50")
        );

        overlay.clear();
        assert_eq!(overlay.element().child_element_count(), 0);
    }
}
