use indexmap::IndexMap;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

// ===== CHAIN CONFIGURATION =====

/// One step of the five-step causal chain on the worksheet page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepId {
    A,
    B,
    C,
    D,
    E,
}

impl StepId {
    pub const ALL: [StepId; 5] = [StepId::A, StepId::B, StepId::C, StepId::D, StepId::E];

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::A => "A",
            StepId::B => "B",
            StepId::C => "C",
            StepId::D => "D",
            StepId::E => "E",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStep;

impl fmt::Display for UnknownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("step identifier must be one of A-E")
    }
}

impl std::error::Error for UnknownStep {}

impl FromStr for StepId {
    type Err = UnknownStep;

    // Progress chips carry the uppercase letter; accept either case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "A" | "a" => Ok(StepId::A),
            "B" | "b" => Ok(StepId::B),
            "C" | "c" => Ok(StepId::C),
            "D" | "d" => Ok(StepId::D),
            "E" | "e" => Ok(StepId::E),
            _ => Err(UnknownStep),
        }
    }
}

/// Element ids of the two form fields backing one step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StepFields {
    pub cause: String,
    pub effect: String,
}

impl StepFields {
    pub fn new(cause: &str, effect: &str) -> Self {
        Self {
            cause: cause.into(),
            effect: effect.into(),
        }
    }
}

/// Ordered step-to-fields mapping that drives decoration, connectors and
/// progress chips. Serializes as a plain `{ "A": { "cause": ..., "effect": ... } }`
/// object so hosts can override the whole chain at once.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ChainConfig {
    steps: IndexMap<StepId, StepFields>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        let steps = StepId::ALL
            .into_iter()
            .map(|step| {
                let letter = step.as_str().to_ascii_lowercase();
                let fields = StepFields::new(&format!("cause-{letter}"), &format!("effect-{letter}"));
                (step, fields)
            })
            .collect();
        Self { steps }
    }
}

impl ChainConfig {
    pub fn from_steps<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = (StepId, StepFields)>,
    {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = (StepId, &StepFields)> {
        self.steps.iter().map(|(step, fields)| (*step, fields))
    }

    pub fn fields_for(&self, step: StepId) -> Option<&StepFields> {
        self.steps.get(&step)
    }

    /// Effect-to-next-cause links between consecutive steps, in chain order.
    pub fn pairs(&self) -> Vec<FieldPair> {
        self.steps
            .values()
            .zip(self.steps.values().skip(1))
            .map(|(step, next)| FieldPair {
                from: step.effect.clone(),
                to: next.cause.clone(),
            })
            .collect()
    }
}

/// One connection: the effect field of a step feeding the cause field of the
/// step after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    pub from: String,
    pub to: String,
}

// ===== CONNECTOR GEOMETRY =====

/// Horizontal inset from a field's right edge to its anchor point, in CSS pixels.
pub const ANCHOR_INSET: f64 = 12.0;
/// Arrowhead length along the x axis, in overlay units.
pub const ARROW_LENGTH: f64 = 10.0;
/// Arrowhead base width along the y axis, in overlay units.
pub const ARROW_WIDTH: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Field bounding box in viewport coordinates, as reported by layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Scroll offsets and pixel density used to map viewport points onto the
/// overlay's scaled document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn to_overlay(self, point: Point) -> Point {
        Point {
            x: (point.x + self.scroll_x) * self.device_pixel_ratio,
            y: (point.y + self.scroll_y) * self.device_pixel_ratio,
        }
    }
}

/// Anchor of a field: just inside its right edge, at the vertical midpoint.
pub fn field_anchor(rect: LayoutRect) -> Point {
    Point {
        x: rect.left + rect.width - ANCHOR_INSET,
        y: rect.top + rect.height / 2.0,
    }
}

/// Endpoints of one connector in overlay coordinates. The consuming side backs
/// off by a second inset so the arrowhead lands short of the target's edge.
pub fn connector_between(from: LayoutRect, to: LayoutRect, viewport: Viewport) -> Connector {
    let mut target = field_anchor(to);
    target.x -= ANCHOR_INSET;
    Connector {
        from: viewport.to_overlay(field_anchor(from)),
        to: viewport.to_overlay(target),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub from: Point,
    pub to: Point,
}

impl Connector {
    /// Cubic curve with both control points at the horizontal midpoint, each
    /// keeping its own endpoint's height.
    pub fn curve_path(&self) -> String {
        let mid_x = (self.from.x + self.to.x) / 2.0;
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.from.x, self.from.y, mid_x, self.from.y, mid_x, self.to.y, self.to.x, self.to.y
        )
    }

    /// Fixed-size arrowhead at the target end. Always points leftward, even
    /// when the curve approaches from the other side.
    pub fn arrowhead_path(&self) -> String {
        format!(
            "M {} {} l {} {} l 0 {} Z",
            self.to.x,
            self.to.y,
            -ARROW_LENGTH,
            -(ARROW_WIDTH / 2.0),
            ARROW_WIDTH
        )
    }
}

// ===== INSERTED MARKUP =====

pub const OVERLAY_ID: &str = "causal-overlay";
pub const CHIP_SELECTOR: &str = ".step-chip";
pub const CHIP_STEP_DATA_KEY: &str = "step";
pub const GROWING_FIELD_SELECTOR: &str = "textarea.auto";
pub const JUMP_DATA_KEY: &str = "jump";

pub const CAUSE_MARKER_CLASS: &str = "cause";
pub const EFFECT_MARKER_CLASS: &str = "effect";
pub const DONE_CLASS: &str = "is-done";
pub const HIGHLIGHT_CLASS: &str = "glow-pulse";
pub const HIGHLIGHT_MS: u32 = 2_000;

pub const CONNECTOR_STROKE: &str = "rgba(34,211,238,0.55)";
pub const CONNECTOR_STROKE_WIDTH: &str = "3";
pub const CONNECTOR_FILTER: &str = "drop-shadow(0 0 6px rgba(34,211,238,0.35))";
pub const ARROW_FILL: &str = "rgba(34,211,238,0.75)";

pub const CAUSE_LABEL_HTML: &str = concat!(
    "<div class=\"flex items-center gap-2 mb-1\">",
    "<span class=\"tag-cause\">Cause</span>",
    "<span class=\"helper-arrow\"><span class=\"chev\">⇢</span>",
    "<em class=\"text-slate-400\">leads to next effect</em></span>",
    "</div>",
);

pub const EFFECT_LABEL_HTML: &str = concat!(
    "<div class=\"flex items-center gap-2 mb-1 mt-4\">",
    "<span class=\"tag-effect\">Effect</span>",
    "<span class=\"helper-arrow\"><span class=\"chev\">⇢</span>",
    "<em class=\"text-slate-400\">feeds into next cause</em></span>",
    "</div>",
);

pub const CONTINUE_BUTTON_CLASSES: &str =
    "mt-3 inline-flex items-center gap-2 text-cyan-300/90 hover:text-cyan-100";
pub const CONTINUE_BUTTON_HTML: &str =
    r#"Continue to next Cause <span aria-hidden="true">↘</span>"#;

// ===== STEP COMPLETION =====

/// A step is complete when every backing field holds a non-whitespace value.
/// A step with no known fields passes vacuously, so chips naming an unknown
/// step read as done.
pub fn step_complete<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values
        .into_iter()
        .all(|value| !value.unwrap_or("").trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chain_covers_steps_a_through_e() {
        let config = ChainConfig::default();
        assert_eq!(config.len(), 5);
        assert_eq!(
            config.fields_for(StepId::A),
            Some(&StepFields::new("cause-a", "effect-a"))
        );
        assert_eq!(
            config.fields_for(StepId::E),
            Some(&StepFields::new("cause-e", "effect-e"))
        );
    }

    #[test]
    fn default_pairs_link_each_effect_to_the_next_cause() {
        let pairs = ChainConfig::default().pairs();
        assert_eq!(pairs.len(), 4);
        assert_eq!(
            pairs[0],
            FieldPair {
                from: "effect-a".into(),
                to: "cause-b".into(),
            }
        );
        assert_eq!(
            pairs[3],
            FieldPair {
                from: "effect-d".into(),
                to: "cause-e".into(),
            }
        );
    }

    #[test]
    fn pairs_follow_insertion_order_not_letter_order() {
        let config = ChainConfig::from_steps([
            (StepId::C, StepFields::new("c-cause", "c-effect")),
            (StepId::A, StepFields::new("a-cause", "a-effect")),
        ]);
        assert_eq!(
            config.pairs(),
            vec![FieldPair {
                from: "c-effect".into(),
                to: "a-cause".into(),
            }]
        );
    }

    #[test]
    fn single_step_chain_has_no_pairs() {
        let config = ChainConfig::from_steps([(
            StepId::A,
            StepFields::new("only-cause", "only-effect"),
        )]);
        assert!(config.pairs().is_empty());
    }

    #[test]
    fn config_serializes_as_a_plain_step_object() {
        let json = serde_json::to_value(ChainConfig::default()).unwrap();
        assert_eq!(json["A"]["cause"], "cause-a");
        assert_eq!(json["E"]["effect"], "effect-e");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn config_parses_a_custom_chain() {
        let config: ChainConfig = serde_json::from_value(serde_json::json!({
            "A": { "cause": "start", "effect": "handoff" },
            "B": { "cause": "pickup", "effect": "end" },
        }))
        .unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(
            config.pairs(),
            vec![FieldPair {
                from: "handoff".into(),
                to: "pickup".into(),
            }]
        );
    }

    #[test]
    fn step_ids_parse_case_insensitively() {
        assert_eq!("A".parse(), Ok(StepId::A));
        assert_eq!("e".parse(), Ok(StepId::E));
        assert_eq!("F".parse::<StepId>(), Err(UnknownStep));
        assert_eq!("".parse::<StepId>(), Err(UnknownStep));
    }

    #[test]
    fn field_anchor_sits_inside_the_right_edge_at_mid_height() {
        let anchor = field_anchor(LayoutRect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 40.0,
        });
        assert_eq!(anchor, Point { x: 288.0, y: 70.0 });
    }

    #[test]
    fn viewport_adds_scroll_before_scaling() {
        let viewport = Viewport {
            scroll_x: 5.0,
            scroll_y: 7.0,
            device_pixel_ratio: 2.0,
        };
        assert_eq!(
            viewport.to_overlay(Point { x: 10.0, y: 20.0 }),
            Point { x: 30.0, y: 54.0 }
        );
    }

    #[test]
    fn connector_backs_the_target_anchor_off_by_a_second_inset() {
        let viewport = Viewport {
            scroll_x: 0.0,
            scroll_y: 0.0,
            device_pixel_ratio: 1.0,
        };
        let from = LayoutRect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 20.0,
        };
        let to = LayoutRect {
            left: 300.0,
            top: 100.0,
            width: 100.0,
            height: 20.0,
        };
        let connector = connector_between(from, to, viewport);
        assert_eq!(connector.from, Point { x: 88.0, y: 10.0 });
        assert_eq!(connector.to, Point { x: 376.0, y: 110.0 });
    }

    #[test]
    fn curve_path_holds_each_endpoint_height_to_the_midpoint() {
        let connector = Connector {
            from: Point { x: 0.0, y: 10.0 },
            to: Point { x: 100.0, y: 30.0 },
        };
        assert_eq!(connector.curve_path(), "M 0 10 C 50 10, 50 30, 100 30");
    }

    #[test]
    fn arrowhead_is_fixed_size_and_points_left() {
        let connector = Connector {
            from: Point { x: 0.0, y: 0.0 },
            to: Point { x: 100.0, y: 30.0 },
        };
        assert_eq!(connector.arrowhead_path(), "M 100 30 l -10 -4 l 0 8 Z");

        // Same shape even when the curve runs right to left.
        let reversed = Connector {
            from: Point { x: 200.0, y: 0.0 },
            to: Point { x: 100.0, y: 30.0 },
        };
        assert_eq!(reversed.arrowhead_path(), "M 100 30 l -10 -4 l 0 8 Z");
    }

    #[test]
    fn step_completes_only_when_every_field_has_content() {
        assert!(step_complete([Some("a storm"), Some("flooding")]));
        assert!(!step_complete([Some("a storm"), Some("")]));
        assert!(!step_complete([Some("a storm"), Some("   ")]));
        assert!(!step_complete([Some("a storm"), None]));
    }

    #[test]
    fn step_with_no_fields_is_vacuously_complete() {
        assert!(step_complete(std::iter::empty::<Option<&str>>()));
    }

    #[test]
    fn label_markup_distinguishes_cause_and_effect() {
        assert!(CAUSE_LABEL_HTML.contains("tag-cause"));
        assert!(CAUSE_LABEL_HTML.contains("leads to next effect"));
        assert!(EFFECT_LABEL_HTML.contains("tag-effect"));
        assert!(EFFECT_LABEL_HTML.contains("feeds into next cause"));
        assert!(EFFECT_LABEL_HTML.contains("mt-4"));
        assert!(!CAUSE_LABEL_HTML.contains("mt-4"));
    }

    #[test]
    fn continue_button_markup_names_the_jump() {
        assert!(CONTINUE_BUTTON_HTML.starts_with("Continue to next Cause"));
        assert!(CONTINUE_BUTTON_HTML.contains(r#"aria-hidden="true""#));
        assert!(CONTINUE_BUTTON_CLASSES.contains("text-cyan-300/90"));
    }
}
