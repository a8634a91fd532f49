use std::fmt;

/// Why a repaint pass runs. Every trigger reruns the same refresh; the name
/// only reaches the debug log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawTrigger {
    ViewportResized,
    ViewportScrolled,
    FieldLayoutChanged,
    FieldEdited,
    FontsSettled,
    Startup,
}

impl RedrawTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            RedrawTrigger::ViewportResized => "viewport-resized",
            RedrawTrigger::ViewportScrolled => "viewport-scrolled",
            RedrawTrigger::FieldLayoutChanged => "field-layout-changed",
            RedrawTrigger::FieldEdited => "field-edited",
            RedrawTrigger::FontsSettled => "fonts-settled",
            RedrawTrigger::Startup => "startup",
        }
    }
}

impl fmt::Display for RedrawTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn trigger_names_are_log_friendly() {
        assert_eq!(RedrawTrigger::ViewportResized.to_string(), "viewport-resized");
        assert_eq!(RedrawTrigger::FieldLayoutChanged.to_string(), "field-layout-changed");
        assert_eq!(RedrawTrigger::Startup.to_string(), "startup");
    }
}
