pub const TAG_NAME: &str = "course-clear";

pub const ATTR_OPEN: &str = "open";
pub const ATTR_GREETING: &str = "greeting";
pub const ATTR_CLOSE_ON_ESC: &str = "close-on-esc";
pub const ATTR_CLOSE_ON_OUTSIDE: &str = "close-on-outside";

pub const DEFAULT_GREETING: &str = "Course Clear!";

pub const EVENT_OPENED: &str = "opened";
pub const EVENT_CLOSED: &str = "closed";

pub const BG_COLOR_PROPERTY: &str = "--cc-custom-bg-color";
pub const COLOR_PROPERTY: &str = "--cc-custom-color";
pub const DEFAULT_BG_COLOR: &str = "#f3d41a";
pub const DEFAULT_COLOR: &str = "#2c2b55";

pub fn normalize_greeting(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_GREETING.to_string(),
    }
}

/// Which cancel gestures are honoured as close requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DialogFlags {
    pub close_on_escape: bool,
    pub close_on_outside_click: bool,
}

impl DialogFlags {
    /// Reads presence-based flags through an attribute lookup.
    pub fn from_attributes<F>(has_attribute: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        Self {
            close_on_escape: has_attribute(ATTR_CLOSE_ON_ESC),
            close_on_outside_click: has_attribute(ATTR_CLOSE_ON_OUTSIDE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_falls_back_when_blank() {
        assert_eq!(normalize_greeting(None), DEFAULT_GREETING);
        assert_eq!(normalize_greeting(Some("   ")), DEFAULT_GREETING);
        assert_eq!(normalize_greeting(Some("  Hello World! ")), "Hello World!");
    }

    #[test]
    fn flags_follow_attribute_presence() {
        let flags = DialogFlags::from_attributes(|name| name == ATTR_CLOSE_ON_ESC);
        assert!(flags.close_on_escape);
        assert!(!flags.close_on_outside_click);
        assert_eq!(DialogFlags::from_attributes(|_| false), DialogFlags::default());
    }
}
