/// Payload carried by panel events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiValue {
    #[default]
    None,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl UiValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            UiValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            UiValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A raw user interaction, as delivered by the host document.
#[derive(Debug, Clone, PartialEq)]
pub enum UiInput {
    Click(String),
    TouchStart(String),
    /// Continuous input on a slider.
    Input { id: String, value: String },
    /// Committed change on a select.
    Change { id: String, value: String },
    /// Checkbox change.
    Toggle { id: String, checked: bool },
    /// Pointer pressed; `target` is the element under it, if any.
    PointerDown { target: Option<String>, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    KeyDown(String),
}

impl UiInput {
    pub fn click(id: &str) -> Self {
        UiInput::Click(id.to_string())
    }

    pub fn input(id: &str, value: impl Into<String>) -> Self {
        UiInput::Input {
            id: id.to_string(),
            value: value.into(),
        }
    }

    pub fn change(id: &str, value: impl Into<String>) -> Self {
        UiInput::Change {
            id: id.to_string(),
            value: value.into(),
        }
    }

    pub fn toggle(id: &str, checked: bool) -> Self {
        UiInput::Toggle {
            id: id.to_string(),
            checked,
        }
    }

    pub fn key(key: &str) -> Self {
        UiInput::KeyDown(key.to_string())
    }

    /// Whether the browser would treat this as a user activation
    /// (mousedown, keydown or touchstart reaching the document).
    pub fn is_user_gesture(&self) -> bool {
        matches!(
            self,
            UiInput::Click(_)
                | UiInput::TouchStart(_)
                | UiInput::PointerDown { .. }
                | UiInput::KeyDown(_)
        )
    }
}

/// Leading-integer parse: `"42"`, `" 42.7"` and `"42px"` all give 42.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// One-decimal label with ties rounded away from zero: `2.25` gives `"2.3"`.
pub fn one_decimal(v: f64) -> String {
    format!("{:.1}", (v * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_prefix_matches_lenient_parsing() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix(" 42.7"), Some(42));
        assert_eq!(parse_int_prefix("42px"), Some(42));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn one_decimal_rounds_ties_up() {
        assert_eq!(one_decimal(2.25), "2.3");
        assert_eq!(one_decimal(0.25), "0.3");
        assert_eq!(one_decimal(2.24), "2.2");
        assert_eq!(one_decimal(3.0), "3.0");
    }

    #[test]
    fn gestures() {
        assert!(UiInput::key("a").is_user_gesture());
        assert!(UiInput::click("play-btn").is_user_gesture());
        assert!(!UiInput::PointerUp.is_user_gesture());
        assert!(!UiInput::input("fly-speed", "1").is_user_gesture());
    }

    #[test]
    fn value_accessors() {
        assert_eq!(UiValue::Bool(true).as_bool(), Some(true));
        assert_eq!(UiValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(UiValue::Text("x".into()).as_text(), Some("x"));
        assert_eq!(UiValue::None.as_number(), None);
    }
}
