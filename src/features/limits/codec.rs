//! Conversion between the editable form of a limit and its wire value.
//!
//! The form side is a text input plus an "Unlimited" checkbox. The wire side is
//! `number | null`: `null` clears the override, `-1` is the unlimited sentinel,
//! anything else is a literal count.

use serde::Serialize;
use thiserror::Error;

/// Reserved wire value meaning "no cap"
pub const UNLIMITED: i64 = -1;

/// Editable state of a single limit field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LimitInput {
    pub text: String,
    pub unlimited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitInputError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{0} is negative; tick Unlimited instead of entering -1")]
    Negative(i64),
}

/// Encode form input into the override value to send.
///
/// Returns `Ok(None)` for an empty field, which clears the override.
pub fn encode(text: &str, unlimited: bool) -> Result<Option<i64>, LimitInputError> {
    if unlimited {
        return Ok(Some(UNLIMITED));
    }

    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let value = text
        .parse::<i64>()
        .map_err(|_| LimitInputError::NotANumber(text.to_string()))?;

    if value < 0 {
        return Err(LimitInputError::Negative(value));
    }

    Ok(Some(value))
}

/// Prefill form input from the current override and base limit.
pub fn decode(override_limit: Option<i64>, base: Option<i64>) -> LimitInput {
    match override_limit.or(base) {
        Some(UNLIMITED) => LimitInput {
            text: String::new(),
            unlimited: true,
        },
        Some(value) => LimitInput {
            text: value.to_string(),
            unlimited: false,
        },
        None => LimitInput::default(),
    }
}

impl LimitInput {
    pub fn new(text: impl Into<String>, unlimited: bool) -> Self {
        Self {
            text: text.into(),
            unlimited,
        }
    }

    /// Build from a submitted checkbox, which is present only when ticked.
    /// A ticked box clears the text, mirroring the input being disabled.
    pub fn from_form(text: &str, unlimited: Option<&str>) -> Self {
        let unlimited = unlimited.is_some_and(|v| !v.is_empty());
        Self {
            text: if unlimited {
                String::new()
            } else {
                text.trim().to_string()
            },
            unlimited,
        }
    }

    pub fn encode(&self) -> Result<Option<i64>, LimitInputError> {
        encode(&self.text, self.unlimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_number() {
        assert_eq!(encode("42", false), Ok(Some(42)));
        assert_eq!(encode(" 3000 ", false), Ok(Some(3000)));
        assert_eq!(encode("0", false), Ok(Some(0)));
    }

    #[test]
    fn test_encode_empty_clears_override() {
        assert_eq!(encode("", false), Ok(None));
        assert_eq!(encode("   ", false), Ok(None));
    }

    #[test]
    fn test_encode_unlimited_ignores_text() {
        assert_eq!(encode("anything", true), Ok(Some(UNLIMITED)));
        assert_eq!(encode("", true), Ok(Some(UNLIMITED)));
        assert_eq!(encode("500", true), Ok(Some(UNLIMITED)));
    }

    #[test]
    fn test_encode_rejects_garbage() {
        assert_eq!(
            encode("12abc", false),
            Err(LimitInputError::NotANumber("12abc".to_string()))
        );
        assert_eq!(
            encode("1.5", false),
            Err(LimitInputError::NotANumber("1.5".to_string()))
        );
    }

    #[test]
    fn test_encode_rejects_negative() {
        assert_eq!(encode("-1", false), Err(LimitInputError::Negative(-1)));
        assert_eq!(encode("-20", false), Err(LimitInputError::Negative(-20)));
    }

    #[test]
    fn test_decode_unlimited_override() {
        for base in [None, Some(3000), Some(-1), Some(0)] {
            assert_eq!(decode(Some(UNLIMITED), base), LimitInput::new("", true));
        }
    }

    #[test]
    fn test_decode_falls_back_to_base() {
        assert_eq!(decode(None, Some(3000)), LimitInput::new("3000", false));
        assert_eq!(decode(None, Some(UNLIMITED)), LimitInput::new("", true));
        assert_eq!(decode(None, None), LimitInput::new("", false));
    }

    #[test]
    fn test_decode_prefers_override() {
        assert_eq!(decode(Some(5000), Some(3000)), LimitInput::new("5000", false));
        assert_eq!(decode(Some(0), Some(3000)), LimitInput::new("0", false));
    }

    #[test]
    fn test_decode_reverses_encode() {
        let inputs = [
            LimitInput::new("0", false),
            LimitInput::new("42", false),
            LimitInput::new("25000", false),
            LimitInput::new("", true),
            LimitInput::new("", false),
        ];

        for input in inputs {
            let wire = input.encode().unwrap();
            assert_eq!(decode(wire, None), input, "wire value {:?}", wire);
        }
    }

    #[test]
    fn test_from_form_checkbox() {
        assert_eq!(
            LimitInput::from_form("100", Some("on")),
            LimitInput::new("", true)
        );
        assert_eq!(
            LimitInput::from_form(" 100 ", None),
            LimitInput::new("100", false)
        );
    }
}
