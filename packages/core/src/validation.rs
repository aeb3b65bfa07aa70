//! Editor-kind specific value checks.
//!
//! Validation failures are not errors: they are reported inline next to the
//! field and the value is simply not committed.

use crate::registry::{EditorKind, PropertyFieldDefinition};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const NUMBER_MESSAGE: &str = "Value must be a valid number";
pub const COLOR_MESSAGE: &str = "Value must be a valid hex color (e.g. #ff0000)";
pub const IMAGE_MESSAGE: &str = "Value must be a valid image URL";
pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const OPTION_MESSAGE: &str = "Value must be one of the listed options";

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

fn hex_color() -> &'static Regex {
    static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
    HEX_COLOR.get_or_init(|| Regex::new(r"(?i)^#([0-9a-f]{3}){1,2}$").expect("valid regex"))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn is_absolute_url(candidate: &str) -> bool {
    url::Url::parse(candidate).is_ok()
}

/// Check a value against the format rule for its editor kind
pub fn validate(value: &Value, kind: EditorKind) -> ValidationResult {
    match kind {
        EditorKind::Number => match as_number(value) {
            Some(_) => ValidationResult::ok(),
            None => ValidationResult::invalid(NUMBER_MESSAGE),
        },

        EditorKind::Color => match value.as_str() {
            Some(color) if hex_color().is_match(color) => ValidationResult::ok(),
            _ => ValidationResult::invalid(COLOR_MESSAGE),
        },

        EditorKind::Image => match value {
            Value::String(src) if src.trim().is_empty() => ValidationResult::ok(),
            Value::String(src) if is_absolute_url(src.trim()) => ValidationResult::ok(),
            _ => ValidationResult::invalid(IMAGE_MESSAGE),
        },

        EditorKind::Text | EditorKind::Select | EditorKind::Toggle => ValidationResult::ok(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Kind rule plus the field's own constraints: required, numeric bounds, select options
pub fn validate_field(field: &PropertyFieldDefinition, value: &Value) -> ValidationResult {
    if is_empty(value) {
        return if field.required {
            ValidationResult::invalid(REQUIRED_MESSAGE)
        } else if field.editor == EditorKind::Number {
            // An optional number may be cleared
            ValidationResult::ok()
        } else {
            validate(value, field.editor)
        };
    }

    let result = validate(value, field.editor);
    if !result.valid {
        return result;
    }

    if field.editor == EditorKind::Number {
        if let Some(n) = as_number(value) {
            if let Some(min) = field.min.filter(|min| n < *min) {
                return ValidationResult::invalid(format!("Value must be at least {}", min));
            }
            if let Some(max) = field.max.filter(|max| n > *max) {
                return ValidationResult::invalid(format!("Value must be at most {}", max));
            }
        }
    }

    if field.editor == EditorKind::Select
        && !field.options.is_empty()
        && !field.options.iter().any(|option| &option.value == value)
    {
        return ValidationResult::invalid(OPTION_MESSAGE);
    }

    result
}
