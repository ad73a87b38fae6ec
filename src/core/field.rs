//! Form field values

use serde::{Deserialize, Serialize};
use std::fmt;

/// The current value of a form control: text, a number, or nothing yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Number(f64),
    String(String),
}

impl FieldValue {
    /// Get the value as a string if it is one
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a number, parsing strings when they hold one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::String(s) => s.trim().parse().ok(),
            FieldValue::Null => None,
        }
    }

    /// Null or the empty string
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::String(s) => s.is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Length in characters of the value's text form
    pub fn char_len(&self) -> usize {
        match self {
            FieldValue::Null => 0,
            FieldValue::String(s) => s.chars().count(),
            FieldValue::Number(_) => self.to_string().chars().count(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        FieldValue::Number(f64::from(value))
    }
}
