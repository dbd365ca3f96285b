//! Numeric fields as entered.
//!
//! Forms and hand-written files send numbers as JSON numbers, as text
//! (`"2.40"`) or as something else entirely. [`NumberField`] accepts any of
//! them so a bad value reaches validation, where it becomes an item error,
//! instead of failing the whole file at deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A number, numeric text, or any other JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumberField {
    /// Finite numeric value, parsing text leniently (surrounding blanks)
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            NumberField::Number(n) => *n,
            NumberField::Text(s) => s.trim().parse::<f64>().ok()?,
            NumberField::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Non-negative whole value
    pub fn whole(&self) -> Option<u32> {
        let value = self.value()?;
        (value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
    }
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberField::Number(n) => write!(f, "{n}"),
            NumberField::Text(s) => write!(f, "\"{s}\""),
            NumberField::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for NumberField {
    fn from(value: f64) -> Self {
        NumberField::Number(value)
    }
}

impl From<u32> for NumberField {
    fn from(value: u32) -> Self {
        NumberField::Number(f64::from(value))
    }
}

impl From<&str> for NumberField {
    fn from(value: &str) -> Self {
        NumberField::Text(value.to_string())
    }
}

/// Value shown in config errors; `(missing)` when the field is absent
pub(crate) fn shown(field: Option<&NumberField>) -> String {
    field.map_or_else(|| "(missing)".to_string(), ToString::to_string)
}
