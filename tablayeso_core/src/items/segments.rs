//! # Measurement Segments
//!
//! Raw segment records, as a form or an import supplies them, and their
//! validated counterparts. A segment validates only when every required
//! dimension is present, numeric and > 0. Validated segments keep the raw
//! dimensions and carry two areas: the raw area that panel counts use, and
//! the rule-applied area that framing and finishing use.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::items::field::NumberField;
use crate::rules::apply_minimum_dimension_rule;

fn positive(value: Option<&NumberField>) -> Option<f64> {
    value.and_then(NumberField::value).filter(|v| *v > 0.0)
}

/// Wall segment as entered (meters)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WallSegmentInput {
    pub width: Option<NumberField>,
    pub height: Option<NumberField>,
}

impl WallSegmentInput {
    pub fn new(width: f64, height: f64) -> Self {
        WallSegmentInput {
            width: Some(width.into()),
            height: Some(height.into()),
        }
    }

    /// Validate as the `number`-th (1-based) segment of its item
    pub fn validate(&self, number: usize) -> CalcResult<WallSegment> {
        match (positive(self.width.as_ref()), positive(self.height.as_ref())) {
            (Some(width), Some(height)) => Ok(WallSegment {
                number,
                width,
                height,
                raw_area: width * height,
                area: apply_minimum_dimension_rule(width) * apply_minimum_dimension_rule(height),
            }),
            _ => Err(CalcError::invalid_segment(number, "width and height must be > 0")),
        }
    }
}

/// Validated wall segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub number: usize,
    /// Raw width (m)
    pub width: f64,
    /// Raw height (m)
    pub height: f64,
    /// Raw width × height (m²), the panel demand basis
    pub raw_area: f64,
    /// Rule-applied width × height (m²)
    pub area: f64,
}

impl WallSegment {
    pub fn rule_width(&self) -> f64 {
        apply_minimum_dimension_rule(self.width)
    }

    pub fn rule_height(&self) -> f64 {
        apply_minimum_dimension_rule(self.height)
    }
}

/// Ceiling segment as entered (meters)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CeilingSegmentInput {
    pub width: Option<NumberField>,
    pub length: Option<NumberField>,
}

impl CeilingSegmentInput {
    pub fn new(width: f64, length: f64) -> Self {
        CeilingSegmentInput {
            width: Some(width.into()),
            length: Some(length.into()),
        }
    }

    /// Validate as the `number`-th (1-based) segment of its item
    pub fn validate(&self, number: usize) -> CalcResult<CeilingSegment> {
        match (positive(self.width.as_ref()), positive(self.length.as_ref())) {
            (Some(width), Some(length)) => Ok(CeilingSegment {
                number,
                width,
                length,
                raw_area: width * length,
                area: apply_minimum_dimension_rule(width) * apply_minimum_dimension_rule(length),
            }),
            _ => Err(CalcError::invalid_segment(number, "width and length must be > 0")),
        }
    }
}

/// Validated ceiling segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeilingSegment {
    pub number: usize,
    pub width: f64,
    pub length: f64,
    /// Raw width × length (m²), the panel demand basis
    pub raw_area: f64,
    /// Rule-applied width × length (m²)
    pub area: f64,
}

impl CeilingSegment {
    pub fn rule_width(&self) -> f64 {
        apply_minimum_dimension_rule(self.width)
    }

    pub fn rule_length(&self) -> f64 {
        apply_minimum_dimension_rule(self.length)
    }

    /// Rule-applied perimeter
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.rule_width() + self.rule_length())
    }
}

/// Trim box segment as entered (meters). All three dimensions are required
/// whatever the orientation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrimSegmentInput {
    pub length: Option<NumberField>,
    pub width: Option<NumberField>,
    pub height: Option<NumberField>,
}

impl TrimSegmentInput {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        TrimSegmentInput {
            length: Some(length.into()),
            width: Some(width.into()),
            height: Some(height.into()),
        }
    }

    /// Validate as the `number`-th (1-based) segment of its item.
    ///
    /// `panel_area` is left at zero; the trim calculator fills it in once
    /// orientation and side count are known.
    pub fn validate(&self, number: usize) -> CalcResult<TrimSegment> {
        match (
            positive(self.length.as_ref()),
            positive(self.width.as_ref()),
            positive(self.height.as_ref()),
        ) {
            (Some(length), Some(width), Some(height)) => Ok(TrimSegment {
                number,
                length,
                width,
                height,
                panel_area: 0.0,
            }),
            _ => Err(CalcError::invalid_segment(
                number,
                "length, width and height must be > 0",
            )),
        }
    }
}

/// Validated trim segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimSegment {
    pub number: usize,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Rule-applied face area × side count (m²)
    pub panel_area: f64,
}

impl TrimSegment {
    pub fn rule_length(&self) -> f64 {
        apply_minimum_dimension_rule(self.length)
    }

    pub fn rule_width(&self) -> f64 {
        apply_minimum_dimension_rule(self.width)
    }

    pub fn rule_height(&self) -> f64 {
        apply_minimum_dimension_rule(self.height)
    }
}
