//! # Error Types
//!
//! Structured error types for tablayeso_core. Every problem found while
//! validating or calculating an item is one of these values; the engine
//! turns them into the flat, item-tagged message list of a
//! [`CalculationResult`](crate::engine::CalculationResult).
//!
//! ## Example
//!
//! ```rust
//! use tablayeso_core::errors::{CalcError, CalcResult};
//!
//! fn validate_spacing(spacing_m: f64) -> CalcResult<()> {
//!     if spacing_m <= 0.0 {
//!         return Err(CalcError::invalid_config(
//!             "post_spacing",
//!             spacing_m.to_string(),
//!             "post spacing must be > 0",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tablayeso_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for validation, calculation and import.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A measurement segment has missing, non-numeric or non-positive dimensions
    #[error("Segment {segment}: invalid dimensions ({reason})")]
    InvalidSegment { segment: usize, reason: String },

    /// An item-level option is missing or out of range
    #[error("Invalid {option}: {value} ({reason})")]
    InvalidConfig {
        option: String,
        value: String,
        reason: String,
    },

    /// The item has segments, but none of them passed validation
    #[error("No {kind} segment has valid dimensions (> 0)")]
    NoValidSegments { kind: String },

    /// The item has no segments at all
    #[error("{kind} must have at least one measurement segment")]
    NoSegments { kind: String },

    /// Tabular import could not be read
    #[error("Import failed: {reason}")]
    ImportFailed { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidSegment error for the 1-based segment ordinal
    pub fn invalid_segment(segment: usize, reason: impl Into<String>) -> Self {
        CalcError::InvalidSegment {
            segment,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(option: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidConfig {
            option: option.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NoValidSegments error
    pub fn no_valid_segments(kind: impl Into<String>) -> Self {
        CalcError::NoValidSegments { kind: kind.into() }
    }

    /// Create a NoSegments error
    pub fn no_segments(kind: impl Into<String>) -> Self {
        CalcError::NoSegments { kind: kind.into() }
    }

    /// Create an ImportFailed error
    pub fn import_failed(reason: impl Into<String>) -> Self {
        CalcError::ImportFailed {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// True for problems that come from user input rather than the engine
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::InvalidSegment { .. }
                | CalcError::InvalidConfig { .. }
                | CalcError::NoValidSegments { .. }
                | CalcError::NoSegments { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidSegment { .. } => "INVALID_SEGMENT",
            CalcError::InvalidConfig { .. } => "INVALID_CONFIG",
            CalcError::NoValidSegments { .. } => "NO_VALID_SEGMENTS",
            CalcError::NoSegments { .. } => "NO_SEGMENTS",
            CalcError::ImportFailed { .. } => "IMPORT_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

impl From<csv::Error> for CalcError {
    fn from(err: csv::Error) -> Self {
        CalcError::import_failed(err.to_string())
    }
}
