//! # Estimate Container
//!
//! The `Estimate` struct holds everything needed to run a calculation:
//! the work-area label and the ordered list of items. Estimates serialize
//! to human-readable JSON, which is also the CLI input format.
//!
//! ## Structure
//!
//! ```text
//! Estimate
//! ├── meta: EstimateMetadata (version, work area, timestamps)
//! └── items: Vec<ItemInput> (walls, ceilings, trims in entry order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tablayeso_core::estimate::Estimate;
//! use tablayeso_core::items::CeilingInput;
//! use tablayeso_core::panels::PanelType;
//!
//! let mut estimate = Estimate::new("Lobby");
//! estimate.add_item(CeilingInput::new(0, PanelType::Normal).with_segment(4.0, 5.0));
//!
//! let result = estimate.calculate();
//! assert!(result.errors.is_empty());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{calculate_materials, CalculationResult};
use crate::errors::{CalcError, CalcResult};
use crate::items::{next_number, ItemInput};

/// Current schema version for estimate files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root estimate container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub meta: EstimateMetadata,

    /// Items in entry order
    #[serde(default)]
    pub items: Vec<ItemInput>,
}

impl Estimate {
    /// Create a new empty estimate for a work area.
    pub fn new(work_area: impl Into<String>) -> Self {
        let now = Utc::now();
        Estimate {
            meta: EstimateMetadata {
                version: SCHEMA_VERSION.to_string(),
                work_area: work_area.into(),
                created: now,
                modified: now,
            },
            items: Vec::new(),
        }
    }

    /// Parse an estimate from JSON.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read an estimate JSON file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_json(&json)
    }

    /// Add an item and return its ordinal number.
    ///
    /// Items without a number (0) get the next one after the highest
    /// number of the same kind.
    pub fn add_item(&mut self, item: impl Into<ItemInput>) -> u32 {
        let mut item = item.into();
        if item.number() == 0 {
            item.set_number(next_number(&self.items, item.kind()));
        }
        let number = item.number();
        self.items.push(item);
        self.touch();
        number
    }

    /// Remove an item by position.
    ///
    /// Returns the removed item if the index was in range.
    pub fn remove_item(&mut self, index: usize) -> Option<ItemInput> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.touch();
        Some(item)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Run the calculation engine over every item.
    pub fn calculate(&self) -> CalculationResult {
        calculate_materials(&self.items, self.meta.work_area.clone())
    }
}

impl Default for Estimate {
    fn default() -> Self {
        Estimate::new("")
    }
}

/// Estimate metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Free-text label for where the work happens, e.g. "Level 2 offices"
    #[serde(default)]
    pub work_area: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}
