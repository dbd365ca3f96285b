//! # tablayeso_core - Drywall Materials Estimation Engine
//!
//! `tablayeso_core` turns measured drywall work (partition walls, suspended
//! ceilings and trim boxes) into a bill of materials: panels, framing,
//! finishing products and fasteners, in whole purchasable units.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from item records to a result record
//! - **JSON-First**: All inputs and outputs implement Serialize/Deserialize
//! - **Isolated Failures**: A bad item is reported, never fatal to the run
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use tablayeso_core::estimate::Estimate;
//! use tablayeso_core::items::{CeilingInput, WallInput};
//! use tablayeso_core::panels::PanelType;
//!
//! let mut estimate = Estimate::new("Level 2 offices");
//! estimate.add_item(WallInput::new(0, 2, PanelType::Normal, 0.40).with_segment(3.0, 2.4));
//! estimate.add_item(CeilingInput::new(0, PanelType::MoistureResistant).with_segment(4.0, 5.0));
//!
//! let result = estimate.calculate();
//! for line in result.bill.lines() {
//!     println!("{}: {} {}", line.name, line.quantity, line.unit.label());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`rules`] - Shared constants and rounding rules
//! - [`panels`] - Panel types and the panel demand accumulator
//! - [`materials`] - Material catalogue and the bill of materials
//! - [`items`] - Walls, ceilings and trims: input, validation, calculation
//! - [`engine`] - Runs all items and aggregates the bill
//! - [`estimate`] - Estimate container (the CLI input file)
//! - [`import`] - CSV segment import
//! - [`export`] - CSV bill export
//! - [`errors`] - Structured error types

pub mod engine;
pub mod errors;
pub mod estimate;
pub mod export;
pub mod import;
pub mod items;
pub mod materials;
pub mod panels;
pub mod rules;

// Re-export commonly used types at crate root for convenience
pub use engine::{calculate_materials, CalculationResult};
pub use errors::{CalcError, CalcResult};
pub use estimate::{Estimate, EstimateMetadata};
pub use export::{export_bill_csv, write_bill_csv};
pub use import::{import_segments, import_segments_from_path, ImportReport};
pub use items::{ItemInput, ItemKind, ItemSpec, NumberField};
pub use materials::{BillOfMaterials, Material};
pub use panels::PanelType;
