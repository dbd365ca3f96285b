//! # Calculation Engine
//!
//! Runs a full estimate: validates and calculates every item on its own,
//! then folds the per-item outcomes into one bill of materials.
//!
//! ## Failure isolation
//!
//! A bad item never aborts the run. Its problems are recorded as one
//! message tagged with the item's kind and number, it contributes nothing
//! to the bill, and the remaining items are processed normally. A result
//! can therefore hold both a non-empty bill and errors.
//!
//! ## Reduction
//!
//! Items are evaluated independently into private [`ItemMaterials`]. The
//! reduction then runs serially: each item's panel accumulator is merged,
//! and each item's float quantities are ceiling-rounded and summed. Panel
//! totals are finalized once, after the last item.
//!
//! ## Example
//!
//! ```rust
//! use tablayeso_core::engine::calculate_materials;
//! use tablayeso_core::items::{ItemInput, WallInput};
//! use tablayeso_core::panels::PanelType;
//!
//! let wall = WallInput::new(1, 1, PanelType::Normal, 0.40).with_segment(3.0, 2.4);
//! let result = calculate_materials(&[ItemInput::from(wall)], "Level 2 offices");
//!
//! assert!(result.errors.is_empty());
//! assert_eq!(result.bill.quantity_by_name("Postes"), 8);
//! assert_eq!(result.bill.quantity_by_name("Paneles de Normal"), 3);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcError;
use crate::items::{number_items, ItemInput, ItemMaterials, ItemSpec};
use crate::materials::BillOfMaterials;
use crate::panels::PanelAccumulator;

/// Message reported for a run with no items
pub const NO_ITEMS_MESSAGE: &str =
    "No items to calculate. Add at least one wall, ceiling or trim item.";

/// Everything a run produces, ready for reporting and export.
///
/// Exporters render these values as they are; quantities are final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique id for this run
    pub id: Uuid,

    /// When the run completed
    pub calculated_at: DateTime<Utc>,

    /// Work area label, passed through unchanged
    pub work_area: String,

    /// Quantities to buy
    pub bill: BillOfMaterials,

    /// Items that were calculated, in input order
    pub items: Vec<ItemSpec>,

    /// One message per rejected item, in input order
    pub errors: Vec<String>,
}

impl CalculationResult {
    fn empty(work_area: String) -> Self {
        CalculationResult {
            id: Uuid::new_v4(),
            calculated_at: Utc::now(),
            work_area,
            bill: BillOfMaterials::new(),
            items: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when nothing was calculated
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.bill.is_empty()
    }

    /// Some items calculated and some rejected
    pub fn is_partial(&self) -> bool {
        !self.items.is_empty() && self.has_errors()
    }
}

/// Result of evaluating a single item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// The item validated and calculated
    Calculated {
        spec: ItemSpec,
        materials: ItemMaterials,
    },
    /// The item failed validation or calculation
    Rejected { label: String, problems: Vec<CalcError> },
}

impl ItemOutcome {
    /// True when every problem comes from the item's own input
    pub fn is_input_error(&self) -> bool {
        match self {
            ItemOutcome::Calculated { .. } => false,
            ItemOutcome::Rejected { problems, .. } => problems.iter().all(CalcError::is_input_error),
        }
    }

    /// Human-readable message for a rejected item
    pub fn error_message(&self) -> Option<String> {
        match self {
            ItemOutcome::Calculated { .. } => None,
            ItemOutcome::Rejected { label, problems } => {
                if let [CalcError::Internal { message }] = problems.as_slice() {
                    return Some(format!("Unexpected error processing {label}: {message}"));
                }
                let details: Vec<String> = problems.iter().map(ToString::to_string).collect();
                Some(format!("{label}: {}", details.join(", ")))
            }
        }
    }
}

/// Validate and calculate one item in isolation.
pub fn evaluate_item(item: &ItemInput) -> ItemOutcome {
    let spec = match item.validate() {
        Ok(spec) => spec,
        Err(problems) => {
            return ItemOutcome::Rejected {
                label: item.label(),
                problems,
            }
        }
    };

    match spec.calculate() {
        Ok(materials) => ItemOutcome::Calculated { spec, materials },
        Err(e) => ItemOutcome::Rejected {
            label: spec.label(),
            problems: vec![e],
        },
    }
}

/// Fold item outcomes into a result, in the order given.
pub fn reduce_outcomes(
    outcomes: impl IntoIterator<Item = ItemOutcome>,
    work_area: impl Into<String>,
) -> CalculationResult {
    let mut result = CalculationResult::empty(work_area.into());
    let mut panels = PanelAccumulator::new();

    for outcome in outcomes {
        match outcome {
            ItemOutcome::Calculated { spec, materials } => {
                panels.merge(&materials.panels);
                result.bill.add_rounded(&materials.other.rounded());
                result.items.push(spec);
            }
            rejected @ ItemOutcome::Rejected { .. } => {
                let message = rejected.error_message().unwrap_or_default();
                if rejected.is_input_error() {
                    tracing::warn!(%message, "item rejected");
                } else {
                    tracing::error!(%message, "item failed");
                }
                result.errors.push(message);
            }
        }
    }

    result.bill.insert_panels(&panels.finalize());
    result
}

/// Run a full calculation over `items`.
///
/// Items without an ordinal number (0) are numbered per kind, as
/// [`Estimate::add_item`](crate::estimate::Estimate::add_item) numbers them.
pub fn calculate_materials(items: &[ItemInput], work_area: impl Into<String>) -> CalculationResult {
    let work_area = work_area.into();

    if items.is_empty() {
        tracing::info!("no items to calculate");
        let mut result = CalculationResult::empty(work_area);
        result.errors.push(NO_ITEMS_MESSAGE.to_string());
        return result;
    }

    tracing::info!(items = items.len(), work_area = %work_area, "calculating materials");

    let outcomes: Vec<ItemOutcome> = number_items(items).iter().map(evaluate_item).collect();

    let result = reduce_outcomes(outcomes, work_area);
    tracing::info!(
        calculated = result.items.len(),
        rejected = result.errors.len(),
        materials = result.bill.len(),
        "calculation finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{CeilingInput, TrimInput, TrimOrientation, WallInput, WallSegmentInput};
    use crate::materials::Material;
    use crate::panels::PanelType;
    use pretty_assertions::assert_eq;

    fn wall() -> ItemInput {
        WallInput::new(1, 1, PanelType::Normal, 0.40)
            .with_segment(3.0, 2.4)
            .into()
    }

    fn ceiling() -> ItemInput {
        CeilingInput::new(2, PanelType::Durock)
            .with_segment(4.0, 5.0)
            .with_plenum(0.6)
            .into()
    }

    fn trim() -> ItemInput {
        TrimInput::new(3, TrimOrientation::Horizontal, PanelType::Normal, 2)
            .with_segment(6.0, 1.2, 0.5)
            .into()
    }

    #[test]
    fn test_no_items() {
        let result = calculate_materials(&[], "Lobby");
        assert!(result.bill.is_empty());
        assert!(result.items.is_empty());
        assert_eq!(result.errors, vec![NO_ITEMS_MESSAGE.to_string()]);
        assert_eq!(result.work_area, "Lobby");
    }

    #[test]
    fn test_single_wall_bill() {
        let result = calculate_materials(&[wall()], "");
        assert!(!result.has_errors());
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.bill.quantity(Material::LightPost), 8);
        assert_eq!(result.bill.quantity(Material::LightChannel), 2);
        assert_eq!(result.bill.quantity(Material::Panel(PanelType::Normal)), 3);
        assert_eq!(result.bill.quantity(Material::WasherNail), 16);
        assert!(!result.bill.contains(Material::HeavyPost));
    }

    #[test]
    fn test_durock_ceiling_routes_heavy_finishing() {
        let result = calculate_materials(&[ceiling()], "");
        assert!(result.bill.contains(Material::Basecoat));
        assert!(result.bill.contains(Material::MeshTape));
        assert!(result.bill.contains(Material::CoarseScrewOneInch));
        assert!(!result.bill.contains(Material::JointCompound));
        assert!(!result.bill.contains(Material::PaperTape));
        assert_eq!(result.bill.quantity(Material::Panel(PanelType::Durock)), 7);
    }

    #[test]
    fn test_invalid_item_is_isolated() {
        let bad = WallInput {
            number: 2,
            segments: vec![WallSegmentInput::new(-1.0, 2.4)],
            ..match wall() {
                ItemInput::Wall(w) => w,
                _ => unreachable!(),
            }
        };
        let result = calculate_materials(&[wall(), bad.into()], "");

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Wall #2: Segment 1: invalid dimensions"));
        assert!(result.is_partial());

        let alone = calculate_materials(&[wall()], "");
        assert_eq!(result.bill, alone.bill);
    }

    #[test]
    fn test_invalid_segment_discards_valid_siblings() {
        let mixed: ItemInput = WallInput::new(1, 1, PanelType::Normal, 0.40)
            .with_segment(3.0, 2.4)
            .with_segment(0.0, 2.4)
            .into();
        let result = calculate_materials(&[mixed], "");
        assert!(result.bill.is_empty());
        assert!(result.items.is_empty());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let forward = calculate_materials(&[wall(), ceiling(), trim()], "");
        let backward = calculate_materials(&[trim(), ceiling(), wall()], "");
        assert_eq!(forward.bill, backward.bill);
    }

    #[test]
    fn test_items_round_before_summing() {
        let two_walls = calculate_materials(&[wall(), wall()], "");
        // each wall rounds 1.97 channels to 2 before summing
        assert_eq!(two_walls.bill.quantity(Material::LightChannel), 4);
        assert_eq!(two_walls.bill.quantity(Material::LightPost), 16);
    }

    #[test]
    fn test_small_panel_demand_combines_across_items() {
        let small = |n| -> ItemInput {
            CeilingInput::new(n, PanelType::Normal)
                .with_segment(1.0, 1.0)
                .into()
        };
        // three 1 m² ceilings: 3 / 2.98 -> 2 panels, not 3
        let result = calculate_materials(&[small(1), small(2), small(3)], "");
        assert_eq!(result.bill.quantity(Material::Panel(PanelType::Normal)), 2);
    }

    #[test]
    fn test_unnumbered_items_are_numbered_per_kind() {
        let mut first = wall();
        first.set_number(0);
        let empty_ceiling: ItemInput = CeilingInput::default().into();
        let empty_wall: ItemInput = WallInput::new(0, 1, PanelType::Normal, 0.40).into();
        let result = calculate_materials(&[empty_ceiling, first, empty_wall], "");

        assert_eq!(result.items[0].label(), "Wall #1");
        assert!(result.errors[0].starts_with("Ceiling #1:"));
        assert!(result.errors[1].starts_with("Wall #2:"));
    }

    #[test]
    fn test_internal_error_message() {
        let outcome = ItemOutcome::Rejected {
            label: "Trim #4".to_string(),
            problems: vec![CalcError::internal("non-finite quantity")],
        };
        assert_eq!(
            outcome.error_message().unwrap(),
            "Unexpected error processing Trim #4: non-finite quantity"
        );
    }

    #[test]
    fn test_result_serialization() {
        let result = calculate_materials(&[wall(), ceiling()], "Block B");
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("Block B"));
        assert!(json.contains("Paneles de Durock"));
        let roundtrip: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.bill, result.bill);
        assert_eq!(roundtrip.items, result.items);
    }
}
