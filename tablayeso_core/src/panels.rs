//! # Panels
//!
//! The fixed panel catalogue and the cross-item panel accumulator.
//!
//! Panel demand is tracked in two buckets per panel type:
//!
//! - **fractional_small**: un-rounded panel counts from contributions below
//!   [`SMALL_AREA_THRESHOLD_M2`]; offcuts are combined and rounded once.
//! - **rounded_other**: per-contribution ceiling-rounded counts, plus whole
//!   panels added directly (two-face wall returns, trim boxes).
//!
//! Finalization gives `ceil(fractional_small) + rounded_other` per type.
//!
//! ## Example
//!
//! ```rust
//! use tablayeso_core::panels::{PanelAccumulator, PanelType};
//!
//! let mut panels = PanelAccumulator::new();
//! panels.add_area(PanelType::Normal, 0.5);
//! panels.add_area(PanelType::Normal, 0.5);
//! panels.add_area(PanelType::Normal, 6.0);
//!
//! // ceil(1.0 / 2.98) + ceil(6.0 / 2.98) = 1 + 3
//! assert_eq!(panels.finalize()[&PanelType::Normal], 4);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::rules::{ceiling_round, PANEL_YIELD_M2, SMALL_AREA_THRESHOLD_M2};

/// Panel types sold for drywall assemblies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelType {
    /// Standard gypsum board
    #[serde(rename = "Normal")]
    Normal,
    /// Moisture-resistant gypsum board
    #[serde(rename = "Resistente a la Humedad")]
    MoistureResistant,
    /// Fire-rated gypsum board
    #[serde(rename = "Resistente al Fuego")]
    FireResistant,
    /// High-impact gypsum board
    #[serde(rename = "Alta Resistencia")]
    HighImpact,
    /// Exterior sheathing board
    #[serde(rename = "Exterior")]
    Exterior,
    /// Cement board
    #[serde(rename = "Durock")]
    Durock,
}

/// Finishing and framing family a panel type belongs to.
///
/// Light panels are finished with compound and paper tape and hung on
/// standard framing with fine-point screws. Heavy panels take basecoat and
/// mesh tape, calibre 20 framing and coarse-point screws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishFamily {
    Light,
    Heavy,
}

impl PanelType {
    /// All panel types, in catalogue order
    pub const ALL: [PanelType; 6] = [
        PanelType::Normal,
        PanelType::MoistureResistant,
        PanelType::FireResistant,
        PanelType::HighImpact,
        PanelType::Exterior,
        PanelType::Durock,
    ];

    /// Catalogue (trade) name, as printed on the bill of materials
    pub fn trade_name(&self) -> &'static str {
        match self {
            PanelType::Normal => "Normal",
            PanelType::MoistureResistant => "Resistente a la Humedad",
            PanelType::FireResistant => "Resistente al Fuego",
            PanelType::HighImpact => "Alta Resistencia",
            PanelType::Exterior => "Exterior",
            PanelType::Durock => "Durock",
        }
    }

    /// The single classification every calculator consults
    pub fn finish_family(&self) -> FinishFamily {
        match self {
            PanelType::Exterior | PanelType::Durock => FinishFamily::Heavy,
            _ => FinishFamily::Light,
        }
    }

    /// Shorthand for `finish_family() == Heavy`
    pub fn is_heavy(&self) -> bool {
        self.finish_family() == FinishFamily::Heavy
    }

    /// Parse from trade names, English names, or kebab/snake variants
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "normal" | "standard" => Ok(PanelType::Normal),
            "resistente a la humedad" | "moisture resistant" | "rh" => Ok(PanelType::MoistureResistant),
            "resistente al fuego" | "fire resistant" | "rf" => Ok(PanelType::FireResistant),
            "alta resistencia" | "high impact" => Ok(PanelType::HighImpact),
            "exterior" => Ok(PanelType::Exterior),
            "durock" | "cement board" => Ok(PanelType::Durock),
            _ => Err(CalcError::invalid_input(
                "panel_type",
                s,
                "Unknown panel type",
            )),
        }
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trade_name())
    }
}

/// Demand buckets for one panel type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelBucket {
    /// Sum of un-rounded counts from small contributions
    pub fractional_small: f64,
    /// Sum of already-rounded counts
    pub rounded_other: u64,
}

impl PanelBucket {
    /// Whole panels to buy for this bucket
    pub fn total(&self) -> u64 {
        ceiling_round(self.fractional_small) + self.rounded_other
    }
}

/// Per-panel-type demand accumulator.
///
/// A plain value: each item fills its own, and a run merges them in one
/// serial reduction. Merging is additive, so the finalized counts do not
/// depend on the order contributions arrive in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelAccumulator {
    buckets: BTreeMap<PanelType, PanelBucket>,
}

impl PanelAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the panel demand of one face or segment of `area_m2`.
    ///
    /// Non-positive areas are ignored.
    pub fn add_area(&mut self, panel: PanelType, area_m2: f64) {
        if !area_m2.is_finite() || area_m2 <= 0.0 {
            return;
        }
        let panel_count = area_m2 / PANEL_YIELD_M2;
        let bucket = self.buckets.entry(panel).or_default();
        if area_m2 < SMALL_AREA_THRESHOLD_M2 {
            bucket.fractional_small += panel_count;
        } else {
            bucket.rounded_other += ceiling_round(panel_count);
        }
    }

    /// Add whole panels straight to the rounded bucket
    pub fn add_whole(&mut self, panel: PanelType, count: u64) {
        if count == 0 {
            return;
        }
        self.buckets.entry(panel).or_default().rounded_other += count;
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &PanelAccumulator) {
        for (panel, theirs) in &other.buckets {
            let ours = self.buckets.entry(*panel).or_default();
            ours.fractional_small += theirs.fractional_small;
            ours.rounded_other += theirs.rounded_other;
        }
    }

    /// Current buckets for a panel type (zeroed if never touched)
    pub fn bucket(&self, panel: PanelType) -> PanelBucket {
        self.buckets.get(&panel).copied().unwrap_or_default()
    }

    /// True when no panel demand has been recorded
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(|b| b.total() == 0)
    }

    /// Final whole-panel count per type; types with zero demand are omitted
    pub fn finalize(&self) -> BTreeMap<PanelType, u64> {
        self.buckets
            .iter()
            .map(|(panel, bucket)| (*panel, bucket.total()))
            .filter(|(_, total)| *total > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_finish_family() {
        assert_eq!(PanelType::Normal.finish_family(), FinishFamily::Light);
        assert_eq!(PanelType::MoistureResistant.finish_family(), FinishFamily::Light);
        assert_eq!(PanelType::FireResistant.finish_family(), FinishFamily::Light);
        assert_eq!(PanelType::HighImpact.finish_family(), FinishFamily::Light);
        assert_eq!(PanelType::Exterior.finish_family(), FinishFamily::Heavy);
        assert_eq!(PanelType::Durock.finish_family(), FinishFamily::Heavy);
    }

    #[test]
    fn test_from_str_flexible() {
        assert_eq!(PanelType::from_str_flexible("normal").unwrap(), PanelType::Normal);
        assert_eq!(
            PanelType::from_str_flexible("Resistente a la Humedad").unwrap(),
            PanelType::MoistureResistant
        );
        assert_eq!(
            PanelType::from_str_flexible("fire-resistant").unwrap(),
            PanelType::FireResistant
        );
        assert_eq!(PanelType::from_str_flexible(" DUROCK ").unwrap(), PanelType::Durock);
        assert!(PanelType::from_str_flexible("plywood").is_err());
    }

    #[test]
    fn test_trade_name_roundtrip() {
        for panel in PanelType::ALL {
            assert_eq!(PanelType::from_str_flexible(panel.trade_name()).unwrap(), panel);
            let json = serde_json::to_string(&panel).unwrap();
            assert_eq!(json, format!("\"{}\"", panel.trade_name()));
        }
    }

    #[test]
    fn test_small_areas_accumulate_fractionally() {
        let mut acc = PanelAccumulator::new();
        // three offcuts of 1.0 m² each: 3 / 2.98 = 1.007 -> 2 panels, not 3
        for _ in 0..3 {
            acc.add_area(PanelType::Normal, 1.0);
        }
        let bucket = acc.bucket(PanelType::Normal);
        assert!((bucket.fractional_small - 3.0 / 2.98).abs() < 1e-9);
        assert_eq!(bucket.rounded_other, 0);
        assert_eq!(acc.finalize()[&PanelType::Normal], 2);
    }

    #[test]
    fn test_large_areas_round_per_contribution() {
        let mut acc = PanelAccumulator::new();
        // 3.0 / 2.98 = 1.007 -> 2 each
        acc.add_area(PanelType::Exterior, 3.0);
        acc.add_area(PanelType::Exterior, 3.0);
        assert_eq!(acc.bucket(PanelType::Exterior).rounded_other, 4);
        assert_eq!(acc.finalize()[&PanelType::Exterior], 4);
    }

    #[test]
    fn test_threshold_boundary_is_rounded_bucket() {
        let mut acc = PanelAccumulator::new();
        acc.add_area(PanelType::Normal, 1.5);
        let bucket = acc.bucket(PanelType::Normal);
        assert_eq!(bucket.fractional_small, 0.0);
        assert_eq!(bucket.rounded_other, 1);
    }

    #[test]
    fn test_non_positive_area_is_noop() {
        let mut acc = PanelAccumulator::new();
        acc.add_area(PanelType::Normal, 0.0);
        acc.add_area(PanelType::Normal, -2.0);
        acc.add_area(PanelType::Normal, f64::NAN);
        acc.add_whole(PanelType::Durock, 0);
        assert!(acc.is_empty());
        assert!(acc.finalize().is_empty());
    }

    #[test]
    fn test_merge_is_order_independent() {
        let contributions = [
            (PanelType::Normal, 0.7),
            (PanelType::Normal, 5.2),
            (PanelType::Durock, 1.1),
            (PanelType::Normal, 0.4),
            (PanelType::Durock, 9.0),
            (PanelType::HighImpact, 1.49),
        ];

        let mut forward = PanelAccumulator::new();
        for (panel, area) in contributions {
            let mut item = PanelAccumulator::new();
            item.add_area(panel, area);
            forward.merge(&item);
        }

        let mut backward = PanelAccumulator::new();
        for (panel, area) in contributions.iter().rev() {
            backward.add_area(*panel, *area);
        }

        assert_eq!(forward.finalize(), backward.finalize());
    }
}
