//! # Trim Box Calculation
//!
//! Drywall trim boxes ("cenefas") built along a run of ceiling or wall.
//!
//! Panels for a trim box are always bought as whole sheets: the total panel
//! area gets a 15% waste allowance and at least one panel is billed. A
//! horizontal box also needs furring channel lines across its width, and
//! every box gets angle along both long edges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::items::finishing::{add_finishing, PanelScrews};
use crate::items::field::{shown, NumberField};
use crate::items::segments::{TrimSegment, TrimSegmentInput};
use crate::items::{parse_panel, ItemMaterials};
use crate::materials::Material;
use crate::panels::PanelType;
use crate::rules::{
    apply_minimum_dimension_rule, ceiling_round, ANGLE_LENGTH_M, ANGLE_SPLICE_M,
    CHANNEL_LENGTH_M, FURRING_SPACING_M, NAILS_PER_ANGLE, PANEL_YIELD_M2, POST_SPLICE_M,
    SCREWS_PER_ANGLE, SCREWS_PER_PANEL, SCREWS_PER_POST, TRIM_WASTE_FACTOR,
};

/// Main orientation of the trim box's paneled faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimOrientation {
    /// Faces are length × height
    Horizontal,
    /// Faces are length × width
    Vertical,
}

impl TrimOrientation {
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "horizontal" => Ok(TrimOrientation::Horizontal),
            "vertical" => Ok(TrimOrientation::Vertical),
            _ => Err(CalcError::invalid_config(
                "trim orientation",
                s,
                "must be horizontal or vertical",
            )),
        }
    }
}

impl fmt::Display for TrimOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrimOrientation::Horizontal => f.write_str("horizontal"),
            TrimOrientation::Vertical => f.write_str("vertical"),
        }
    }
}

/// Trim box configuration as entered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrimInput {
    #[serde(default)]
    pub number: u32,

    #[serde(default)]
    pub segments: Vec<TrimSegmentInput>,

    /// `horizontal` or `vertical`
    pub orientation: Option<String>,

    /// Panel type
    pub panel: Option<String>,

    /// Number of paneled sides (≥ 1)
    pub sides: Option<NumberField>,

    /// Furring channel spacing in meters; standard spacing when unset or
    /// not positive
    pub furring_spacing: Option<NumberField>,
}

impl TrimInput {
    pub fn new(number: u32, orientation: TrimOrientation, panel: PanelType, sides: u32) -> Self {
        TrimInput {
            number,
            segments: Vec::new(),
            orientation: Some(orientation.to_string()),
            panel: Some(panel.trade_name().to_string()),
            sides: Some(sides.into()),
            furring_spacing: None,
        }
    }

    pub fn with_segment(mut self, length: f64, width: f64, height: f64) -> Self {
        self.segments.push(TrimSegmentInput::new(length, width, height));
        self
    }

    pub fn with_furring_spacing(mut self, spacing: f64) -> Self {
        self.furring_spacing = Some(spacing.into());
        self
    }

    /// Validate segments and configuration, collecting every problem.
    pub fn validate(&self) -> Result<TrimSpec, Vec<CalcError>> {
        let mut errors = Vec::new();
        let mut segments = Vec::new();

        if self.segments.is_empty() {
            errors.push(CalcError::no_segments("Trim"));
        } else {
            for (index, raw) in self.segments.iter().enumerate() {
                match raw.validate(index + 1) {
                    Ok(segment) => segments.push(segment),
                    Err(e) => errors.push(e),
                }
            }
            if segments.is_empty() {
                errors.push(CalcError::no_valid_segments("trim"));
            }
        }

        let orientation = match self.orientation.as_deref() {
            Some(raw) => TrimOrientation::from_str_flexible(raw)
                .map_err(|e| errors.push(e))
                .ok(),
            None => {
                errors.push(CalcError::invalid_config(
                    "trim orientation",
                    "(missing)",
                    "must be horizontal or vertical",
                ));
                None
            }
        };

        let panel = parse_panel("trim panel type", self.panel.as_deref())
            .map_err(|e| errors.push(e))
            .ok();

        let sides = match self.sides.as_ref().and_then(NumberField::whole) {
            Some(s) if s >= 1 => Some(s),
            _ => {
                errors.push(CalcError::invalid_config(
                    "trim side count",
                    shown(self.sides.as_ref()),
                    "must be a whole number > 0",
                ));
                None
            }
        };

        let furring_spacing = match &self.furring_spacing {
            None => FURRING_SPACING_M,
            Some(raw) => match raw.value() {
                Some(s) if s > 0.0 => s,
                _ => {
                    tracing::warn!(
                        trim = self.number,
                        spacing = %raw,
                        "invalid furring spacing, using standard spacing"
                    );
                    FURRING_SPACING_M
                }
            },
        };

        match (orientation, panel, sides) {
            (Some(orientation), Some(panel), Some(sides)) if errors.is_empty() => Ok(TrimSpec::new(
                self.number,
                orientation,
                panel,
                sides,
                furring_spacing,
                segments,
            )),
            _ => Err(errors),
        }
    }
}

/// Validated trim box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimSpec {
    pub number: u32,
    pub orientation: TrimOrientation,
    pub panel: PanelType,
    pub sides: u32,
    pub furring_spacing: f64,
    pub segments: Vec<TrimSegment>,
    /// Sum of segment panel areas, sides included (m²)
    pub total_panel_area: f64,
    /// Sum of rule-applied lengths (m)
    pub total_length: f64,
    /// Sum of rule-applied widths (m)
    pub total_width: f64,
    /// Sum of rule-applied heights (m)
    pub total_height: f64,
}

impl TrimSpec {
    fn new(
        number: u32,
        orientation: TrimOrientation,
        panel: PanelType,
        sides: u32,
        furring_spacing: f64,
        mut segments: Vec<TrimSegment>,
    ) -> Self {
        for segment in &mut segments {
            let face = match orientation {
                TrimOrientation::Horizontal => segment.rule_length() * segment.rule_height(),
                TrimOrientation::Vertical => segment.rule_length() * segment.rule_width(),
            };
            segment.panel_area = face * f64::from(sides);
        }

        TrimSpec {
            number,
            orientation,
            panel,
            sides,
            furring_spacing,
            total_panel_area: segments.iter().map(|s| s.panel_area).sum(),
            total_length: segments.iter().map(TrimSegment::rule_length).sum(),
            total_width: segments.iter().map(TrimSegment::rule_width).sum(),
            total_height: segments.iter().map(TrimSegment::rule_height).sum(),
            segments,
        }
    }

    /// Whole panels to buy: waste allowance applied, never less than one
    pub fn panel_count(&self) -> u64 {
        if self.total_panel_area <= 0.0 {
            return 0;
        }
        let with_waste = self.total_panel_area / PANEL_YIELD_M2 * (1.0 + TRIM_WASTE_FACTOR);
        if with_waste <= 1.0 {
            1
        } else {
            ceiling_round(with_waste)
        }
    }
}

/// Furring channel pieces for a horizontal trim box
fn horizontal_furring(length: f64, width: f64, spacing: f64) -> f64 {
    if length <= 0.0 || width <= 0.0 {
        return 0.0;
    }
    let lines = length / spacing;
    let splices = (width / CHANNEL_LENGTH_M).ceil() - 1.0;
    let per_line = (width + splices * POST_SPLICE_M).max(0.0);
    lines * per_line / CHANNEL_LENGTH_M
}

/// Angle pieces for both long edges of a trim box, splices included
fn edge_angle(length: f64) -> f64 {
    if length <= 0.0 {
        return 0.0;
    }
    let pieces = (length / ANGLE_LENGTH_M).ceil() * 2.0;
    let splices = (pieces - 1.0).max(0.0);
    (length * 2.0 + splices * ANGLE_SPLICE_M) / ANGLE_LENGTH_M
}

/// Calculate materials for a validated trim box.
pub fn calculate(spec: &TrimSpec) -> CalcResult<ItemMaterials> {
    let mut out = ItemMaterials::new();
    let family = spec.panel.finish_family();
    let panel_screw = Material::panel_screw_for(family);

    let panels = spec.panel_count();
    out.panels.add_whole(spec.panel, panels);
    out.other.add(panel_screw, panels as f64 * SCREWS_PER_PANEL);

    let length = apply_minimum_dimension_rule(spec.total_length);
    let width = apply_minimum_dimension_rule(spec.total_width);

    if spec.orientation == TrimOrientation::Horizontal {
        let furring = horizontal_furring(length, width, spec.furring_spacing);
        out.other.add(Material::TrimFurringChannel, furring);
        out.other.add(
            Material::FineScrewHalfInch,
            (ceiling_round(furring) * SCREWS_PER_POST) as f64,
        );
    }

    let angle = edge_angle(length);
    if angle > 0.0 {
        out.other.add(Material::TrimAngle, angle);
        let angle_run = apply_minimum_dimension_rule(angle * ANGLE_LENGTH_M);
        out.other.add(panel_screw, angle_run * (SCREWS_PER_ANGLE / ANGLE_LENGTH_M));
        let fixings = (ceiling_round(angle) * NAILS_PER_ANGLE) as f64;
        out.other.add(Material::WasherNail, fixings);
        out.other.add(Material::PowderLoad, fixings);
    }

    add_finishing(
        &mut out.other,
        family,
        apply_minimum_dimension_rule(spec.total_panel_area),
        PanelScrews::Exclude,
    );

    tracing::debug!(
        trim = spec.number,
        panels,
        panel_area = spec.total_panel_area,
        "trim calculated"
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_trim() -> TrimSpec {
        TrimInput::new(1, TrimOrientation::Horizontal, PanelType::Normal, 2)
            .with_segment(6.0, 1.2, 0.5)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_panel_area_by_orientation() {
        let horizontal = horizontal_trim();
        // rule height 1.0: 6.0 * 1.0 * 2 sides
        assert!((horizontal.total_panel_area - 12.0).abs() < 1e-9);

        let vertical = TrimInput::new(1, TrimOrientation::Vertical, PanelType::Normal, 2)
            .with_segment(6.0, 1.2, 0.5)
            .validate()
            .unwrap();
        assert!((vertical.total_panel_area - 14.4).abs() < 1e-9);
        assert!((vertical.segments[0].panel_area - 14.4).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_one_panel() {
        let spec = TrimInput::new(1, TrimOrientation::Vertical, PanelType::Normal, 1)
            .with_segment(1.0, 1.0, 1.0)
            .validate()
            .unwrap();
        // 1.0 / 2.98 * 1.15 = 0.386
        assert_eq!(spec.panel_count(), 1);
        let out = calculate(&spec).unwrap();
        assert_eq!(out.panels.finalize()[&PanelType::Normal], 1);
    }

    #[test]
    fn test_trim_panels_bypass_fractional_bucket() {
        let spec = horizontal_trim();
        // 12 / 2.98 * 1.15 = 4.63 -> 5
        assert_eq!(spec.panel_count(), 5);
        let out = calculate(&spec).unwrap();
        let bucket = out.panels.bucket(PanelType::Normal);
        assert_eq!(bucket.fractional_small, 0.0);
        assert_eq!(bucket.rounded_other, 5);
    }

    #[test]
    fn test_horizontal_trim_materials() {
        let out = calculate(&horizontal_trim()).unwrap();

        // 6.0 / 0.40 = 15 lines of 1.2 m (no splice) / 3.05
        let furring = 15.0 * 1.2 / 3.05;
        assert!((out.other.get(Material::TrimFurringChannel) - furring).abs() < 1e-9);
        // ceil(5.9) * 4
        assert_eq!(out.other.get(Material::FineScrewHalfInch), 24.0);

        // ceil(6.0 / 2.44) * 2 = 6 pieces, 5 splices: (12 + 0.75) / 2.44
        let angle = 12.75 / 2.44;
        assert!((out.other.get(Material::TrimAngle) - angle).abs() < 1e-9);
        // ceil(5.23) * 5
        assert_eq!(out.other.get(Material::WasherNail), 30.0);
        assert_eq!(out.other.get(Material::PowderLoad), 30.0);

        // 5 panels * 40 + 12.75 * 5 / 2.44
        let screws = 200.0 + 12.75 * 5.0 / 2.44;
        assert!((out.other.get(Material::FineScrewOneInch) - screws).abs() < 1e-9);

        assert!((out.other.get(Material::JointCompound) - 12.0 / 22.0).abs() < 1e-9);
        assert!((out.other.get(Material::Sandpaper) - 12.0 / 2.98 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_trim_has_no_furring() {
        let spec = TrimInput::new(1, TrimOrientation::Vertical, PanelType::Exterior, 1)
            .with_segment(3.0, 0.6, 0.3)
            .validate()
            .unwrap();
        let out = calculate(&spec).unwrap();
        assert_eq!(out.other.get(Material::TrimFurringChannel), 0.0);
        assert_eq!(out.other.get(Material::FineScrewHalfInch), 0.0);
        assert!(out.other.get(Material::CoarseScrewOneInch) > 0.0);
        assert!(out.other.get(Material::Basecoat) > 0.0);
        assert_eq!(out.other.get(Material::FineScrewOneInch), 0.0);
    }

    #[test]
    fn test_wide_trim_adds_furring_splices() {
        assert!((horizontal_furring(4.0, 4.0, 0.40) - 10.0 * 4.3 / 3.05).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_furring_spacing_uses_standard() {
        let spec = TrimInput::new(1, TrimOrientation::Horizontal, PanelType::Normal, 1)
            .with_segment(2.0, 1.0, 0.4)
            .with_furring_spacing(-1.0)
            .validate()
            .unwrap();
        assert_eq!(spec.furring_spacing, FURRING_SPACING_M);
    }

    #[test]
    fn test_validate_config_errors() {
        let input = TrimInput {
            number: 5,
            segments: vec![TrimSegmentInput::new(2.0, 0.3, 0.3)],
            orientation: Some("diagonal".to_string()),
            panel: Some("Normal".to_string()),
            sides: Some(NumberField::from(0u32)),
            furring_spacing: None,
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].to_string().contains("trim orientation"));
        assert!(errors[1].to_string().contains("trim side count"));
    }
}
