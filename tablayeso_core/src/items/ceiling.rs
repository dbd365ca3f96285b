//! # Ceiling Calculation
//!
//! Suspended drywall ceilings.
//!
//! ## Method
//!
//! - Support channels run across the longer span of each segment at 0.90 m
//!   spacing, each cut to the shorter span (raw dimensions).
//! - Furring channels cover the total area at 0.40 m spacing.
//! - Perimeter angle over the summed segment perimeters, less the entered
//!   deduction for walls that need no angle.
//! - One hanger per 0.90 m grid cell; with a plenum, hangers are cut from
//!   furring channel at plenum depth plus 0.10 m each.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::items::finishing::{add_finishing, PanelScrews};
use crate::items::field::{shown, NumberField};
use crate::items::segments::{CeilingSegment, CeilingSegmentInput};
use crate::items::{parse_panel, ItemMaterials};
use crate::materials::Material;
use crate::panels::PanelType;
use crate::rules::{
    apply_minimum_dimension_rule, ceiling_round, ANGLE_LENGTH_M, CHANNEL_LENGTH_M,
    FURRING_SPACING_M, HANGER_EXTRA_M, NAILS_PER_ANGLE, NAILS_PER_CHANNEL, SCREWS_PER_FURRING,
    SCREWS_PER_HANGER, SUPPORT_CHANNEL_LENGTH_M, SUPPORT_SPACING_M,
};

/// Ceiling configuration as entered.
///
/// ## JSON Example
///
/// ```json
/// {
///   "number": 2,
///   "panel": "Resistente a la Humedad",
///   "plenum": 0.5,
///   "angular_deduction": 3.0,
///   "segments": [ { "width": 4.0, "length": 5.0 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CeilingInput {
    #[serde(default)]
    pub number: u32,

    #[serde(default)]
    pub segments: Vec<CeilingSegmentInput>,

    /// Panel type
    pub panel: Option<String>,

    /// Plenum depth in meters (missing means no plenum)
    pub plenum: Option<NumberField>,

    /// Meters of perimeter that need no angle (missing means 0)
    pub angular_deduction: Option<NumberField>,
}

impl CeilingInput {
    pub fn new(number: u32, panel: PanelType) -> Self {
        CeilingInput {
            number,
            panel: Some(panel.trade_name().to_string()),
            ..Default::default()
        }
    }

    pub fn with_segment(mut self, width: f64, length: f64) -> Self {
        self.segments.push(CeilingSegmentInput::new(width, length));
        self
    }

    pub fn with_plenum(mut self, plenum: f64) -> Self {
        self.plenum = Some(plenum.into());
        self
    }

    pub fn with_angular_deduction(mut self, meters: f64) -> Self {
        self.angular_deduction = Some(meters.into());
        self
    }

    /// Validate segments and configuration, collecting every problem.
    pub fn validate(&self) -> Result<CeilingSpec, Vec<CalcError>> {
        let mut errors = Vec::new();
        let mut segments = Vec::new();

        if self.segments.is_empty() {
            errors.push(CalcError::no_segments("Ceiling"));
        } else {
            for (index, raw) in self.segments.iter().enumerate() {
                match raw.validate(index + 1) {
                    Ok(segment) => segments.push(segment),
                    Err(e) => errors.push(e),
                }
            }
            if segments.is_empty() {
                errors.push(CalcError::no_valid_segments("ceiling"));
            }
        }

        let plenum = non_negative("plenum", self.plenum.as_ref(), &mut errors);
        let panel = parse_panel("ceiling panel type", self.panel.as_deref())
            .map_err(|e| errors.push(e))
            .ok();
        let angular_deduction = non_negative("angular deduction", self.angular_deduction.as_ref(), &mut errors);

        match panel {
            Some(panel) if errors.is_empty() => Ok(CeilingSpec::new(
                self.number,
                panel,
                plenum,
                angular_deduction,
                segments,
            )),
            _ => Err(errors),
        }
    }
}

/// Optional length that must be ≥ 0 when given; missing reads as 0
fn non_negative(option: &str, field: Option<&NumberField>, errors: &mut Vec<CalcError>) -> f64 {
    let Some(raw) = field else {
        return 0.0;
    };
    match raw.value() {
        Some(v) if v >= 0.0 => v,
        _ => {
            errors.push(CalcError::invalid_config(option, shown(field), "must be >= 0"));
            0.0
        }
    }
}

/// Validated ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingSpec {
    pub number: u32,
    pub panel: PanelType,
    pub plenum: f64,
    pub angular_deduction: f64,
    pub segments: Vec<CeilingSegment>,
    /// Sum of rule-applied segment areas (m²)
    pub total_area: f64,
    /// Sum of rule-applied segment perimeters (m)
    pub total_perimeter: f64,
    /// Linear meters of support channel from raw dimensions
    pub total_support_meters: f64,
}

impl CeilingSpec {
    fn new(
        number: u32,
        panel: PanelType,
        plenum: f64,
        angular_deduction: f64,
        segments: Vec<CeilingSegment>,
    ) -> Self {
        let total_area = segments.iter().map(|s| s.area).sum();
        let total_perimeter = segments.iter().map(CeilingSegment::perimeter).sum();
        let total_support_meters = segments.iter().map(support_meters).sum();
        CeilingSpec {
            number,
            panel,
            plenum,
            angular_deduction,
            segments,
            total_area,
            total_perimeter,
            total_support_meters,
        }
    }
}

/// Support channel run for one segment
fn support_meters(segment: &CeilingSegment) -> f64 {
    let shorter = segment.width.min(segment.length);
    let longer = segment.width.max(segment.length);
    ((longer / SUPPORT_SPACING_M).floor() + 1.0) * shorter
}

/// Hangers for one segment, one per full grid cell
fn hangers(segment: &CeilingSegment) -> f64 {
    (segment.rule_length() / SUPPORT_SPACING_M).floor()
        * (segment.rule_width() / SUPPORT_SPACING_M).floor()
}

/// Calculate materials for a validated ceiling.
pub fn calculate(spec: &CeilingSpec) -> CalcResult<ItemMaterials> {
    let mut out = ItemMaterials::new();

    for segment in &spec.segments {
        out.panels.add_area(spec.panel, segment.raw_area);
    }

    let area = apply_minimum_dimension_rule(spec.total_area);
    out.other.add(
        Material::FurringChannel,
        area / FURRING_SPACING_M / CHANNEL_LENGTH_M,
    );
    out.other.add(
        Material::SupportChannel,
        spec.total_support_meters / SUPPORT_CHANNEL_LENGTH_M,
    );

    let perimeter = apply_minimum_dimension_rule(spec.total_perimeter);
    let angle_run = (perimeter - spec.angular_deduction).max(0.0);
    out.other.add(Material::AngleTrim, angle_run / ANGLE_LENGTH_M);

    let hanger_count: f64 = spec.segments.iter().map(hangers).sum();
    out.other.add(Material::Hanger, hanger_count);

    let rounded_hangers = ceiling_round(hanger_count);
    if spec.plenum > 0.0 && rounded_hangers > 0 {
        out.other.add(
            Material::HangerFurringChannel,
            rounded_hangers as f64 * (spec.plenum + HANGER_EXTRA_M) / CHANNEL_LENGTH_M,
        );
    }

    add_finishing(&mut out.other, spec.panel.finish_family(), area, PanelScrews::Include);

    let angles = out.other.rounded_get(Material::AngleTrim);
    let supports = out.other.rounded_get(Material::SupportChannel);
    let furring = out.other.rounded_get(Material::FurringChannel);
    let hanger_furring = out.other.rounded_get(Material::HangerFurringChannel);

    let fixings = (angles * NAILS_PER_ANGLE + supports * NAILS_PER_CHANNEL) as f64;
    out.other.add(Material::WasherNail, fixings);
    out.other.add(Material::PowderLoad, fixings);
    out.other.add(
        Material::FineScrewHalfInch,
        (furring * SCREWS_PER_FURRING
            + rounded_hangers * SCREWS_PER_HANGER
            + hanger_furring * SCREWS_PER_HANGER) as f64,
    );

    tracing::debug!(
        ceiling = spec.number,
        area,
        perimeter,
        hangers = hanger_count,
        "ceiling calculated"
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ceiling_4x5(panel: PanelType) -> CeilingSpec {
        CeilingInput::new(1, panel)
            .with_segment(4.0, 5.0)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_spec_totals() {
        let spec = ceiling_4x5(PanelType::Normal);
        assert!((spec.total_area - 20.0).abs() < 1e-9);
        assert!((spec.total_perimeter - 18.0).abs() < 1e-9);
        // floor(5.0 / 0.9) + 1 = 6 channels of 4.0 m
        assert!((spec.total_support_meters - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_light_ceiling() {
        let out = calculate(&ceiling_4x5(PanelType::Normal)).unwrap();

        // 20 / 2.98 = 6.71 -> 7
        assert_eq!(out.panels.finalize()[&PanelType::Normal], 7);

        assert!((out.other.get(Material::FurringChannel) - 20.0 / 0.40 / 3.05).abs() < 1e-9);
        assert!((out.other.get(Material::SupportChannel) - 24.0 / 3.66).abs() < 1e-9);
        assert!((out.other.get(Material::AngleTrim) - 18.0 / 2.44).abs() < 1e-9);

        // floor(5.0 / 0.9) * floor(4.0 / 0.9) = 5 * 4
        assert_eq!(out.other.get(Material::Hanger), 20.0);
        assert_eq!(out.other.get(Material::HangerFurringChannel), 0.0);

        // angle 7.38 -> 8, support 6.56 -> 7: 8 * 5 + 7 * 8
        assert_eq!(out.other.get(Material::WasherNail), 96.0);
        assert_eq!(out.other.get(Material::PowderLoad), 96.0);
        // furring 16.39 -> 17: 17 * 12 + 20 * 2
        assert_eq!(out.other.get(Material::FineScrewHalfInch), 244.0);

        assert!(out.other.get(Material::JointCompound) > 0.0);
        assert!(out.other.get(Material::PaperTape) > 0.0);
        assert!(out.other.get(Material::FineScrewOneInch) > 0.0);
    }

    #[test]
    fn test_durock_ceiling_uses_heavy_finishing() {
        let out = calculate(&ceiling_4x5(PanelType::Durock)).unwrap();
        assert!((out.other.get(Material::Basecoat) - 2.5).abs() < 1e-9);
        assert!((out.other.get(Material::MeshTape) - 20.0).abs() < 1e-9);
        assert!(out.other.get(Material::CoarseScrewOneInch) > 0.0);
        assert_eq!(out.other.get(Material::JointCompound), 0.0);
        assert_eq!(out.other.get(Material::PaperTape), 0.0);
        assert_eq!(out.other.get(Material::FineScrewOneInch), 0.0);
    }

    #[test]
    fn test_plenum_adds_hanger_furring() {
        let spec = CeilingInput::new(1, PanelType::Normal)
            .with_segment(4.0, 5.0)
            .with_plenum(0.5)
            .validate()
            .unwrap();
        let out = calculate(&spec).unwrap();
        let expected = 20.0 * (0.5 + 0.10) / 3.05;
        assert!((out.other.get(Material::HangerFurringChannel) - expected).abs() < 1e-9);
        // 17 * 12 + 20 * 2 + ceil(3.93) * 2
        assert_eq!(out.other.get(Material::FineScrewHalfInch), 252.0);
    }

    #[test]
    fn test_angular_deduction_never_negative() {
        let spec = CeilingInput::new(1, PanelType::Normal)
            .with_segment(4.0, 5.0)
            .with_angular_deduction(50.0)
            .validate()
            .unwrap();
        let out = calculate(&spec).unwrap();
        assert_eq!(out.other.get(Material::AngleTrim), 0.0);
    }

    #[test]
    fn test_small_ceiling_has_no_hangers() {
        let spec = CeilingInput::new(1, PanelType::Normal)
            .with_segment(0.8, 1.2)
            .validate()
            .unwrap();
        let out = calculate(&spec).unwrap();
        // rule width 1.0: floor(1.2 / 0.9) * floor(1.0 / 0.9) = 1
        assert_eq!(out.other.get(Material::Hanger), 1.0);
        // raw area 0.96 < 1.5 goes to the fractional bucket
        let bucket = out.panels.bucket(PanelType::Normal);
        assert!((bucket.fractional_small - 0.96 / 2.98).abs() < 1e-9);
    }

    #[test]
    fn test_validate_config_errors() {
        let input = CeilingInput {
            number: 2,
            segments: vec![CeilingSegmentInput::new(4.0, 5.0)],
            panel: None,
            plenum: Some(NumberField::from(-0.2)),
            angular_deduction: Some(NumberField::from("n/a")),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.error_code() == "INVALID_CONFIG"));
        assert_eq!(
            errors[2],
            CalcError::invalid_config("angular deduction", "\"n/a\"", "must be >= 0")
        );
    }

    #[test]
    fn test_small_ceilings_combine_raw_area_panels() {
        let mut combined = crate::panels::PanelAccumulator::new();
        for number in 1..=3 {
            let spec = CeilingInput::new(number, PanelType::Normal)
                .with_segment(0.9, 1.6)
                .validate()
                .unwrap();
            combined.merge(&calculate(&spec).unwrap().panels);
        }
        // 3 * 1.44 / 2.98 = 1.45 -> 2 panels
        assert_eq!(combined.finalize()[&PanelType::Normal], 2);
    }
}
