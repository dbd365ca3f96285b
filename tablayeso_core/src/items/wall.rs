//! # Wall Calculation
//!
//! Framed drywall partitions with one or two faces.
//!
//! ## Method
//!
//! - Panels per face and segment through the panel accumulator; a two-face
//!   segment no wider than 0.60 m and no taller than 2.44 m takes a single
//!   wrapped panel of the face 1 type instead.
//! - Posts per segment at the given spacing, scaled for vertical splices on
//!   walls taller than a standard post.
//! - Top and bottom track over the total (rule-applied) width.
//! - Framing gauge follows the face 1 panel family; a double structure whose
//!   faces belong to different families gets one full layer of each gauge.
//! - Finishing per face over the total area, fasteners from the rounded
//!   post and track counts.
//!
//! ## Example
//!
//! ```rust
//! use tablayeso_core::items::wall::{calculate, WallInput};
//! use tablayeso_core::materials::Material;
//! use tablayeso_core::panels::PanelType;
//!
//! let input = WallInput::new(1, 1, PanelType::Normal, 0.40).with_segment(3.0, 2.4);
//! let spec = input.validate().unwrap();
//! let materials = calculate(&spec).unwrap();
//!
//! // floor(3.0 / 0.40) + 1
//! assert_eq!(materials.other.get(Material::LightPost), 8.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::items::finishing::{add_finishing, PanelScrews};
use crate::items::field::{shown, NumberField};
use crate::items::segments::{WallSegment, WallSegmentInput};
use crate::items::{parse_panel, ItemMaterials};
use crate::materials::Material;
use crate::panels::{FinishFamily, PanelType};
use crate::rules::{
    apply_minimum_dimension_rule, CHANNEL_LENGTH_M, NAILS_PER_CHANNEL, POST_LENGTH_M,
    POST_SPLICE_M, SCREWS_PER_POST, SHORT_DOUBLE_WALL_MAX_WIDTH_M,
    TWO_FACE_OPTIMIZATION_MAX_HEIGHT_M, TWO_FACE_OPTIMIZATION_MAX_WIDTH_M,
};

/// Wall configuration as entered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WallInput {
    /// Ordinal number shown to the user
    #[serde(default)]
    pub number: u32,

    /// Measurement segments, in display order
    #[serde(default)]
    pub segments: Vec<WallSegmentInput>,

    /// Number of faces to cover (1 or 2)
    pub faces: Option<NumberField>,

    /// Panel type for face 1
    pub face1_panel: Option<String>,

    /// Panel type for face 2 (read only when `faces == 2`)
    pub face2_panel: Option<String>,

    /// Post spacing in meters
    pub post_spacing: Option<NumberField>,

    /// Two independent stud layers
    #[serde(default)]
    pub double_structure: bool,
}

impl WallInput {
    pub fn new(number: u32, faces: u32, face1_panel: PanelType, post_spacing: f64) -> Self {
        WallInput {
            number,
            segments: Vec::new(),
            faces: Some(faces.into()),
            face1_panel: Some(face1_panel.trade_name().to_string()),
            face2_panel: None,
            post_spacing: Some(post_spacing.into()),
            double_structure: false,
        }
    }

    pub fn with_face2(mut self, panel: PanelType) -> Self {
        self.face2_panel = Some(panel.trade_name().to_string());
        self
    }

    pub fn with_segment(mut self, width: f64, height: f64) -> Self {
        self.segments.push(WallSegmentInput::new(width, height));
        self
    }

    pub fn with_double_structure(mut self, double: bool) -> Self {
        self.double_structure = double;
        self
    }

    /// Validate segments and configuration, collecting every problem.
    pub fn validate(&self) -> Result<WallSpec, Vec<CalcError>> {
        let mut errors = Vec::new();
        let mut segments = Vec::new();

        if self.segments.is_empty() {
            errors.push(CalcError::no_segments("Wall"));
        } else {
            for (index, raw) in self.segments.iter().enumerate() {
                match raw.validate(index + 1) {
                    Ok(segment) => segments.push(segment),
                    Err(e) => errors.push(e),
                }
            }
            if segments.is_empty() {
                errors.push(CalcError::no_valid_segments("wall"));
            }
        }

        let faces = match self.faces.as_ref().and_then(NumberField::whole) {
            Some(f @ (1 | 2)) => Some(f),
            _ => {
                errors.push(CalcError::invalid_config(
                    "face count",
                    shown(self.faces.as_ref()),
                    "must be 1 or 2",
                ));
                None
            }
        };

        let post_spacing = match self.post_spacing.as_ref().and_then(NumberField::value) {
            Some(s) if s > 0.0 => Some(s),
            _ => {
                errors.push(CalcError::invalid_config(
                    "post spacing",
                    shown(self.post_spacing.as_ref()),
                    "must be > 0",
                ));
                None
            }
        };

        let face1_panel = parse_panel("face 1 panel type", self.face1_panel.as_deref())
            .map_err(|e| errors.push(e))
            .ok();

        let face2_panel = if faces == Some(2) {
            parse_panel("face 2 panel type", self.face2_panel.as_deref())
                .map_err(|e| errors.push(e))
                .ok()
        } else {
            None
        };

        match (faces, post_spacing, face1_panel) {
            (Some(faces), Some(post_spacing), Some(face1_panel)) if errors.is_empty() => {
                Ok(WallSpec::new(
                    self.number,
                    faces,
                    face1_panel,
                    face2_panel,
                    post_spacing,
                    self.double_structure,
                    segments,
                ))
            }
            _ => Err(errors),
        }
    }
}

/// Validated wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub number: u32,
    pub faces: u32,
    pub face1_panel: PanelType,
    pub face2_panel: Option<PanelType>,
    pub post_spacing: f64,
    pub double_structure: bool,
    pub segments: Vec<WallSegment>,
    /// Sum of rule-applied segment areas (m²)
    pub total_area: f64,
    /// Sum of rule-applied segment widths (m)
    pub total_width: f64,
    /// Sum of raw segment widths (m)
    pub total_raw_width: f64,
}

impl WallSpec {
    fn new(
        number: u32,
        faces: u32,
        face1_panel: PanelType,
        face2_panel: Option<PanelType>,
        post_spacing: f64,
        double_structure: bool,
        segments: Vec<WallSegment>,
    ) -> Self {
        let total_area = segments.iter().map(|s| s.area).sum();
        let total_width = segments.iter().map(WallSegment::rule_width).sum();
        let total_raw_width = segments.iter().map(|s| s.width).sum();
        WallSpec {
            number,
            faces,
            face1_panel,
            face2_panel: if faces == 2 { face2_panel } else { None },
            post_spacing,
            double_structure,
            segments,
            total_area,
            total_width,
            total_raw_width,
        }
    }

    /// Double structure whose two faces need different framing gauges
    pub fn is_mixed_gauge(&self) -> bool {
        self.double_structure
            && self.faces == 2
            && self
                .face2_panel
                .is_some_and(|face2| face2.is_heavy() != self.face1_panel.is_heavy())
    }

    /// Panel types of the faces present, face 1 first
    pub fn face_panels(&self) -> impl Iterator<Item = PanelType> + '_ {
        std::iter::once(self.face1_panel).chain(self.face2_panel)
    }
}

/// Whether a segment qualifies for the single wrapped panel on two faces
fn is_narrow_two_face_return(spec: &WallSpec, segment: &WallSegment) -> bool {
    spec.faces == 2
        && segment.width <= TWO_FACE_OPTIMIZATION_MAX_WIDTH_M
        && segment.height <= TWO_FACE_OPTIMIZATION_MAX_HEIGHT_M
}

/// Posts for one segment of a single structure layer
fn posts_for_segment(segment: &WallSegment, post_spacing: f64) -> f64 {
    let rule_width = segment.rule_width();
    let rule_height = segment.rule_height();

    let horizontal = if segment.width < post_spacing {
        2.0
    } else {
        (rule_width / post_spacing).floor() + 1.0
    };

    if rule_height <= POST_LENGTH_M {
        horizontal
    } else {
        horizontal * (rule_height + POST_SPLICE_M) / POST_LENGTH_M
    }
}

/// Track pieces when no mixed-gauge split applies
fn channels_single_gauge(spec: &WallSpec, channels_single: f64) -> f64 {
    if spec.double_structure && spec.total_raw_width < SHORT_DOUBLE_WALL_MAX_WIDTH_M {
        let required = spec.total_raw_width * 4.0;
        if required <= CHANNEL_LENGTH_M {
            1.0
        } else {
            required / CHANNEL_LENGTH_M
        }
    } else if spec.double_structure {
        channels_single * 2.0
    } else {
        channels_single
    }
}

/// Calculate materials for a validated wall.
pub fn calculate(spec: &WallSpec) -> CalcResult<ItemMaterials> {
    let mut out = ItemMaterials::new();

    for segment in &spec.segments {
        if is_narrow_two_face_return(spec, segment) {
            out.panels.add_whole(spec.face1_panel, 1);
            continue;
        }
        for panel in spec.face_panels() {
            out.panels.add_area(panel, segment.raw_area);
        }
    }

    let posts_single: f64 = spec
        .segments
        .iter()
        .map(|s| posts_for_segment(s, spec.post_spacing))
        .sum();
    let channels_single = apply_minimum_dimension_rule(spec.total_width) * 2.0 / CHANNEL_LENGTH_M;
    let face1_family = spec.face1_panel.finish_family();

    if spec.is_mixed_gauge() {
        for family in [FinishFamily::Light, FinishFamily::Heavy] {
            out.other.add(Material::post_for(family), posts_single);
            out.other.add(Material::channel_for(family), channels_single);
        }
    } else {
        let posts = if spec.double_structure {
            posts_single * 2.0
        } else {
            posts_single
        };
        out.other.add(Material::post_for(face1_family), posts);
        out.other.add(
            Material::channel_for(face1_family),
            channels_single_gauge(spec, channels_single),
        );
    }

    let finishing_area = apply_minimum_dimension_rule(spec.total_area);
    for panel in spec.face_panels() {
        add_finishing(&mut out.other, panel.finish_family(), finishing_area, PanelScrews::Include);
    }

    let channels = out.other.rounded_get(Material::LightChannel)
        + out.other.rounded_get(Material::HeavyChannel);
    let fixings = (channels * NAILS_PER_CHANNEL) as f64;
    out.other.add(Material::WasherNail, fixings);
    out.other.add(Material::PowderLoad, fixings);
    out.other.add(
        Material::FineScrewHalfInch,
        (out.other.rounded_get(Material::LightPost) * SCREWS_PER_POST) as f64,
    );
    out.other.add(
        Material::CoarseScrewHalfInch,
        (out.other.rounded_get(Material::HeavyPost) * SCREWS_PER_POST) as f64,
    );

    tracing::debug!(
        wall = spec.number,
        posts = posts_single,
        channels = channels_single,
        area = finishing_area,
        "wall calculated"
    );

    Ok(out)
}
