//! # Structural Items
//!
//! This module contains the three item kinds the estimator understands.
//! Each kind follows the pattern:
//!
//! - `*Input` - item configuration as entered (JSON-serializable, every
//!   field optional and numbers read through [`NumberField`], so that a bad
//!   value becomes an item error instead of a rejected file)
//! - `*Spec` - validated, typed configuration with its segments and totals;
//!   also the record handed to reporting
//! - `calculate(spec) -> CalcResult<ItemMaterials>` - pure calculation
//!
//! ## Available Items
//!
//! - [`wall`] - framed partition walls, one or two faces
//! - [`ceiling`] - suspended ceilings
//! - [`trim`] - trim boxes ("cenefas")

pub mod ceiling;
pub mod field;
pub mod finishing;
pub mod segments;
pub mod trim;
pub mod wall;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialQuantities;
use crate::panels::{PanelAccumulator, PanelType};

// Re-export commonly used types
pub use ceiling::{CeilingInput, CeilingSpec};
pub use field::NumberField;
pub use segments::{
    CeilingSegment, CeilingSegmentInput, TrimSegment, TrimSegmentInput, WallSegment,
    WallSegmentInput,
};
pub use trim::{TrimInput, TrimOrientation, TrimSpec};
pub use wall::{WallInput, WallSpec};

/// Item kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Wall,
    Ceiling,
    Trim,
}

impl ItemKind {
    /// Display name used in reports and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::Wall => "Wall",
            ItemKind::Ceiling => "Ceiling",
            ItemKind::Trim => "Trim",
        }
    }

    /// Parse from English or Spanish names, case-insensitively
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "wall" | "muro" => Ok(ItemKind::Wall),
            "ceiling" | "cielo" | "cielo falso" => Ok(ItemKind::Ceiling),
            "trim" | "cenefa" => Ok(ItemKind::Trim),
            _ => Err(CalcError::invalid_input("kind", s, "Unknown item kind")),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Item configuration as entered.
///
/// ## JSON Example
///
/// ```json
/// {
///   "kind": "wall",
///   "number": 1,
///   "faces": 2,
///   "face1_panel": "Normal",
///   "face2_panel": "Durock",
///   "post_spacing": 0.40,
///   "double_structure": false,
///   "segments": [ { "width": 3.0, "height": 2.4 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemInput {
    Wall(WallInput),
    Ceiling(CeilingInput),
    Trim(TrimInput),
}

impl ItemInput {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemInput::Wall(_) => ItemKind::Wall,
            ItemInput::Ceiling(_) => ItemKind::Ceiling,
            ItemInput::Trim(_) => ItemKind::Trim,
        }
    }

    /// Ordinal number shown to the user (0 when not yet assigned)
    pub fn number(&self) -> u32 {
        match self {
            ItemInput::Wall(w) => w.number,
            ItemInput::Ceiling(c) => c.number,
            ItemInput::Trim(t) => t.number,
        }
    }

    pub fn set_number(&mut self, number: u32) {
        match self {
            ItemInput::Wall(w) => w.number = number,
            ItemInput::Ceiling(c) => c.number = number,
            ItemInput::Trim(t) => t.number = number,
        }
    }

    /// Label such as `"Wall #2"`
    pub fn label(&self) -> String {
        format!("{} #{}", self.kind(), self.number())
    }

    /// Number of segments entered, valid or not
    pub fn segment_count(&self) -> usize {
        match self {
            ItemInput::Wall(w) => w.segments.len(),
            ItemInput::Ceiling(c) => c.segments.len(),
            ItemInput::Trim(t) => t.segments.len(),
        }
    }

    /// Validate segments and configuration.
    ///
    /// Returns every problem found, segment errors first, so the user can
    /// fix them all in one pass.
    pub fn validate(&self) -> Result<ItemSpec, Vec<CalcError>> {
        match self {
            ItemInput::Wall(w) => w.validate().map(ItemSpec::Wall),
            ItemInput::Ceiling(c) => c.validate().map(ItemSpec::Ceiling),
            ItemInput::Trim(t) => t.validate().map(ItemSpec::Trim),
        }
    }
}

/// Next free ordinal for `kind`: one past the highest number in use
pub fn next_number(items: &[ItemInput], kind: ItemKind) -> u32 {
    items
        .iter()
        .filter(|item| item.kind() == kind)
        .map(ItemInput::number)
        .max()
        .unwrap_or(0)
        + 1
}

/// Copy of `items` with every unnumbered item (0) numbered per kind, in
/// order, the same way items are numbered when added one by one.
pub fn number_items(items: &[ItemInput]) -> Vec<ItemInput> {
    let mut numbered: Vec<ItemInput> = Vec::with_capacity(items.len());
    for item in items {
        let mut item = item.clone();
        if item.number() == 0 {
            item.set_number(next_number(&numbered, item.kind()));
        }
        numbered.push(item);
    }
    numbered
}

impl From<WallInput> for ItemInput {
    fn from(input: WallInput) -> Self {
        ItemInput::Wall(input)
    }
}

impl From<CeilingInput> for ItemInput {
    fn from(input: CeilingInput) -> Self {
        ItemInput::Ceiling(input)
    }
}

impl From<TrimInput> for ItemInput {
    fn from(input: TrimInput) -> Self {
        ItemInput::Trim(input)
    }
}

/// Validated item, ready to calculate and to report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemSpec {
    Wall(WallSpec),
    Ceiling(CeilingSpec),
    Trim(TrimSpec),
}

impl ItemSpec {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemSpec::Wall(_) => ItemKind::Wall,
            ItemSpec::Ceiling(_) => ItemKind::Ceiling,
            ItemSpec::Trim(_) => ItemKind::Trim,
        }
    }

    pub fn number(&self) -> u32 {
        match self {
            ItemSpec::Wall(w) => w.number,
            ItemSpec::Ceiling(c) => c.number,
            ItemSpec::Trim(t) => t.number,
        }
    }

    pub fn label(&self) -> String {
        format!("{} #{}", self.kind(), self.number())
    }

    /// Configuration summary as `(label, value)` rows, for reports
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        match self {
            ItemSpec::Wall(w) => {
                rows.push(("Faces", w.faces.to_string()));
                rows.push(("Face 1 panel", w.face1_panel.to_string()));
                if let Some(face2) = w.face2_panel {
                    rows.push(("Face 2 panel", face2.to_string()));
                }
                rows.push(("Post spacing", format!("{:.2} m", w.post_spacing)));
                rows.push(("Double structure", yes_no(w.double_structure).to_string()));
                rows.push(("Segments", w.segments.len().to_string()));
            }
            ItemSpec::Ceiling(c) => {
                rows.push(("Panel", c.panel.to_string()));
                rows.push(("Plenum", format!("{:.2} m", c.plenum)));
                if c.angular_deduction > 0.0 {
                    rows.push(("Angular deduction", format!("{:.2} m", c.angular_deduction)));
                }
                rows.push(("Segments", c.segments.len().to_string()));
            }
            ItemSpec::Trim(t) => {
                rows.push(("Orientation", t.orientation.to_string()));
                rows.push(("Panel", t.panel.to_string()));
                rows.push(("Sides", t.sides.to_string()));
                rows.push(("Segments", t.segments.len().to_string()));
            }
        }
        rows
    }

    /// Run the kind-specific calculator
    pub fn calculate(&self) -> CalcResult<ItemMaterials> {
        let materials = match self {
            ItemSpec::Wall(w) => wall::calculate(w)?,
            ItemSpec::Ceiling(c) => ceiling::calculate(c)?,
            ItemSpec::Trim(t) => trim::calculate(t)?,
        };
        materials.ensure_finite()?;
        Ok(materials)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// What one item contributes to a run: its own panel demand and its
/// un-rounded other materials.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemMaterials {
    pub panels: PanelAccumulator,
    pub other: MaterialQuantities,
}

impl ItemMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail if any quantity came out NaN or infinite
    pub fn ensure_finite(&self) -> CalcResult<()> {
        match self.other.first_non_finite() {
            Some(material) => Err(CalcError::internal(format!(
                "non-finite quantity computed for '{}'",
                material.name()
            ))),
            None => Ok(()),
        }
    }
}

/// Parse an optional panel type field, producing a config error on a
/// missing or unknown value.
pub(crate) fn parse_panel(field: &str, value: Option<&str>) -> CalcResult<PanelType> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CalcError::invalid_config(field, "(missing)", "panel type is required"))?;
    PanelType::from_str_flexible(raw)
        .map_err(|_| CalcError::invalid_config(field, raw, "unknown panel type"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Material;

    #[test]
    fn test_item_input_json_tagging() {
        let json = r#"{
            "kind": "ceiling",
            "number": 3,
            "panel": "Durock",
            "segments": [ { "width": 4.0, "length": 5.0 } ]
        }"#;
        let item: ItemInput = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind(), ItemKind::Ceiling);
        assert_eq!(item.number(), 3);
        assert_eq!(item.label(), "Ceiling #3");
        assert_eq!(item.segment_count(), 1);
    }

    #[test]
    fn test_number_items_per_kind() {
        let items: Vec<ItemInput> = vec![
            CeilingInput::new(0, PanelType::Normal).into(),
            WallInput::new(0, 1, PanelType::Normal, 0.4).into(),
            WallInput::new(5, 1, PanelType::Normal, 0.4).into(),
            WallInput::new(0, 1, PanelType::Normal, 0.4).into(),
        ];
        let labels: Vec<String> = number_items(&items).iter().map(ItemInput::label).collect();
        assert_eq!(labels, vec!["Ceiling #1", "Wall #1", "Wall #5", "Wall #6"]);
    }

    #[test]
    fn test_kind_from_str_flexible() {
        assert_eq!(ItemKind::from_str_flexible("Muro").unwrap(), ItemKind::Wall);
        assert_eq!(ItemKind::from_str_flexible("cielo falso").unwrap(), ItemKind::Ceiling);
        assert_eq!(ItemKind::from_str_flexible("CENEFA").unwrap(), ItemKind::Trim);
        assert!(ItemKind::from_str_flexible("roof").is_err());
    }

    #[test]
    fn test_parse_panel() {
        assert_eq!(parse_panel("panel", Some("exterior")).unwrap(), PanelType::Exterior);
        assert!(matches!(
            parse_panel("panel", None),
            Err(CalcError::InvalidConfig { .. })
        ));
        assert!(parse_panel("panel", Some("  ")).is_err());
        assert!(parse_panel("panel", Some("mdf")).is_err());
    }

    #[test]
    fn test_details_per_kind() {
        let wall = WallInput::new(1, 2, PanelType::Normal, 0.4)
            .with_face2(PanelType::Durock)
            .with_segment(3.0, 2.4)
            .with_double_structure(true);
        let spec = ItemInput::from(wall).validate().unwrap();
        assert_eq!(
            spec.details(),
            vec![
                ("Faces", "2".to_string()),
                ("Face 1 panel", "Normal".to_string()),
                ("Face 2 panel", "Durock".to_string()),
                ("Post spacing", "0.40 m".to_string()),
                ("Double structure", "Yes".to_string()),
                ("Segments", "1".to_string()),
            ]
        );

        let ceiling = CeilingInput::new(2, PanelType::Normal)
            .with_segment(4.0, 5.0)
            .with_plenum(0.5);
        let spec = ItemInput::from(ceiling).validate().unwrap();
        assert_eq!(spec.details()[1], ("Plenum", "0.50 m".to_string()));

        let trim = TrimInput::new(3, TrimOrientation::Vertical, PanelType::Normal, 1)
            .with_segment(2.0, 0.3, 0.3);
        let spec = ItemInput::from(trim).validate().unwrap();
        assert_eq!(spec.details()[0], ("Orientation", "vertical".to_string()));
    }

    #[test]
    fn test_ensure_finite() {
        let mut materials = ItemMaterials::new();
        materials.other.add(Material::LightPost, 3.0);
        assert!(materials.ensure_finite().is_ok());
        materials.other.add(Material::Basecoat, f64::INFINITY);
        let err = materials.ensure_finite().unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
