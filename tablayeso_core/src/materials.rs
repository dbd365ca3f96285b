//! # Material Catalogue
//!
//! Every purchasable material the estimator can bill, with its catalogue
//! name and unit of measure, plus the two quantity maps used during a run:
//!
//! - [`MaterialQuantities`] - un-rounded per-item demand
//! - [`BillOfMaterials`] - whole purchasable units for the whole run
//!
//! ## JSON Serialization
//!
//! A bill serializes as a list of lines sorted by catalogue name:
//!
//! ```json
//! [
//!   { "material": "JointCompound", "name": "Pasta", "quantity": 2, "unit": "box" },
//!   { "material": { "Panel": "Normal" }, "name": "Paneles de Normal", "quantity": 5, "unit": "unit" }
//! ]
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::panels::{FinishFamily, PanelType};
use crate::rules::ceiling_round;

/// Unit a material is bought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Unit,
    Box,
    LinearMeter,
    Sheet,
    Sack,
}

impl UnitOfMeasure {
    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            UnitOfMeasure::Unit => "unit",
            UnitOfMeasure::Box => "box",
            UnitOfMeasure::LinearMeter => "m",
            UnitOfMeasure::Sheet => "sheet",
            UnitOfMeasure::Sack => "sack",
        }
    }
}

/// Closed set of billable materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    /// Panels of one type
    Panel(PanelType),
    /// Standard-gauge wall studs
    LightPost,
    /// Calibre 20 wall studs (heavy panels)
    HeavyPost,
    /// Standard-gauge wall track
    LightChannel,
    /// Calibre 20 wall track (heavy panels)
    HeavyChannel,
    JointCompound,
    PaperTape,
    Sandpaper,
    Basecoat,
    MeshTape,
    WasherNail,
    PowderLoad,
    FineScrewOneInch,
    FineScrewHalfInch,
    CoarseScrewOneInch,
    CoarseScrewHalfInch,
    /// Ceiling furring channel
    FurringChannel,
    /// Ceiling support channel
    SupportChannel,
    /// Ceiling perimeter angle
    AngleTrim,
    /// Ceiling hanger supports
    Hanger,
    /// Furring channel cut into hangers
    HangerFurringChannel,
    /// Furring channel inside a horizontal trim box
    TrimFurringChannel,
    /// Angle along a trim box's edges
    TrimAngle,
}

impl Material {
    /// Catalogue name printed on the bill
    pub fn name(&self) -> String {
        match self {
            Material::Panel(panel) => format!("Paneles de {}", panel.trade_name()),
            other => other.fixed_name().to_string(),
        }
    }

    fn fixed_name(&self) -> &'static str {
        match self {
            Material::Panel(_) => "Paneles",
            Material::LightPost => "Postes",
            Material::HeavyPost => "Postes Calibre 20",
            Material::LightChannel => "Canales",
            Material::HeavyChannel => "Canales Calibre 20",
            Material::JointCompound => "Pasta",
            Material::PaperTape => "Cinta de Papel",
            Material::Sandpaper => "Lija Grano 120",
            Material::Basecoat => "Basecoat",
            Material::MeshTape => "Cinta malla",
            Material::WasherNail => "Clavos con Roldana",
            Material::PowderLoad => "Fulminantes",
            Material::FineScrewOneInch => "Tornillos de 1\" punta fina",
            Material::FineScrewHalfInch => "Tornillos de 1/2\" punta fina",
            Material::CoarseScrewOneInch => "Tornillos de 1\" punta broca",
            Material::CoarseScrewHalfInch => "Tornillos de 1/2\" punta broca",
            Material::FurringChannel => "Canal Listón",
            Material::SupportChannel => "Canal Soporte",
            Material::AngleTrim => "Angular de Lámina",
            Material::Hanger => "Patas",
            Material::HangerFurringChannel => "Canal Listón (para cuelgue)",
            Material::TrimFurringChannel => "Canal Listón (Cenefa Horizontal)",
            Material::TrimAngle => "Angular de Lámina (Cenefa)",
        }
    }

    /// Unit of measure for purchasing
    pub fn unit(&self) -> UnitOfMeasure {
        match self {
            Material::JointCompound => UnitOfMeasure::Box,
            Material::PaperTape | Material::MeshTape => UnitOfMeasure::LinearMeter,
            Material::Sandpaper => UnitOfMeasure::Sheet,
            Material::Basecoat => UnitOfMeasure::Sack,
            _ => UnitOfMeasure::Unit,
        }
    }

    /// Studs matching a panel family's framing gauge
    pub fn post_for(family: FinishFamily) -> Self {
        match family {
            FinishFamily::Light => Material::LightPost,
            FinishFamily::Heavy => Material::HeavyPost,
        }
    }

    /// Track matching a panel family's framing gauge
    pub fn channel_for(family: FinishFamily) -> Self {
        match family {
            FinishFamily::Light => Material::LightChannel,
            FinishFamily::Heavy => Material::HeavyChannel,
        }
    }

    /// One-inch panel screws for a panel family
    pub fn panel_screw_for(family: FinishFamily) -> Self {
        match family {
            FinishFamily::Light => Material::FineScrewOneInch,
            FinishFamily::Heavy => Material::CoarseScrewOneInch,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Un-rounded material demand for a single item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialQuantities {
    quantities: BTreeMap<Material, f64>,
}

impl MaterialQuantities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to a material's running total
    pub fn add(&mut self, material: Material, quantity: f64) {
        *self.quantities.entry(material).or_insert(0.0) += quantity;
    }

    /// Current total for a material (0 if never added)
    pub fn get(&self, material: Material) -> f64 {
        self.quantities.get(&material).copied().unwrap_or(0.0)
    }

    /// Current total for a material, ceiling-rounded
    pub fn rounded_get(&self, material: Material) -> u64 {
        ceiling_round(self.get(material))
    }

    /// Every entry ceiling-rounded to whole units
    pub fn rounded(&self) -> BTreeMap<Material, u64> {
        self.quantities
            .iter()
            .map(|(material, quantity)| (*material, ceiling_round(*quantity)))
            .collect()
    }

    /// First material whose quantity is NaN or infinite, if any
    pub fn first_non_finite(&self) -> Option<Material> {
        self.quantities
            .iter()
            .find(|(_, quantity)| !quantity.is_finite())
            .map(|(material, _)| *material)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Material, f64)> + '_ {
        self.quantities.iter().map(|(m, q)| (*m, *q))
    }
}

/// One row of the final bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    pub material: Material,
    pub name: String,
    pub quantity: u64,
    pub unit: UnitOfMeasure,
}

/// Final whole-unit quantities for a run.
///
/// Zero quantities are never stored, so every listed line is something to
/// buy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "Vec<BillLine>", from = "Vec<BillLine>")]
pub struct BillOfMaterials {
    totals: BTreeMap<Material, u64>,
}

impl BillOfMaterials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum already-rounded per-item quantities into the bill
    pub fn add_rounded(&mut self, rounded: &BTreeMap<Material, u64>) {
        for (material, quantity) in rounded {
            self.add(*material, *quantity);
        }
    }

    /// Add finalized panel totals
    pub fn insert_panels(&mut self, panels: &BTreeMap<PanelType, u64>) {
        for (panel, count) in panels {
            self.add(Material::Panel(*panel), *count);
        }
    }

    fn add(&mut self, material: Material, quantity: u64) {
        if quantity == 0 {
            return;
        }
        *self.totals.entry(material).or_insert(0) += quantity;
    }

    /// Quantity to buy (0 if absent)
    pub fn quantity(&self, material: Material) -> u64 {
        self.totals.get(&material).copied().unwrap_or(0)
    }

    /// Quantity by catalogue name, e.g. `"Postes"`
    pub fn quantity_by_name(&self, name: &str) -> u64 {
        self.totals
            .iter()
            .find(|(material, _)| material.name() == name)
            .map_or(0, |(_, quantity)| *quantity)
    }

    pub fn contains(&self, material: Material) -> bool {
        self.totals.contains_key(&material)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Bill rows sorted by catalogue name
    pub fn lines(&self) -> Vec<BillLine> {
        let mut lines: Vec<BillLine> = self
            .totals
            .iter()
            .map(|(material, quantity)| BillLine {
                material: *material,
                name: material.name(),
                quantity: *quantity,
                unit: material.unit(),
            })
            .collect();
        lines.sort_by(|a, b| a.name.cmp(&b.name));
        lines
    }
}

impl From<BillOfMaterials> for Vec<BillLine> {
    fn from(bill: BillOfMaterials) -> Self {
        bill.lines()
    }
}

impl From<Vec<BillLine>> for BillOfMaterials {
    fn from(lines: Vec<BillLine>) -> Self {
        let mut bill = BillOfMaterials::new();
        for line in lines {
            bill.add(line.material, line.quantity);
        }
        bill
    }
}
