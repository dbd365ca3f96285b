//! Finishing materials shared by walls, ceilings and trim boxes.

use crate::materials::{Material, MaterialQuantities};
use crate::panels::FinishFamily;
use crate::rules::{
    BASECOAT_YIELD_M2, COMPOUND_YIELD_M2, MESH_TAPE_PER_M2, PANEL_YIELD_M2, PAPER_TAPE_PER_PANEL_M,
    SCREWS_PER_PANEL,
};

/// Whether the finishing pass also bills one-inch panel screws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelScrews {
    Include,
    Exclude,
}

/// Add finishing demand for `area_m2` (already rule-applied) of one face.
///
/// Light panels take compound, paper tape and sandpaper; heavy panels take
/// basecoat and mesh tape. Panel screws follow the same family split.
pub fn add_finishing(
    quantities: &mut MaterialQuantities,
    family: FinishFamily,
    area_m2: f64,
    screws: PanelScrews,
) {
    if !area_m2.is_finite() || area_m2 <= 0.0 {
        return;
    }
    let panel_count = area_m2 / PANEL_YIELD_M2;

    match family {
        FinishFamily::Light => {
            quantities.add(Material::JointCompound, area_m2 / COMPOUND_YIELD_M2);
            quantities.add(
                Material::PaperTape,
                area_m2 * (PAPER_TAPE_PER_PANEL_M / PANEL_YIELD_M2),
            );
            quantities.add(Material::Sandpaper, panel_count / 2.0);
        }
        FinishFamily::Heavy => {
            quantities.add(Material::Basecoat, area_m2 / BASECOAT_YIELD_M2);
            quantities.add(Material::MeshTape, area_m2 * MESH_TAPE_PER_M2);
        }
    }

    if screws == PanelScrews::Include {
        quantities.add(Material::panel_screw_for(family), panel_count * SCREWS_PER_PANEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_finishing() {
        let mut q = MaterialQuantities::new();
        add_finishing(&mut q, FinishFamily::Light, 29.8, PanelScrews::Include);
        assert!((q.get(Material::JointCompound) - 29.8 / 22.0).abs() < 1e-9);
        assert!((q.get(Material::PaperTape) - 70.0).abs() < 1e-9);
        assert!((q.get(Material::Sandpaper) - 5.0).abs() < 1e-9);
        assert!((q.get(Material::FineScrewOneInch) - 400.0).abs() < 1e-9);
        assert_eq!(q.get(Material::Basecoat), 0.0);
        assert_eq!(q.get(Material::CoarseScrewOneInch), 0.0);
    }

    #[test]
    fn test_heavy_finishing() {
        let mut q = MaterialQuantities::new();
        add_finishing(&mut q, FinishFamily::Heavy, 16.0, PanelScrews::Include);
        assert!((q.get(Material::Basecoat) - 2.0).abs() < 1e-9);
        assert!((q.get(Material::MeshTape) - 16.0).abs() < 1e-9);
        assert!((q.get(Material::CoarseScrewOneInch) - 16.0 / 2.98 * 40.0).abs() < 1e-9);
        assert_eq!(q.get(Material::JointCompound), 0.0);
        assert_eq!(q.get(Material::PaperTape), 0.0);
    }

    #[test]
    fn test_screws_excluded_and_zero_area() {
        let mut q = MaterialQuantities::new();
        add_finishing(&mut q, FinishFamily::Light, 10.0, PanelScrews::Exclude);
        assert_eq!(q.get(Material::FineScrewOneInch), 0.0);

        let mut empty = MaterialQuantities::new();
        add_finishing(&mut empty, FinishFamily::Heavy, 0.0, PanelScrews::Include);
        assert_eq!(empty.iter().count(), 0);
    }
}
