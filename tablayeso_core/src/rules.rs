//! # Rounding & Rule Primitives
//!
//! Numeric helpers shared by every calculator, plus the fixed purchasing
//! constants of the estimation method. All lengths are meters, all areas
//! square meters.
//!
//! ## Example
//!
//! ```rust
//! use tablayeso_core::rules::{apply_minimum_dimension_rule, ceiling_round};
//!
//! assert_eq!(apply_minimum_dimension_rule(0.45), 1.0);
//! assert_eq!(apply_minimum_dimension_rule(2.7), 2.7);
//! assert_eq!(ceiling_round(7.01), 8);
//! ```

// ============================================================================
// Panels
// ============================================================================

/// Usable area of one standard 1.22 m x 2.44 m panel (m²)
pub const PANEL_YIELD_M2: f64 = 2.98;

/// Contributions below this area are summed fractionally before rounding (m²)
pub const SMALL_AREA_THRESHOLD_M2: f64 = 1.5;

/// Waste allowance applied to trim panel demand
pub const TRIM_WASTE_FACTOR: f64 = 0.15;

/// Narrow two-face wall returns up to this raw width take one wrapped panel
pub const TWO_FACE_OPTIMIZATION_MAX_WIDTH_M: f64 = 0.60;

/// Narrow two-face wall returns up to this raw height take one wrapped panel
pub const TWO_FACE_OPTIMIZATION_MAX_HEIGHT_M: f64 = 2.44;

// ============================================================================
// Framing
// ============================================================================

/// Standard post length; taller walls need spliced posts
pub const POST_LENGTH_M: f64 = 3.66;

/// Standard track/furring channel length
pub const CHANNEL_LENGTH_M: f64 = 3.05;

/// Standard support channel length (ceilings)
pub const SUPPORT_CHANNEL_LENGTH_M: f64 = 3.66;

/// Standard angle trim length
pub const ANGLE_LENGTH_M: f64 = 2.44;

/// Overlap consumed by each post (and trim furring) splice
pub const POST_SPLICE_M: f64 = 0.30;

/// Overlap consumed by each angle trim splice
pub const ANGLE_SPLICE_M: f64 = 0.15;

/// Extra length added to each ceiling hanger
pub const HANGER_EXTRA_M: f64 = 0.10;

/// Standard furring channel spacing
pub const FURRING_SPACING_M: f64 = 0.40;

/// Standard support channel / hanger spacing
pub const SUPPORT_SPACING_M: f64 = 0.90;

/// Double-structure walls narrower than this (total raw width) use the
/// short-return channel rule
pub const SHORT_DOUBLE_WALL_MAX_WIDTH_M: f64 = 0.75;

// ============================================================================
// Finishing & fasteners
// ============================================================================

/// Attachment screws per panel
pub const SCREWS_PER_PANEL: f64 = 40.0;

/// Joint compound coverage per box (m²)
pub const COMPOUND_YIELD_M2: f64 = 22.0;

/// Paper tape per standard panel (m)
pub const PAPER_TAPE_PER_PANEL_M: f64 = 7.0;

/// Basecoat coverage per sack (m²)
pub const BASECOAT_YIELD_M2: f64 = 8.0;

/// Mesh tape per square meter (m)
pub const MESH_TAPE_PER_M2: f64 = 1.0;

/// Nails (and powder loads) per channel or support channel piece
pub const NAILS_PER_CHANNEL: u64 = 8;

/// Nails (and powder loads) per angle trim piece
pub const NAILS_PER_ANGLE: u64 = 5;

/// One-inch screws per standard angle length along a trim box
pub const SCREWS_PER_ANGLE: f64 = 5.0;

/// Half-inch screws per post or trim furring piece
pub const SCREWS_PER_POST: u64 = 4;

/// Half-inch screws per ceiling furring channel piece
pub const SCREWS_PER_FURRING: u64 = 12;

/// Half-inch screws per hanger and per hanger furring piece
pub const SCREWS_PER_HANGER: u64 = 2;

/// Any metraje below one meter is billed as one meter.
///
/// Returns 0 for non-positive or non-finite input, 1.0 for `0 < x < 1`,
/// and `x` unchanged otherwise.
pub fn apply_minimum_dimension_rule(x: f64) -> f64 {
    if !x.is_finite() || x <= 0.0 {
        0.0
    } else if x < 1.0 {
        1.0
    } else {
        x
    }
}

/// Smallest whole unit count ≥ `x`.
///
/// Negative and non-finite inputs give 0; a purchasable quantity is never
/// negative.
pub fn ceiling_round(x: f64) -> u64 {
    if !x.is_finite() || x <= 0.0 {
        0
    } else {
        x.ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_dimension_rule() {
        assert_eq!(apply_minimum_dimension_rule(1.0), 1.0);
        assert_eq!(apply_minimum_dimension_rule(3.25), 3.25);
        assert_eq!(apply_minimum_dimension_rule(0.999), 1.0);
        assert_eq!(apply_minimum_dimension_rule(0.01), 1.0);
        assert_eq!(apply_minimum_dimension_rule(0.0), 0.0);
        assert_eq!(apply_minimum_dimension_rule(-4.0), 0.0);
        assert_eq!(apply_minimum_dimension_rule(f64::NAN), 0.0);
        assert_eq!(apply_minimum_dimension_rule(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_ceiling_round() {
        assert_eq!(ceiling_round(0.0), 0);
        assert_eq!(ceiling_round(0.1), 1);
        assert_eq!(ceiling_round(8.0), 8);
        assert_eq!(ceiling_round(8.000_1), 9);
        assert_eq!(ceiling_round(-2.5), 0);
        assert_eq!(ceiling_round(f64::NAN), 0);
    }

    #[test]
    fn test_ceiling_round_idempotent() {
        for x in [0.2, 1.0, 1.5, 2.98, 7.49, 13.0, 250.7] {
            let once = ceiling_round(x);
            let twice = ceiling_round(once as f64);
            assert_eq!(once, twice, "x = {x}");
        }
    }
}
