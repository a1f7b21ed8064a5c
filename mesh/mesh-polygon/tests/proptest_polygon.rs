//! Property-based tests for polygon cell meshing.
//!
//! Run with: cargo test -p mesh-polygon -- proptest

use std::f64::consts::PI;

use mesh_polygon::{
    assemble_polygon, correction_factor, BackgroundSpec, CenterPatch, ElementOrder, RegionSpec,
    RingParams,
};
use mesh_types::SideAdjacency;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A full-circle angle list with every gap below 120 degrees.
fn arb_angles() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..2.0f64, 6..40).prop_map(|weights| {
        let total: f64 = weights.iter().sum();
        let mut angle = -180.0 + 1e-3;
        weights
            .iter()
            .map(|w| {
                let a = angle;
                angle += 360.0 * w / total;
                a
            })
            .collect()
    })
}

#[derive(Debug, Clone)]
struct CellConfig {
    sides: u32,
    sectors: u32,
    rings: Vec<u32>,
    background: u32,
    ducts: Vec<u32>,
    quad_center: bool,
}

fn arb_cell() -> impl Strategy<Value = CellConfig> {
    (
        prop_oneof![Just(4_u32), Just(6_u32)],
        1_u32..=3,
        prop::collection::vec(1_u32..=3, 0..=3),
        1_u32..=3,
        prop::collection::vec(1_u32..=2, 0..=2),
        any::<bool>(),
    )
        .prop_map(|(sides, half, rings, background, ducts, quad_center)| CellConfig {
            sides,
            sectors: 2 * half,
            rings,
            background,
            ducts,
            quad_center,
        })
}

fn params_for(config: &CellConfig) -> RingParams {
    let mut params = RingParams::polygon(config.sides, 1.0, config.sectors)
        .with_background(BackgroundSpec::new(config.background));
    for (i, &intervals) in config.rings.iter().enumerate() {
        params = params.with_ring(RegionSpec::new(0.1 * (i as f64 + 1.0), intervals));
    }
    for (i, &intervals) in config.ducts.iter().enumerate() {
        params = params.with_duct(RegionSpec::new(0.7 + 0.15 * i as f64, intervals));
    }
    if config.quad_center {
        params = params.with_center(CenterPatch::Quads { factor: None });
    }
    params
}

fn polygon_area(sides: u32, apothem: f64) -> f64 {
    f64::from(sides) * apothem * apothem * (PI / f64::from(sides)).tan()
}

// =============================================================================
// Property Tests: Correction
// =============================================================================

proptest! {
    /// Scaling by the factor gives the polygon the area of the circle.
    #[test]
    fn correction_preserves_area(angles in arb_angles(), radius in 0.1..10.0f64) {
        let f = correction_factor(&angles, true, ElementOrder::First, true).unwrap();
        let mut closed = angles.clone();
        closed.push(angles[0] + 360.0);
        let area: f64 = closed
            .windows(2)
            .map(|w| 0.5 * (radius * f).powi(2) * (w[1] - w[0]).to_radians().sin())
            .sum();
        prop_assert!((area - PI * radius * radius).abs() < 1e-9 * radius * radius);
    }

    /// The factor never shrinks a radius.
    #[test]
    fn correction_is_at_least_one(angles in arb_angles()) {
        let first = correction_factor(&angles, true, ElementOrder::First, true).unwrap();
        prop_assert!(first >= 1.0);
    }
}

// =============================================================================
// Property Tests: Assembled cells
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Block count follows the region structure.
    #[test]
    fn block_count_matches_regions(config in arb_cell()) {
        let params = params_for(&config);
        let mesh = assemble_polygon(&params).unwrap();
        let first_layers = config.rings.first().copied().unwrap_or(config.background);
        let expected = if config.rings.is_empty() {
            usize::from(first_layers > 1)
        } else {
            config.rings.len() + usize::from(first_layers > 1)
        } + 1 + config.ducts.len();
        prop_assert_eq!(mesh.subdomain_ids().len(), expected);
        prop_assert_eq!(mesh.metadata.quad_center_block_id.is_some(), config.quad_center);
    }

    /// Every element is positively oriented and the cell fills its polygon.
    #[test]
    fn cells_are_oriented_and_closed(config in arb_cell()) {
        let params = params_for(&config);
        let mesh = assemble_polygon(&params).unwrap();
        prop_assert!(mesh.min_element_area().unwrap() > 0.0);
        prop_assert!((mesh.area() - polygon_area(config.sides, 1.0)).abs() < 1e-9);
        let adj = SideAdjacency::build(&mesh);
        prop_assert!(adj.is_manifold());
        prop_assert_eq!(adj.boundary_loop_count(), 1);
    }

    /// Building twice gives identical metadata.
    #[test]
    fn metadata_is_deterministic(config in arb_cell()) {
        let params = params_for(&config);
        let a = assemble_polygon(&params).unwrap();
        let b = assemble_polygon(&params).unwrap();
        prop_assert_eq!(a.metadata, b.metadata);
    }
}
