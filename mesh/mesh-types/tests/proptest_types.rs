//! Property-based tests for mesh-types.
//!
//! Run with: cargo test -p mesh-types -- proptest

#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

use mesh_types::{
    unit_square, wrap_degrees, ElementKind, FeMesh, MeshError, MeshTopology, Point2,
    SideAdjacency, Vector2, OUTER_SIDESET_ID, TOLERANCE,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = (f64, f64)> {
    (-10.0..10.0_f64, -10.0..10.0_f64)
}

fn arb_triangle() -> impl Strategy<Value = [(f64, f64); 3]> {
    [arb_point(), arb_point(), arb_point()]
}

fn shoelace(p: &[(f64, f64); 3]) -> f64 {
    0.5 * ((p[1].0 - p[0].0) * (p[2].1 - p[0].1) - (p[2].0 - p[0].0) * (p[1].1 - p[0].1))
}

/// `n` unit squares in a row, stitched left to right.
fn strip(n: usize) -> FeMesh {
    let mut mesh = unit_square();
    for k in 1..n {
        let mut next = unit_square();
        next.translate(Vector2::new(k as f64, 0.0));
        mesh.stitch(next, OUTER_SIDESET_ID, OUTER_SIDESET_ID, TOLERANCE, true)
            .unwrap();
    }
    mesh
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn elements_are_stored_positively(tri in arb_triangle(), reversed in any::<bool>()) {
        let area = shoelace(&tri);
        prop_assume!(area.abs() > 1e-3);

        let mut mesh = FeMesh::new();
        for &(x, y) in &tri {
            mesh.add_node(Point2::new(x, y));
        }
        let nodes: [u32; 3] = if reversed { [2, 1, 0] } else { [0, 1, 2] };
        let e = mesh.add_element(ElementKind::Tri3, &nodes, 1).unwrap();
        prop_assert!(mesh.element_area(e as usize) > 0.0);
        prop_assert!((mesh.element_area(e as usize) - area.abs()).abs() < 1e-9);
    }

    #[test]
    fn collinear_elements_are_rejected(x in -5.0..5.0_f64, dx in 0.1..3.0_f64) {
        let mut mesh = FeMesh::new();
        for k in 0..3 {
            mesh.add_node(Point2::new(x + dx * f64::from(k), 2.0 * x));
        }
        let result = mesh.add_element(ElementKind::Tri3, &[0, 1, 2], 1);
        prop_assert!(
            matches!(result, Err(MeshError::DegenerateElement { .. })),
            "expected a degenerate element error"
        );
    }

    #[test]
    fn stitched_strips_are_closed(n in 1usize..8) {
        let mesh = strip(n);
        prop_assert_eq!(mesh.node_count(), 2 * (n + 1));
        prop_assert!((mesh.area() - n as f64).abs() < 1e-12);
        prop_assert_eq!(mesh.boundary.side_count(OUTER_SIDESET_ID), 2 * n + 2);

        let adjacency = SideAdjacency::build(&mesh);
        prop_assert!(adjacency.is_manifold());
        prop_assert_eq!(adjacency.boundary_loop_count(), 1);
    }

    #[test]
    fn distant_meshes_do_not_stitch(gap in 0.01..100.0_f64) {
        let mut left = unit_square();
        let mut right = unit_square();
        right.translate(Vector2::new(1.0 + gap, 0.0));
        let before = left.clone();
        let result = left.stitch(right, OUTER_SIDESET_ID, OUTER_SIDESET_ID, TOLERANCE, true);
        prop_assert!(
            matches!(result, Err(MeshError::NothingToStitch { .. })),
            "expected nothing to stitch"
        );
        prop_assert_eq!(left, before);
    }

    #[test]
    fn wrapped_angles_stay_in_range(angle in -2000.0..2000.0_f64) {
        let w = wrap_degrees(angle);
        prop_assert!(w > -180.0 && w <= 180.0);
        let turns = (angle - w) / 360.0;
        prop_assert!((turns - turns.round()).abs() < 1e-9);
    }
}
