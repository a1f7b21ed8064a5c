//! Planar helpers shared by the slice builder, the ring assembler and the
//! lattice and wedge stages.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use mesh_types::{BoundaryId, FeMesh, Point2, Vector2};
use nalgebra::center;

/// Corner distance of a regular polygon with the given apothem.
#[must_use]
pub fn corner_distance(apothem: f64, num_sides: u32) -> f64 {
    apothem / (PI / f64::from(num_sides)).cos()
}

/// Positions of the `sectors + 1` nodes on the outer edge of one slice.
///
/// The slice edge runs from the corner on the +y axis clockwise to the
/// corner at `90° − 360°/n`, at distance `radius` from the centre.
/// `tangents`, when given, places node `j` at fraction `tangents[j] / 2`
/// along the edge instead of uniformly.
#[must_use]
pub fn slice_edge_points(
    num_sides: u32,
    radius: f64,
    sectors: u32,
    tangents: Option<&[f64]>,
) -> Vec<Point2<f64>> {
    let step = 2.0 * PI / f64::from(num_sides);
    let p0 = Point2::new(0.0, radius);
    let p1 = Point2::new(radius * step.sin(), radius * step.cos());
    (0..=sectors)
        .map(|j| {
            let s = tangents.map_or_else(
                || f64::from(j) / f64::from(sectors),
                |t| t[j as usize] / 2.0,
            );
            p0 + (p1 - p0) * s
        })
        .collect()
}

/// Polar angle of a point in degrees, in `(-180, 180]`.
#[must_use]
pub fn azimuth_degrees(p: &Point2<f64>) -> f64 {
    p.y.atan2(p.x).to_degrees()
}

/// Intersection of line `p1 p2` with line `p3 p4`, `None` when parallel.
///
/// # Example
///
/// ```
/// use mesh_polygon::four_point_intercept;
/// use nalgebra::Point2;
///
/// let p = four_point_intercept(
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
///     Point2::new(2.0, 0.0),
/// )
/// .unwrap();
/// assert!((p.x - 1.0).abs() < 1e-12 && (p.y - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn four_point_intercept(
    p1: Point2<f64>,
    p2: Point2<f64>,
    p3: Point2<f64>,
    p4: Point2<f64>,
) -> Option<Point2<f64>> {
    let denominator = (p1.y - p2.y) * (p3.x - p4.x) - (p3.y - p4.y) * (p1.x - p2.x);
    if denominator.abs() < f64::EPSILON {
        return None;
    }
    let c12 = p1.y * p2.x - p1.x * p2.y;
    let c34 = p3.y * p4.x - p3.x * p4.y;
    let x = -((p1.x - p2.x) * c34 - (p3.x - p4.x) * c12) / denominator;
    let y = -((p1.y - p2.y) * c34 - (p3.y - p4.y) * c12) / denominator;
    Some(Point2::new(x, y))
}

/// Vertex nodes of the sides tagged `id`.
#[must_use]
pub fn boundary_vertex_nodes(mesh: &FeMesh, id: BoundaryId) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    for (e, s) in mesh.boundary.sides_with_id(id) {
        let (a, b) = mesh.elements[e as usize].side_nodes(s);
        out.insert(a);
        out.insert(b);
    }
    out
}

/// Sorted azimuthal angles (degrees) of the vertex nodes on boundary `id`.
#[must_use]
pub fn boundary_azimuths(mesh: &FeMesh, id: BoundaryId) -> Vec<f64> {
    let mut angles: Vec<f64> = boundary_vertex_nodes(mesh, id)
        .iter()
        .map(|&n| azimuth_degrees(&mesh.nodes[n as usize]))
        .collect();
    angles.sort_by(f64::total_cmp);
    angles
}

/// Spread the nodes of boundary `id` uniformly along each side of a
/// regular polygon.
///
/// The polygon has `num_sides` sides, the given apothem and a corner at
/// `first_corner` degrees. Corner nodes stay where they are. Mid-side nodes
/// of tagged sides are moved back to the middle of their side.
///
/// Returns the number of moved nodes.
pub fn distribute_on_sides(
    mesh: &mut FeMesh,
    id: BoundaryId,
    num_sides: u32,
    first_corner: f64,
    apothem: f64,
) -> usize {
    let sector = 360.0 / f64::from(num_sides);
    let half_side = apothem * (PI / f64::from(num_sides)).tan();
    let corner_tolerance = 1e-8 * sector;

    let mut per_side: Vec<Vec<(f64, u32)>> = vec![Vec::new(); num_sides as usize];
    for n in boundary_vertex_nodes(mesh, id) {
        let rel = (azimuth_degrees(&mesh.nodes[n as usize]) - first_corner).rem_euclid(360.0);
        let side = (rel / sector).floor();
        let offset = rel - side * sector;
        if offset < corner_tolerance || sector - offset < corner_tolerance {
            continue;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let side = (side as usize).min(num_sides as usize - 1);
        per_side[side].push((offset, n));
    }

    let mut moved = 0;
    for (side, nodes) in per_side.iter_mut().enumerate() {
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));
        #[allow(clippy::cast_precision_loss)]
        let mid_angle = (first_corner + (side as f64 + 0.5) * sector).to_radians();
        let normal = Vector2::new(mid_angle.cos(), mid_angle.sin());
        let tangent = Vector2::new(-normal.y, normal.x);
        #[allow(clippy::cast_precision_loss)]
        let count = nodes.len() as f64 + 1.0;
        for (i, &(_, n)) in nodes.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let t = -half_side + 2.0 * half_side * (i as f64 + 1.0) / count;
            mesh.nodes[n as usize] = Point2::from(normal * apothem + tangent * t);
            moved += 1;
        }
    }
    recenter_side_midpoints(mesh, id);
    moved
}

/// Move mid-side nodes of sides tagged `id` to the middle of their side.
pub fn recenter_side_midpoints(mesh: &mut FeMesh, id: BoundaryId) {
    let updates: Vec<(u32, Point2<f64>)> = mesh
        .boundary
        .sides_with_id(id)
        .filter_map(|(e, s)| {
            let element = &mesh.elements[e as usize];
            let mid = element.side_mid_node(s)?;
            let (a, b) = element.side_nodes(s);
            Some((mid, center(&mesh.nodes[a as usize], &mesh.nodes[b as usize])))
        })
        .collect();
    for (n, p) in updates {
        mesh.nodes[n as usize] = p;
    }
}
