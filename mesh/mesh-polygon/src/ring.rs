//! Assembly of a closed polygon cell from its slices.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use mesh_transform::{rotate_mesh, smooth_laplacian};
use mesh_types::{
    fuzzy_eq, wrap_degrees, BoundaryId, FeMesh, MeshMetadata, Point2, SubdomainId,
    OUTER_SIDESET_ID, OUTER_SIDESET_ID_ALT, SLICE_BEGIN, SLICE_END, TOLERANCE,
};
use tracing::{debug, info, warn};

use crate::corrector::{correction_factor, ElementOrder};
use crate::error::{PolygonError, PolygonResult};
use crate::geometry::{
    azimuth_degrees, boundary_azimuths, corner_distance, distribute_on_sides, slice_edge_points,
};
use crate::layout::RadialLayout;
use crate::params::{CenterPatch, RingParams};
use crate::slice::{build_slice, inward_interface_id, outward_interface_id, SliceSpec};

/// Relaxation factor of the optional smoothing pass.
const SMOOTHING_LAMBDA: f64 = 0.5;

/// Azimuthal angles (degrees) of the node directions of a polygon cell.
///
/// Each entry is `(angle, is_vertex)`. Second-order lists interleave the
/// arc midpoints. Angles are wrapped to `(-180, 180]` and sorted.
#[must_use]
pub fn polygon_azimuths(params: &RingParams) -> Vec<(f64, bool)> {
    let n = params.num_sides;
    let sector = 360.0 / f64::from(n);
    let radius = corner_distance(params.apothem(), n);
    let mut angles = Vec::new();
    for (k, &sectors) in (0..n).zip(&params.num_sectors_per_side) {
        let tangents = params.side_tangents.get(&k).map(Vec::as_slice);
        let edge = slice_edge_points(n, radius, sectors, tangents);
        let offset = sector * f64::from(k);
        for j in 0..sectors as usize {
            angles.push((wrap_degrees(azimuth_degrees(&edge[j]) + offset), true));
            if params.order == ElementOrder::Second {
                let bisector = Point2::from(edge[j].coords.normalize() + edge[j + 1].coords.normalize());
                angles.push((wrap_degrees(azimuth_degrees(&bisector) + offset), false));
            }
        }
    }
    angles.sort_by(|a, b| a.0.total_cmp(&b.0));
    angles
}

/// Build a closed polygon cell with concentric rings, a background region
/// and optional ducts.
///
/// # Arguments
///
/// * `params` - Polygon and region parameters
///
/// # Errors
///
/// Returns an error for invalid parameters, rings or ducts that do not fit
/// in the polygon, conflicting block names, or slices that fail to stitch.
///
/// # Example
///
/// ```
/// use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};
/// use mesh_types::OUTER_SIDESET_ID;
///
/// let params = RingParams::hexagon(1.0, 2).with_ring(RegionSpec::new(0.5, 2));
/// let mesh = assemble_polygon(&params).unwrap();
/// assert_eq!(mesh.metadata.azimuthal_angles.len(), 12);
/// assert!(mesh.boundary.has_id(OUTER_SIDESET_ID));
/// ```
pub fn assemble_polygon(params: &RingParams) -> PolygonResult<FeMesh> {
    params.validate()?;
    let n = params.num_sides;
    let apothem = params.apothem();

    let factor = if params.preserve_volumes && !params.rings.is_empty() {
        let azimuths = polygon_azimuths(params);
        let angles: Vec<f64> = azimuths.iter().map(|a| a.0).collect();
        let first_is_vertex = azimuths.first().map_or(true, |a| a.1);
        correction_factor(&angles, true, params.order, first_is_vertex)?
    } else {
        1.0
    };
    let layout = RadialLayout::new(params, factor, 0)?;

    let mut mesh = FeMesh::new();
    for k in 0..n {
        let spec = SliceSpec {
            num_sides: n,
            side: k,
            apothem,
            sectors: params.num_sectors_per_side[k as usize],
            tangents: params.side_tangents.get(&k).map(Vec::as_slice),
            layout: &layout,
            center: params.center,
            interfaces: &params.interfaces,
        };
        let mut slice = build_slice(&spec)?;
        rotate_mesh(&mut slice, 360.0 / f64::from(n) * f64::from(k));
        if k == 0 {
            mesh = slice;
        } else {
            mesh.stitch(slice, SLICE_BEGIN, SLICE_END, TOLERANCE, true)?;
        }
    }
    mesh.stitch_surfaces(SLICE_BEGIN, SLICE_END, TOLERANCE, true)?;
    debug!(sides = n, nodes = mesh.nodes.len(), "closed slice loop");

    if params.uniform_mesh_on_sides {
        distribute_on_sides(&mut mesh, OUTER_SIDESET_ID, n, 90.0, apothem);
    }

    if params.smoothing_iterations > 0 {
        if params.ducts.is_empty() && params.side_tangents.is_empty() {
            let result = smooth_laplacian(&mut mesh, params.smoothing_iterations, SMOOTHING_LAMBDA);
            debug!(iterations = result.iterations, "smoothed polygon");
        } else {
            warn!("smoothing skipped for polygons with ducts or custom side tangents");
        }
    }

    if params.order == ElementOrder::Second {
        let mids = mesh.to_second_order(params.quad9)?;
        snap_arc_midpoints(&mut mesh, &mids, &layout.circle_radii());
        if params.quad9 {
            mesh.recenter_quad9_faces();
        }
    }

    let block_map = remap_blocks(&mut mesh, params, layout.block_count)?;

    let external = params.external_boundary_id.unwrap_or(OUTER_SIDESET_ID);
    if external != OUTER_SIDESET_ID {
        mesh.boundary.rename_id(OUTER_SIDESET_ID, external);
    }
    if let Some(name) = &params.external_boundary_name {
        mesh.boundary.set_name(external, name.clone());
    }
    if !params.create_side_boundaries {
        for k in 1..=n {
            mesh.boundary.remove_id(OUTER_SIDESET_ID + k);
            mesh.boundary.remove_id(OUTER_SIDESET_ID_ALT + k);
        }
    }

    let interface_ids = name_interfaces(&mut mesh, params, layout.interface_count());

    if params.flat_side_up {
        rotate_mesh(&mut mesh, 180.0 / f64::from(n));
    }

    mesh.metadata = MeshMetadata {
        pitch: Some(2.0 * apothem),
        pattern_pitch: None,
        size_style: params.size_style,
        num_sides: n,
        num_sectors_per_side: params.num_sectors_per_side.clone(),
        azimuthal_angles: boundary_azimuths(&mesh, external),
        background_intervals: params.background.total_intervals(),
        max_radius: layout.max_radius,
        quad_center_block_id: match params.center {
            CenterPatch::Quads { .. } => block_map.get(&1).copied(),
            CenterPatch::Triangles => None,
        },
        is_control_drum: params.is_control_drum,
        interface_boundary_ids: interface_ids,
        ..MeshMetadata::default()
    };

    info!(
        sides = n,
        nodes = mesh.nodes.len(),
        elements = mesh.elements.len(),
        factor,
        "assembled polygon"
    );
    Ok(mesh)
}

/// Move second-order nodes on ring arcs onto their circle.
fn snap_arc_midpoints(mesh: &mut FeMesh, mids: &HashMap<(u32, u32), u32>, radii: &[f64]) {
    let mut snapped = 0;
    for (&(a, b), &mid) in mids {
        let pa = mesh.nodes[a as usize];
        let pb = mesh.nodes[b as usize];
        let (ra, rb) = (pa.coords.norm(), pb.coords.norm());
        if !fuzzy_eq(ra, rb) || !radii.iter().any(|&r| fuzzy_eq(r, ra)) {
            continue;
        }
        let dir = (pa.coords + pb.coords).normalize();
        mesh.nodes[mid as usize] = Point2::from(dir * ra);
        snapped += 1;
    }
    debug!(snapped, "snapped arc midpoints");
}

/// Replace positional block ids `1..=count` with the final ids and names.
///
/// Returns the positional-to-final id map.
fn remap_blocks(
    mesh: &mut FeMesh,
    params: &RingParams,
    count: usize,
) -> PolygonResult<BTreeMap<SubdomainId, SubdomainId>> {
    for (what, len) in [("ids", params.block_ids.len()), ("names", params.block_names.len())] {
        if len != 0 && len != count {
            return Err(PolygonError::BlockListLength {
                what,
                expected: count,
                actual: len,
            });
        }
    }

    let mut map = BTreeMap::new();
    let mut names: BTreeMap<SubdomainId, String> = BTreeMap::new();
    let mut by_name: HashMap<&str, SubdomainId> = HashMap::new();
    for i in 0..count {
        #[allow(clippy::cast_possible_truncation)]
        let positional = i as SubdomainId + 1;
        let id = params.block_ids.get(i).copied().unwrap_or(positional);
        map.insert(positional, id);
        if let Some(name) = params.block_names.get(i) {
            match by_name.get(name.as_str()) {
                Some(&first) if first != id => {
                    return Err(PolygonError::DuplicateBlockName {
                        name: name.clone(),
                        first,
                        second: id,
                    });
                }
                _ => {
                    by_name.insert(name, id);
                    names.entry(id).or_insert_with(|| name.clone());
                }
            }
        }
    }

    for e in &mut mesh.elements {
        if let Some(&id) = map.get(&e.subdomain) {
            e.subdomain = id;
        }
    }
    mesh.subdomain_names = names;
    Ok(map)
}

/// Name interface boundaries and return their ids.
fn name_interfaces(
    mesh: &mut FeMesh,
    params: &RingParams,
    count: usize,
) -> BTreeSet<BoundaryId> {
    let interfaces = &params.interfaces;
    let mut ids = BTreeSet::new();
    for m in 0..count {
        if interfaces.outward {
            let id = outward_interface_id(m, interfaces.id_shift);
            if let Some(name) = interfaces.outward_names.get(m) {
                mesh.boundary.set_name(id, name.clone());
            }
            ids.insert(id);
        }
        if interfaces.inward {
            let id = inward_interface_id(m, interfaces.id_shift);
            if let Some(name) = interfaces.inward_names.get(m) {
                mesh.boundary.set_name(id, name.clone());
            }
            ids.insert(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BackgroundSpec, InterfaceBoundaries, RegionSpec};
    use approx::assert_relative_eq;
    use mesh_types::{ElementKind, SideAdjacency};
    use std::f64::consts::PI;

    fn hex_area(apothem: f64) -> f64 {
        2.0 * 3.0_f64.sqrt() * apothem * apothem
    }

    #[test]
    fn hexagon_with_one_ring() {
        let params = RingParams::hexagon(1.0, 2).with_ring(RegionSpec::new(0.5, 2));
        let mesh = assemble_polygon(&params).unwrap();
        assert!(!mesh.boundary.has_id(SLICE_BEGIN));
        assert!(!mesh.boundary.has_id(SLICE_END));
        assert_eq!(mesh.boundary.ids().len(), 1);
        let adj = SideAdjacency::build(&mesh);
        assert_eq!(adj.boundary_loop_count(), 1);
        assert!(mesh.min_element_area().unwrap() > 0.0);
        assert_relative_eq!(mesh.area(), hex_area(1.0), epsilon = 1e-10);
        let ring = mesh.subdomain_area(1) + mesh.subdomain_area(2);
        assert_relative_eq!(ring, PI * 0.25, epsilon = 1e-10);
        assert_eq!(mesh.metadata.azimuthal_angles.len(), 12);
        assert_eq!(mesh.metadata.pitch, Some(2.0));
        assert!(mesh.metadata.max_radius > 0.5);
    }

    #[test]
    fn second_order_ring_keeps_its_area() {
        let params = RingParams::hexagon(1.0, 2)
            .with_ring(RegionSpec::new(0.5, 1))
            .with_order(ElementOrder::Second, true);
        let mesh = assemble_polygon(&params).unwrap();
        assert!(mesh
            .elements
            .iter()
            .all(|e| matches!(e.kind, ElementKind::Tri6 | ElementKind::Quad9)));
        assert_relative_eq!(mesh.subdomain_area(1), PI * 0.25, epsilon = 1e-10);
        assert_relative_eq!(mesh.area(), hex_area(1.0), epsilon = 1e-10);
    }

    #[test]
    fn quad_center_and_custom_blocks() {
        let params = RingParams::hexagon(1.0, 4)
            .with_center(CenterPatch::Quads { factor: None })
            .with_ring(RegionSpec::new(0.4, 2))
            .with_background(BackgroundSpec::new(2))
            .with_blocks(vec![10, 20, 30], vec!["center".into(), "fuel".into(), "moderator".into()]);
        let mesh = assemble_polygon(&params).unwrap();
        assert_eq!(mesh.subdomain_ids().into_iter().collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(mesh.metadata.quad_center_block_id, Some(10));
        assert_eq!(mesh.subdomain_id_by_name("fuel"), Some(20));
        assert!(mesh.elements.iter().all(|e| e.kind == ElementKind::Quad4));
        assert_eq!(SideAdjacency::build(&mesh).boundary_loop_count(), 1);
    }

    #[test]
    fn block_name_conflicts_are_rejected() {
        let params = RingParams::hexagon(1.0, 2)
            .with_ring(RegionSpec::new(0.5, 2))
            .with_blocks(vec![1, 2, 3], vec!["a".into(), "a".into(), "b".into()]);
        assert!(matches!(
            assemble_polygon(&params),
            Err(PolygonError::DuplicateBlockName { .. })
        ));
        let shared = RingParams::hexagon(1.0, 2)
            .with_ring(RegionSpec::new(0.5, 2))
            .with_blocks(vec![1, 1, 3], vec!["a".into(), "a".into(), "b".into()]);
        let mesh = assemble_polygon(&shared).unwrap();
        assert_eq!(mesh.subdomain_ids().len(), 2);
        let short = RingParams::hexagon(1.0, 2).with_blocks(vec![1, 2, 3], Vec::new());
        assert!(matches!(
            assemble_polygon(&short),
            Err(PolygonError::BlockListLength { expected: 1, .. })
        ));
    }

    #[test]
    fn external_boundary_and_side_ids() {
        let mut params = RingParams::square(1.0, 2)
            .with_ring(RegionSpec::new(0.5, 1))
            .with_external_boundary(7, Some("rim".into()));
        params.create_side_boundaries = true;
        let mesh = assemble_polygon(&params).unwrap();
        assert!(!mesh.boundary.has_id(OUTER_SIDESET_ID));
        assert_eq!(mesh.boundary.id_by_name("rim"), Some(7));
        assert_eq!(mesh.boundary.side_count(7), 8);
        for k in 1..=4 {
            assert_eq!(mesh.boundary.side_count(OUTER_SIDESET_ID + k), 1);
            assert_eq!(mesh.boundary.side_count(OUTER_SIDESET_ID_ALT + k), 1);
        }
    }

    #[test]
    fn flat_side_up_square_is_axis_aligned() {
        let params = RingParams::square(1.0, 2).with_ring(RegionSpec::new(0.5, 1));
        let mesh = assemble_polygon(&params).unwrap();
        let b = mesh.boundary_nodes(OUTER_SIDESET_ID);
        for n in b {
            let p = mesh.nodes[n as usize];
            assert!((p.x.abs() - 1.0).abs() < 1e-12 || (p.y.abs() - 1.0).abs() < 1e-12);
        }
        assert_relative_eq!(mesh.area(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn interfaces_and_ducts() {
        let mut params = RingParams::hexagon(1.0, 2)
            .with_ring(RegionSpec::new(0.4, 1))
            .with_duct(RegionSpec::new(0.8, 1));
        params.interfaces = InterfaceBoundaries {
            outward: true,
            inward: false,
            id_shift: 0,
            outward_names: vec!["fuel_out".into(), "bg_out".into()],
            inward_names: Vec::new(),
        };
        let mesh = assemble_polygon(&params).unwrap();
        assert_eq!(mesh.metadata.interface_boundary_ids.len(), 2);
        assert_eq!(mesh.boundary.id_by_name("bg_out"), Some(3));
        // the duct interface is the hexagon of apothem 0.8
        for n in mesh.boundary_nodes(3) {
            let r = mesh.nodes[n as usize].coords.norm();
            assert!(r >= 0.8 - 1e-12 && r <= 0.8 / (PI / 6.0).cos() + 1e-12);
        }
    }

    #[test]
    fn smoothing_is_skipped_with_ducts() {
        let params = RingParams::hexagon(1.0, 2)
            .with_duct(RegionSpec::new(0.8, 1))
            .with_smoothing(5);
        let smoothed = assemble_polygon(&params).unwrap();
        let plain = assemble_polygon(&params.clone().with_smoothing(0)).unwrap();
        assert_eq!(smoothed.nodes, plain.nodes);
    }

    #[test]
    fn uniform_sides_restore_tangent_layout() {
        let params = RingParams::hexagon(1.0, 2).with_side_tangents(0, vec![0.0, 0.6, 2.0]);
        let skewed = assemble_polygon(&params).unwrap();
        let mut uniform_params = params;
        uniform_params.uniform_mesh_on_sides = true;
        let uniform = assemble_polygon(&uniform_params).unwrap();
        let plain = assemble_polygon(&RingParams::hexagon(1.0, 2)).unwrap();
        assert_ne!(skewed.metadata.azimuthal_angles, plain.metadata.azimuthal_angles);
        for (a, b) in uniform
            .metadata
            .azimuthal_angles
            .iter()
            .zip(&plain.metadata.azimuthal_angles)
        {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }
}
