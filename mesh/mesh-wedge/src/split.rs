//! Wedge splitting: move node lines onto the wedge edges and retag the
//! elements between them.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use mesh_polygon::{
    azimuth_degrees, boundary_azimuths, boundary_vertex_nodes, correction_factor,
    four_point_intercept, ElementOrder,
};
use mesh_types::{
    fuzzy_eq, wrap_degrees, BoundaryId, ElementKind, FeMesh, Point2, SubdomainId, Vector2,
    TOLERANCE,
};
use nalgebra::center;
use tracing::{debug, info};

use crate::error::{WedgeError, WedgeResult};
use crate::params::WedgeParams;
use crate::snap::{bracket_angle, choose_moved_angle, corner_test, AngleSnap};

/// Outcome of a wedge split.
#[derive(Debug, Clone)]
pub struct WedgeSplit {
    /// The edited mesh.
    pub mesh: FeMesh,
    /// How the start edge was realised.
    pub start: AngleSnap,
    /// How the end edge was realised.
    pub end: AngleSnap,
    /// Sorted azimuthal angles after the split.
    pub angles: Vec<f64>,
    /// Nodes that were relocated.
    pub moved_nodes: Vec<u32>,
    /// Number of elements moved to a new block.
    pub retagged_elements: usize,
    /// Scale applied to circular radii, 1 when volumes are not preserved.
    pub radius_ratio: f64,
}

/// Split a wedge out of a ring or lattice mesh.
///
/// Each wedge edge is snapped onto the node line of a neighbouring
/// azimuthal angle, and that line is moved onto the edge. Nodes on circles
/// keep their radius. Background nodes slide along the line to their
/// neighbour on the kept line; nodes on the external boundary stay put
/// unless a block touching it changes. Circles are then rescaled so their
/// polygonized area is preserved, and elements of the old blocks whose
/// centroid lies in `[start, end)` move to the new blocks.
///
/// The input is left untouched; the edited copy is returned.
///
/// # Errors
///
/// Returns an error for invalid parameters, unknown blocks, the central
/// quad block, a mesh without polygon metadata or external boundary, a
/// wedge narrower than the mesh's sector spacing, or rescaled circles that
/// would overlap the background.
///
/// # Example
///
/// ```
/// use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};
/// use mesh_wedge::{split_wedge, WedgeParams};
///
/// let mesh = assemble_polygon(&RingParams::hexagon(1.0, 2).with_ring(RegionSpec::new(0.5, 1))).unwrap();
///
/// let split = split_wedge(&mesh, &WedgeParams::new(10.0, 50.0).with_block(1, 5)).unwrap();
/// assert!(split.angles.iter().any(|a| (a - 10.0).abs() < 1e-6));
/// assert!(split.mesh.subdomain_ids().contains(&5));
/// ```
pub fn split_wedge(mesh: &FeMesh, params: &WedgeParams) -> WedgeResult<WedgeSplit> {
    params.validate()?;
    let blocks = mesh.subdomain_ids();
    for &old in &params.old_block_ids {
        if !blocks.contains(&old) {
            return Err(WedgeError::MissingBlock(old));
        }
        if mesh.metadata.quad_center_block_id == Some(old) {
            return Err(WedgeError::QuadCenterBlock(old));
        }
    }
    let external = params.external_boundary_id;
    if !mesh.boundary.has_id(external) {
        return Err(WedgeError::MissingBoundary(external));
    }
    let num_sides = mesh.metadata.num_sides;
    if num_sides < 3 {
        return Err(WedgeError::MissingMetadata);
    }
    let order = if mesh.is_second_order()? {
        ElementOrder::Second
    } else {
        ElementOrder::First
    };
    let (start, end) = params.wrapped_angles();

    let mut out = mesh.clone();

    let mut angles = boundary_azimuths(&out, external);
    angles.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
    let is_corner = corner_test(num_sides, first_corner(&out, external));
    let bracket = |target| bracket_angle(target, &angles).ok_or(WedgeError::MissingBoundary(external));
    let start_snap = choose_moved_angle(start, &bracket(start)?, &is_corner);
    let end_snap = choose_moved_angle(end, &bracket(end)?, &is_corner);
    if start_snap.moved_index == end_snap.moved_index {
        return Err(WedgeError::TooCoarse {
            start,
            end,
            angle: start_snap.moved_angle,
        });
    }
    debug!(?start_snap, ?end_snap, "snapped wedge edges");

    let vertices: HashSet<u32> = out
        .elements
        .iter()
        .flat_map(|e| e.vertex_nodes().iter().copied())
        .collect();
    let circle_radius = out.metadata.max_radius;
    let old_factor = if params.preserve_volumes && circle_radius > 0.0 {
        Some(circle_factor(&out, &vertices, circle_radius, order)?)
    } else {
        None
    };

    let external_changed = out
        .boundary
        .sides_with_id(external)
        .any(|(e, _)| params.old_block_ids.contains(&out.elements[e as usize].subdomain));
    let rim = Rim {
        nodes: out.boundary_nodes(external).into_iter().collect(),
        fixed: !external_changed,
    };
    let radii = (center_patch_radius(&out), circle_radius);
    let lines = relocate_lines(&mut out, &[start_snap, end_snap], radii, &rim);

    if order == ElementOrder::Second {
        let moved: HashSet<u32> = lines.moved.iter().copied().collect();
        fix_midpoints(&mut out, &moved, lines.max_circular);
    }

    let mut radius_ratio = 1.0;
    if let Some(old_factor) = old_factor {
        radius_ratio = circle_factor(&out, &vertices, circle_radius, order)? / old_factor;
        let max_circular = circle_radius * radius_ratio;
        if lines.min_non_circular < max_circular {
            return Err(WedgeError::RegionOverlap {
                max_circular,
                min_non_circular: lines.min_non_circular,
            });
        }
        for p in &mut out.nodes {
            let r = p.coords.norm();
            if r > 0.0 && r <= circle_radius + TOLERANCE {
                p.coords *= radius_ratio;
            }
        }
    }

    let retagged_elements = retag(&mut out, params, start, end)?;

    let angles = if circle_radius > 0.0 {
        circle_azimuths(&out, &vertices, circle_radius * radius_ratio)
            .into_iter()
            .filter_map(|(a, is_vertex)| is_vertex.then_some(a))
            .collect()
    } else {
        boundary_azimuths(&out, external)
    };

    out.metadata.azimuthal_angles.clone_from(&angles);
    out.metadata.max_radius *= radius_ratio;

    info!(
        start,
        end,
        moved = lines.moved.len(),
        retagged = retagged_elements,
        radius_ratio,
        "split wedge"
    );
    Ok(WedgeSplit {
        mesh: out,
        start: start_snap,
        end: end_snap,
        angles,
        moved_nodes: lines.moved,
        retagged_elements,
        radius_ratio,
    })
}

/// Nodes moved by [`relocate_lines`] and the radii they were found at.
struct MovedLines {
    moved: Vec<u32>,
    max_circular: f64,
    min_non_circular: f64,
}

/// Nodes of the external boundary and whether they must stay put.
struct Rim {
    nodes: HashSet<u32>,
    fixed: bool,
}

/// Move the node line at each snap's moved angle onto its target.
///
/// `radii` holds the central patch radius (lines start outside it) and the
/// outermost circle radius (0 when the mesh has no circles). Lines are read
/// from the original positions, so a line moved by one snap still guides
/// the other.
fn relocate_lines(mesh: &mut FeMesh, snaps: &[AngleSnap], radii: (f64, f64), rim: &Rim) -> MovedLines {
    let (min_radius, circle_radius) = radii;
    let original = mesh.nodes.clone();
    let mut lines = MovedLines {
        moved: Vec::new(),
        max_circular: 0.0,
        min_non_circular: f64::INFINITY,
    };
    for snap in snaps {
        let moved_line = node_line(&original, snap.moved_angle, min_radius);
        let kept_line = node_line(&original, snap.kept_angle, min_radius);
        let (sin, cos) = snap.target.to_radians().sin_cos();
        let direction = Vector2::new(cos, sin);
        for (&m, &k) in moved_line.iter().zip(&kept_line) {
            let (pm, pk) = (original[m as usize], original[k as usize]);
            let r = pm.coords.norm();
            let on_rim = rim.nodes.contains(&m);
            let inside = circle_radius <= 0.0 || r <= circle_radius + TOLERANCE;
            if !on_rim && inside && fuzzy_eq(r, pk.coords.norm()) {
                lines.max_circular = lines.max_circular.max(r);
                mesh.nodes[m as usize] = Point2::from(direction * r);
                lines.moved.push(m);
                continue;
            }
            lines.min_non_circular = lines.min_non_circular.min(r);
            if on_rim && rim.fixed {
                continue;
            }
            if let Some(p) = four_point_intercept(pm, pk, Point2::origin(), Point2::from(direction * (2.0 * r))) {
                mesh.nodes[m as usize] = p;
                lines.moved.push(m);
            }
        }
    }
    lines
}

/// Nodes outside `min_radius` lying in direction `angle`, nearest first.
#[allow(clippy::cast_possible_truncation)]
fn node_line(nodes: &[Point2<f64>], angle: f64, min_radius: f64) -> Vec<u32> {
    let mut line: Vec<(f64, u32)> = nodes
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let r = p.coords.norm();
            let aligned = wrap_degrees(azimuth_degrees(p) - angle).abs() < TOLERANCE;
            (r > min_radius + TOLERANCE && aligned).then_some((r, i as u32))
        })
        .collect();
    line.sort_by(|a, b| a.0.total_cmp(&b.0));
    line.into_iter().map(|(_, n)| n).collect()
}

/// Azimuth of the outermost vertex on boundary `id`.
fn first_corner(mesh: &FeMesh, id: BoundaryId) -> f64 {
    boundary_vertex_nodes(mesh, id)
        .iter()
        .map(|&n| mesh.nodes[n as usize])
        .max_by(|a, b| a.coords.norm().total_cmp(&b.coords.norm()))
        .map_or(0.0, |p| azimuth_degrees(&p))
}

/// Outer radius of the central quad patch, 0 without one.
fn center_patch_radius(mesh: &FeMesh) -> f64 {
    mesh.metadata.quad_center_block_id.map_or(0.0, |block| {
        mesh.elements
            .iter()
            .filter(|e| e.subdomain == block)
            .flat_map(|e| e.nodes.iter())
            .map(|&n| mesh.nodes[n as usize].coords.norm())
            .fold(0.0, f64::max)
    })
}

/// Sorted azimuths of the nodes on the circle of `radius`, each flagged
/// with whether it is an element vertex.
#[allow(clippy::cast_possible_truncation)]
fn circle_azimuths(mesh: &FeMesh, vertices: &HashSet<u32>, radius: f64) -> Vec<(f64, bool)> {
    let mut circle: Vec<(f64, bool)> = mesh
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, p)| fuzzy_eq(p.coords.norm(), radius))
        .map(|(i, p)| (azimuth_degrees(p), vertices.contains(&(i as u32))))
        .collect();
    circle.sort_by(|a, b| a.0.total_cmp(&b.0));
    circle
}

fn circle_factor(mesh: &FeMesh, vertices: &HashSet<u32>, radius: f64, order: ElementOrder) -> WedgeResult<f64> {
    let circle = circle_azimuths(mesh, vertices, radius);
    let angles: Vec<f64> = circle.iter().map(|a| a.0).collect();
    let first_is_vertex = circle.first().map_or(true, |a| a.1);
    Ok(correction_factor(&angles, true, order, first_is_vertex)?)
}

/// Reset the mid-side nodes of elements touching moved nodes.
///
/// Sides with both ends on one circle inside `circle_radius` follow the
/// arc; other sides are straight.
fn fix_midpoints(mesh: &mut FeMesh, moved: &HashSet<u32>, circle_radius: f64) {
    let touched: Vec<usize> = mesh
        .elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.vertex_nodes().iter().any(|n| moved.contains(n)))
        .map(|(i, _)| i)
        .collect();

    let mut updates = Vec::new();
    for &i in &touched {
        let e = &mesh.elements[i];
        for s in 0..e.kind.vertex_count() {
            #[allow(clippy::cast_possible_truncation)]
            let side = s as u8;
            let Some(mid) = e.side_mid_node(side) else {
                continue;
            };
            let (a, b) = e.side_nodes(side);
            let (pa, pb) = (mesh.nodes[a as usize], mesh.nodes[b as usize]);
            let r = pa.coords.norm();
            let p = if fuzzy_eq(r, pb.coords.norm()) && r < circle_radius + TOLERANCE {
                Point2::from((pa.coords + pb.coords).normalize() * r)
            } else {
                center(&pa, &pb)
            };
            updates.push((mid, p));
        }
    }
    for (node, p) in updates {
        mesh.nodes[node as usize] = p;
    }

    let faces: Vec<(u32, Point2<f64>)> = touched
        .iter()
        .map(|&i| &mesh.elements[i])
        .filter(|e| e.kind == ElementKind::Quad9)
        .map(|e| {
            let sum = |ids: &[u32]| {
                ids.iter()
                    .fold(Vector2::zeros(), |acc, &n| acc + mesh.nodes[n as usize].coords)
            };
            (e.nodes[8], Point2::from(sum(&e.nodes[4..8]) * 0.5 - sum(&e.nodes[..4]) * 0.25))
        })
        .collect();
    for (node, p) in faces {
        mesh.nodes[node as usize] = p;
    }
}

/// Move old-block elements whose centroid azimuth lies in `[start, end)`
/// to their new blocks. Returns the number of retagged elements.
fn retag(mesh: &mut FeMesh, params: &WedgeParams, start: f64, end: f64) -> WedgeResult<usize> {
    let remap: BTreeMap<SubdomainId, SubdomainId> = params
        .old_block_ids
        .iter()
        .copied()
        .zip(params.new_block_ids.iter().copied())
        .collect();
    let in_wedge = |theta: f64| {
        if start < end {
            theta >= start && theta < end
        } else {
            theta >= start || theta < end
        }
    };
    let retagged: Vec<(usize, SubdomainId)> = mesh
        .elements
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            let &new = remap.get(&e.subdomain)?;
            in_wedge(azimuth_degrees(&e.vertex_average(&mesh.nodes))).then_some((i, new))
        })
        .collect();
    for &(i, new) in &retagged {
        mesh.elements[i].subdomain = new;
    }

    let names: BTreeMap<SubdomainId, String> = params
        .new_block_ids
        .iter()
        .copied()
        .zip(params.new_block_names.iter().cloned())
        .collect();
    mesh.merge_subdomain_names(&names)?;
    Ok(retagged.len())
}
