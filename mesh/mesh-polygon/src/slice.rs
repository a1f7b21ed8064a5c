//! One angular slice of a polygon cell.
//!
//! A slice covers one polygon side: from the +y axis clockwise by
//! `360°/n`. Its radial cut on the +y axis is tagged [`SLICE_BEGIN`], the
//! other cut [`SLICE_END`], and its rim [`OUTER_SIDESET_ID`].

use std::f64::consts::PI;

use mesh_types::{
    BoundaryId, ElementKind, FeMesh, Point2, OUTER_SIDESET_ID, OUTER_SIDESET_ID_ALT, SLICE_BEGIN,
    SLICE_END,
};
use tracing::debug;

use crate::error::PolygonResult;
use crate::geometry::{corner_distance, slice_edge_points};
use crate::layout::RadialLayout;
use crate::params::{CenterPatch, InterfaceBoundaries};

/// Inputs of [`build_slice`].
#[derive(Debug, Clone, Copy)]
pub struct SliceSpec<'a> {
    /// Number of polygon sides.
    pub num_sides: u32,
    /// Index of the side this slice covers.
    pub side: u32,
    /// Polygon apothem.
    pub apothem: f64,
    /// Azimuthal sectors of this side.
    pub sectors: u32,
    /// Optional tangent distribution of the edge nodes.
    pub tangents: Option<&'a [f64]>,
    /// Shared radial rows.
    pub layout: &'a RadialLayout,
    /// Meshing of the centre.
    pub center: CenterPatch,
    /// Interface boundaries to tag.
    pub interfaces: &'a InterfaceBoundaries,
}

/// Build one slice.
///
/// The centre layer is a triangle fan or a structured quad patch; every
/// later layer is a band of quadrilaterals between consecutive rows. The
/// outermost row of each stage is reused as the innermost row of the next.
///
/// Rim sides carry [`OUTER_SIDESET_ID`] plus a per-side id:
/// `OUTER_SIDESET_ID + side + 1` on the first half of the sectors and
/// `OUTER_SIDESET_ID_ALT + side + 1` on the second.
///
/// # Errors
///
/// Propagates element construction failures.
pub fn build_slice(spec: &SliceSpec<'_>) -> PolygonResult<FeMesh> {
    let a = spec.sectors as usize;
    let layout = spec.layout;
    let radius = corner_distance(spec.apothem, spec.num_sides);
    let edge = slice_edge_points(spec.num_sides, radius, spec.sectors, spec.tangents);

    let row_count = layout.rows.len();
    let mut mesh = FeMesh::with_capacity((row_count + 1) * (a + 1), row_count * a + a * a / 4);

    let mut rows: Vec<Vec<u32>> = Vec::with_capacity(row_count);
    for shape in &layout.rows {
        rows.push(edge.iter().map(|e| mesh.add_node(shape.position(e))).collect());
    }

    // elements of each layer, indexed by sector
    let mut layers: Vec<Vec<u32>> = Vec::with_capacity(row_count);
    match spec.center {
        CenterPatch::Triangles => {
            let c = mesh.add_node(Point2::origin());
            let r0 = &rows[0];
            let mut fan = Vec::with_capacity(a);
            for j in 0..a {
                let e = mesh.add_element(ElementKind::Tri3, &[c, r0[j + 1], r0[j]], layout.layer_blocks[0])?;
                fan.push(e);
            }
            mesh.tag_side(fan[0], c, r0[0], SLICE_BEGIN)?;
            mesh.tag_side(fan[a - 1], c, r0[a], SLICE_END)?;
            layers.push(fan);
        }
        CenterPatch::Quads { factor } => {
            let shell = build_quad_patch(&mut mesh, spec, &rows[0], factor)?;
            let mut band = Vec::with_capacity(a);
            for j in 0..a {
                let e = mesh.add_element(
                    ElementKind::Quad4,
                    &[shell[j], shell[j + 1], rows[0][j + 1], rows[0][j]],
                    layout.layer_blocks[0],
                )?;
                band.push(e);
            }
            mesh.tag_side(band[0], shell[0], rows[0][0], SLICE_BEGIN)?;
            mesh.tag_side(band[a - 1], shell[a], rows[0][a], SLICE_END)?;
            layers.push(band);
        }
    }

    for i in 1..row_count {
        let (inner, outer) = (&rows[i - 1], &rows[i]);
        let mut band = Vec::with_capacity(a);
        for j in 0..a {
            let e = mesh.add_element(
                ElementKind::Quad4,
                &[inner[j], inner[j + 1], outer[j + 1], outer[j]],
                layout.layer_blocks[i],
            )?;
            band.push(e);
        }
        mesh.tag_side(band[0], inner[0], outer[0], SLICE_BEGIN)?;
        mesh.tag_side(band[a - 1], inner[a], outer[a], SLICE_END)?;
        layers.push(band);
    }

    let rim = &rows[row_count - 1];
    let side_id = spec.side + 1;
    for (j, &e) in layers[row_count - 1].iter().enumerate() {
        mesh.tag_side(e, rim[j], rim[j + 1], OUTER_SIDESET_ID)?;
        let per_side = if j < a / 2 {
            OUTER_SIDESET_ID + side_id
        } else {
            OUTER_SIDESET_ID_ALT + side_id
        };
        mesh.tag_side(e, rim[j], rim[j + 1], per_side)?;
    }

    tag_interfaces(&mut mesh, spec, &rows, &layers)?;

    debug!(
        side = spec.side,
        sectors = spec.sectors,
        nodes = mesh.nodes.len(),
        elements = mesh.elements.len(),
        "built slice"
    );
    Ok(mesh)
}

/// Id of the outward face of region `m`.
#[must_use]
pub const fn outward_interface_id(m: usize, shift: BoundaryId) -> BoundaryId {
    #[allow(clippy::cast_possible_truncation)]
    let m = m as BoundaryId;
    2 * m + 1 + shift
}

/// Id of the inward face of region `m + 1`.
#[must_use]
pub const fn inward_interface_id(m: usize, shift: BoundaryId) -> BoundaryId {
    #[allow(clippy::cast_possible_truncation)]
    let m = m as BoundaryId;
    2 * m + 2 + shift
}

fn tag_interfaces(
    mesh: &mut FeMesh,
    spec: &SliceSpec<'_>,
    rows: &[Vec<u32>],
    layers: &[Vec<u32>],
) -> PolygonResult<()> {
    let interfaces = spec.interfaces;
    if !interfaces.any() {
        return Ok(());
    }
    let ends = &spec.layout.region_ends;
    for m in 0..spec.layout.interface_count() {
        let row = ends[m];
        let nodes = &rows[row];
        for j in 0..spec.sectors as usize {
            if interfaces.outward {
                let id = outward_interface_id(m, interfaces.id_shift);
                mesh.tag_side(layers[row][j], nodes[j], nodes[j + 1], id)?;
            }
            if interfaces.inward {
                let id = inward_interface_id(m, interfaces.id_shift);
                mesh.tag_side(layers[row + 1][j], nodes[j], nodes[j + 1], id)?;
            }
        }
    }
    Ok(())
}

/// Build the structured quad patch at the centre and return its shell.
///
/// The patch is the quadrilateral spanned by the centre, a point on the +y
/// axis, a point on the bisector and a point on the far cut. Grid nodes are
/// intersections of straight iso-lines, which for a planar quadrilateral is
/// the bilinear map. The shell runs from the +y axis through the bisector
/// to the far cut and has `a + 1` nodes.
fn build_quad_patch(
    mesh: &mut FeMesh,
    spec: &SliceSpec<'_>,
    first_row: &[u32],
    factor: Option<f64>,
) -> PolygonResult<Vec<u32>> {
    let a = spec.sectors as usize;
    let m = a / 2;
    #[allow(clippy::cast_precision_loss)]
    let mf = m as f64;
    let factor = factor.unwrap_or(mf / (mf + 1.0));
    let row_radius = first_row
        .iter()
        .map(|&n| mesh.nodes[n as usize].coords.norm())
        .fold(f64::INFINITY, f64::min);
    let r0 = row_radius * factor;

    let half = PI / f64::from(spec.num_sides);
    let near = r0 * half.cos();
    let bottom = Point2::new(0.0, near);
    let top = Point2::new(near * (2.0 * half).sin(), near * (2.0 * half).cos());
    let diag = Point2::new(r0 * half.sin(), r0 * half.cos());

    // grid[i][k]: i runs toward `top`, k toward `bottom`
    let mut grid = vec![vec![0_u32; m + 1]; m + 1];
    for (i, column) in grid.iter_mut().enumerate() {
        for (k, node) in column.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let (u, v) = (i as f64 / mf, k as f64 / mf);
            let p = top.coords * (u * (1.0 - v)) + diag.coords * (u * v) + bottom.coords * ((1.0 - u) * v);
            *node = mesh.add_node(Point2::from(p));
        }
    }

    let block = spec.layout.layer_blocks[0];
    for i in 0..m {
        for k in 0..m {
            let e = mesh.add_element(
                ElementKind::Quad4,
                &[grid[i][k], grid[i + 1][k], grid[i + 1][k + 1], grid[i][k + 1]],
                block,
            )?;
            if i == 0 {
                mesh.tag_side(e, grid[0][k], grid[0][k + 1], SLICE_BEGIN)?;
            }
            if k == 0 {
                mesh.tag_side(e, grid[i][0], grid[i + 1][0], SLICE_END)?;
            }
        }
    }

    let shell = (0..=a)
        .map(|s| if s <= m { grid[s][m] } else { grid[m][a - s] })
        .collect();
    Ok(shell)
}
