//! Peripheral pieces that square off the boundary of a lattice.
//!
//! A cell on the rim of a lattice is wrapped by one quad strip per exposed
//! side. Strips are described in a reference frame (the top-right cell of
//! the lattice) by inner reference points and outward displacements, then
//! rotated into place.

use mesh_transform::rotate_mesh;
use mesh_types::{
    ElementKind, FeMesh, Point2, SubdomainId, Vector2, OUTER_SIDESET_ID, PERIPHERAL_ID_SHIFT,
    SLICE_ALT, TOLERANCE,
};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PolygonError, PolygonResult};

/// Cell shape of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LatticeShape {
    /// Corner-up hexagonal cells in a flat-topped hexagonal lattice.
    Hexagonal,
    /// Axis-aligned square cells in a square lattice.
    Cartesian,
}

impl LatticeShape {
    /// Number of sides of one cell.
    #[must_use]
    pub const fn num_sides(self) -> u32 {
        match self {
            Self::Hexagonal => 6,
            Self::Cartesian => 4,
        }
    }
}

/// Position of a rim cell in the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    /// A lattice corner cell.
    Corner,
    /// A cell along a lattice side.
    Edge,
}

/// Reference points of the peripheral strips of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PeripheralPoints {
    /// Inner reference points.
    pub inner: Vec<Point2<f64>>,
    /// Displacement from each inner point to its outer counterpart.
    pub outer_delta: Vec<Vector2<f64>>,
}

impl PeripheralPoints {
    /// Reference points of layer `radial_index` of a lattice.
    ///
    /// # Arguments
    ///
    /// * `shape` - Lattice shape
    /// * `pitch` - Cell pitch (flat to flat)
    /// * `extra_in` - Offset of the layer's inner face beyond the first layer's inner face
    /// * `extra_out` - Offset of the layer's outer face
    /// * `radial_index` - Layer index; layer 0 starts on the cell boundary
    #[must_use]
    pub fn new(
        shape: LatticeShape,
        pitch: f64,
        extra_in: f64,
        extra_out: f64,
        radial_index: usize,
    ) -> Self {
        match shape {
            LatticeShape::Hexagonal => hex_points(pitch, extra_in, extra_out, radial_index),
            LatticeShape::Cartesian => cartesian_points(pitch, extra_in, extra_out),
        }
    }
}

fn hex_points(p: f64, ein: f64, eout: f64, radial_index: usize) -> PeripheralPoints {
    let s = 3.0_f64.sqrt();
    // offsets that only apply once the layer starts on the flat boundary
    let ri = |v: f64| if radial_index == 0 { 0.0 } else { v };
    let inner = vec![
        Point2::new(-p / 2.0, s * p / 6.0 + ri(s * p / 6.0 + ein)),
        Point2::new(-p / 4.0, s * p / 4.0 + ri(s * p / 12.0 + ein)),
        Point2::new(0.0, s * p / 3.0 + ri(ein)),
        Point2::new(
            p / 4.0 + ri(p / 12.0 + s * ein / 3.0),
            s * p / 4.0 + ri(s * p / 12.0 + ein),
        ),
        Point2::new(p / 2.0 + ri(s * ein / 2.0), s * p / 6.0 + ri(ein / 2.0)),
        Point2::new(
            p / 2.0 + ri(p / 8.0 + s * ein / 2.0),
            ri(s * p / 24.0 + ein / 2.0),
        ),
        Point2::new(
            p / 2.0 + ri(p / 4.0 + s * ein / 2.0),
            -s * p / 6.0 + ri(s * p / 12.0 + ein / 2.0),
        ),
        Point2::new(p / 4.0, s * p / 4.0 + ri(s * p / 12.0 + ein)),
        Point2::new(p / 2.0, s * p / 6.0 + ri(s * p / 6.0 + ein)),
    ];
    let outer_delta = vec![
        Vector2::new(0.0, s * p / 6.0 + eout - ri(s * p / 6.0 + ein)),
        Vector2::new(0.0, s * p / 12.0 + eout - ri(s * p / 12.0 + ein)),
        Vector2::new(0.0, eout - ri(ein)),
        Vector2::new(
            p / 12.0 + s * eout / 3.0 - ri(p / 12.0 + s * ein / 3.0),
            s * p / 12.0 + eout - ri(s * p / 12.0 + ein),
        ),
        Vector2::new(s * eout / 2.0 - ri(s * ein / 2.0), eout / 2.0 - ri(ein / 2.0)),
        Vector2::new(
            p / 8.0 + s * eout / 2.0 - ri(p / 8.0 + s * ein / 2.0),
            s * p / 24.0 + eout / 2.0 - ri(s * p / 24.0 + ein / 2.0),
        ),
        Vector2::new(
            p / 4.0 + s * eout / 2.0 - ri(p / 4.0 + s * ein / 2.0),
            s * p / 12.0 + eout / 2.0 - ri(s * p / 12.0 + ein / 2.0),
        ),
        Vector2::new(0.0, s * p / 12.0 + eout - ri(s * p / 12.0 + ein)),
        Vector2::new(0.0, s * p / 6.0 + eout - ri(s * p / 6.0 + ein)),
    ];
    PeripheralPoints { inner, outer_delta }
}

fn cartesian_points(p: f64, din: f64, dout: f64) -> PeripheralPoints {
    let h = p / 2.0;
    let d = dout - din;
    PeripheralPoints {
        inner: vec![
            Point2::new(-h, h + din),
            Point2::new(0.0, h + din),
            Point2::new(h + din, h + din),
            Point2::new(h + din, 0.0),
            Point2::new(h + din, -h),
            Point2::new(h, h + din),
        ],
        outer_delta: vec![
            Vector2::new(0.0, d),
            Vector2::new(0.0, d),
            Vector2::new(d, d),
            Vector2::new(d, 0.0),
            Vector2::new(d, 0.0),
            Vector2::new(0.0, d),
        ],
    }
}

/// Indices into [`PeripheralPoints`] of the start, middle and end of each strip.
#[must_use]
pub const fn strip_indices(shape: LatticeShape, kind: PieceKind) -> &'static [[usize; 3]] {
    match (shape, kind) {
        (LatticeShape::Hexagonal, PieceKind::Corner) => &[[0, 1, 2], [2, 3, 4], [4, 5, 6]],
        (LatticeShape::Hexagonal, PieceKind::Edge) => &[[0, 1, 2], [2, 7, 8]],
        (LatticeShape::Cartesian, PieceKind::Corner) => &[[0, 1, 2], [2, 3, 4]],
        (LatticeShape::Cartesian, PieceKind::Edge) => &[[0, 1, 5]],
    }
}

/// Build one quad strip of `sectors` columns and `intervals` rows.
///
/// The inner face runs from `inner[0]` through `inner[1]` to `inner[2]`,
/// half the sectors on each leg. Row `i` is displaced by `i / intervals`
/// of the interpolated outer delta. Every rim side carries
/// [`OUTER_SIDESET_ID`]; the inner face also carries `SLICE_ALT + layer`
/// and the outer face `SLICE_ALT + layer + 1`. Elements get block
/// `PERIPHERAL_ID_SHIFT + layer`.
///
/// # Errors
///
/// Returns an error for an odd sector count, zero intervals, or degenerate
/// elements.
pub fn build_peripheral_strip(
    sectors: u32,
    intervals: u32,
    inner: [Point2<f64>; 3],
    delta: [Vector2<f64>; 3],
    layer: u32,
) -> PolygonResult<FeMesh> {
    if sectors == 0 || sectors % 2 != 0 {
        return Err(PolygonError::OddPeripheralSectors(sectors));
    }
    if intervals == 0 {
        return Err(PolygonError::ZeroIntervals {
            region: "peripheral layer",
            index: layer as usize,
        });
    }
    let a = sectors as usize;
    let half = f64::from(sectors) / 2.0;
    let columns = a + 1;
    let mut mesh = FeMesh::with_capacity(columns * (intervals as usize + 1), a * intervals as usize);

    let interpolate = |leg: usize, i: u32, j: u32| {
        let w = f64::from(j) / half;
        let p = inner[leg].coords * (1.0 - w) + inner[leg + 1].coords * w;
        let d = delta[leg] * (1.0 - w) + delta[leg + 1] * w;
        Point2::from(p + d * (f64::from(i) / f64::from(intervals)))
    };
    for i in 0..=intervals {
        for j in 0..=sectors / 2 {
            mesh.add_node(interpolate(0, i, j));
        }
        for j in 1..=sectors / 2 {
            mesh.add_node(interpolate(1, i, j));
        }
    }

    let block: SubdomainId = PERIPHERAL_ID_SHIFT + layer;
    #[allow(clippy::cast_possible_truncation)]
    let node = |i: u32, j: usize| (j + columns * i as usize) as u32;
    for i in 0..intervals {
        for j in 0..a {
            let quad = [node(i, j), node(i, j + 1), node(i + 1, j + 1), node(i + 1, j)];
            let e = mesh.add_element(ElementKind::Quad4, &quad, block)?;
            if i == 0 {
                mesh.tag_side(e, quad[0], quad[1], OUTER_SIDESET_ID)?;
                mesh.tag_side(e, quad[0], quad[1], SLICE_ALT + layer)?;
            }
            if i == intervals - 1 {
                mesh.tag_side(e, quad[2], quad[3], OUTER_SIDESET_ID)?;
                mesh.tag_side(e, quad[2], quad[3], SLICE_ALT + layer + 1)?;
            }
            if j == 0 {
                mesh.tag_side(e, quad[3], quad[0], OUTER_SIDESET_ID)?;
            }
            if j == a - 1 {
                mesh.tag_side(e, quad[1], quad[2], OUTER_SIDESET_ID)?;
            }
        }
    }
    Ok(mesh)
}

/// Wrap a rim cell with its peripheral layers.
///
/// `extra` lists the outer offset of each layer (beyond the cell boundary
/// for layer 0) and `intervals` the radial intervals of each layer. The
/// reference strips are rotated by `rotation` degrees and stitched to
/// `cell` along [`OUTER_SIDESET_ID`]. Strips are promoted to second order
/// when the cell is.
///
/// # Errors
///
/// Returns an error if a strip cannot be built or stitched.
#[allow(clippy::too_many_arguments)]
pub fn add_peripheral_mesh(
    cell: &mut FeMesh,
    shape: LatticeShape,
    kind: PieceKind,
    rotation: f64,
    pitch: f64,
    sectors: u32,
    extra: &[f64],
    intervals: &[u32],
) -> PolygonResult<()> {
    let promote = cell.is_second_order()?;
    let quad9 = cell.elements.iter().any(|e| e.kind == ElementKind::Quad9);
    for (layer, (&extra_out, &layer_intervals)) in extra.iter().zip(intervals).enumerate() {
        let extra_in = if layer == 0 { 0.0 } else { extra[layer - 1] };
        let points = PeripheralPoints::new(shape, pitch, extra_in, extra_out, layer);
        for strip in strip_indices(shape, kind) {
            let inner = strip.map(|k| points.inner[k]);
            let delta = strip.map(|k| points.outer_delta[k]);
            #[allow(clippy::cast_possible_truncation)]
            let mut piece = build_peripheral_strip(sectors, layer_intervals, inner, delta, layer as u32)?;
            rotate_mesh(&mut piece, rotation);
            if promote {
                piece.to_second_order(quad9)?;
            }
            cell.stitch(piece, OUTER_SIDESET_ID, OUTER_SIDESET_ID, TOLERANCE, true)?;
        }
    }
    debug!(?shape, ?kind, rotation, layers = extra.len(), "added peripheral mesh");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::SideAdjacency;

    #[test]
    fn cartesian_edge_strip() {
        let points = PeripheralPoints::new(LatticeShape::Cartesian, 2.0, 0.0, 0.5, 0);
        let idx = strip_indices(LatticeShape::Cartesian, PieceKind::Edge)[0];
        let strip = build_peripheral_strip(
            4,
            2,
            idx.map(|k| points.inner[k]),
            idx.map(|k| points.outer_delta[k]),
            0,
        )
        .unwrap();
        assert_eq!(strip.nodes.len(), 15);
        assert_eq!(strip.elements.len(), 8);
        assert_relative_eq!(strip.area(), 2.0 * 0.5, epsilon = 1e-12);
        assert!(strip.elements.iter().all(|e| e.subdomain == PERIPHERAL_ID_SHIFT));
        assert_eq!(strip.boundary.side_count(SLICE_ALT), 4);
        assert_eq!(strip.boundary.side_count(SLICE_ALT + 1), 4);
        assert_eq!(strip.boundary.side_count(OUTER_SIDESET_ID), 12);
    }

    #[test]
    fn hex_first_layer_reaches_the_flat_boundary() {
        let p = 2.0;
        let e = 0.3;
        let points = PeripheralPoints::new(LatticeShape::Hexagonal, p, 0.0, e, 0);
        let top = 3.0_f64.sqrt() * p / 3.0 + e;
        for k in [0, 1, 2, 7, 8] {
            assert_relative_eq!((points.inner[k] + points.outer_delta[k]).y, top, epsilon = 1e-12);
        }
        // the next layer starts where the first ended
        let next = PeripheralPoints::new(LatticeShape::Hexagonal, p, e, 2.0 * e, 1);
        for k in 0..9 {
            assert_relative_eq!(
                next.inner[k],
                points.inner[k] + points.outer_delta[k],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn odd_sectors_are_rejected() {
        let p = Point2::origin();
        let v = Vector2::new(0.0, 1.0);
        assert!(build_peripheral_strip(3, 1, [p, p, p], [v, v, v], 0).is_err());
    }

    #[test]
    fn square_cell_with_corner_periphery() {
        // a 2x2 quad cell of pitch 2 tagged on its rim
        let mut cell = FeMesh::new();
        for y in [-1.0, 0.0, 1.0] {
            for x in [-1.0, 0.0, 1.0] {
                cell.add_node(Point2::new(x, y));
            }
        }
        for (i, j) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let n0 = i * 3 + j;
            cell.add_element(ElementKind::Quad4, &[n0, n0 + 1, n0 + 4, n0 + 3], 1)
                .unwrap();
        }
        let on_rim = |a: Point2<f64>, b: Point2<f64>| {
            (a.x == b.x && a.x.abs() == 1.0) || (a.y == b.y && a.y.abs() == 1.0)
        };
        let mut rim = Vec::new();
        for (e, element) in cell.elements.iter().enumerate() {
            for s in 0..4 {
                let (a, b) = element.side_nodes(s);
                if on_rim(cell.nodes[a as usize], cell.nodes[b as usize]) {
                    rim.push((e as u32, a, b));
                }
            }
        }
        for (e, a, b) in rim {
            cell.tag_side(e, a, b, OUTER_SIDESET_ID).unwrap();
        }
        add_peripheral_mesh(
            &mut cell,
            LatticeShape::Cartesian,
            PieceKind::Corner,
            0.0,
            2.0,
            2,
            &[0.5, 1.0],
            &[1, 2],
        )
        .unwrap();
        // the cell plus an L-shaped band of width 1
        assert_relative_eq!(cell.area(), 3.0 * 3.0, epsilon = 1e-12);
        assert!(cell.min_element_area().unwrap() > 0.0);
        let adj = SideAdjacency::build(&cell);
        assert_eq!(adj.boundary_loop_count(), 1);
        assert!(cell.elements.iter().any(|e| e.subdomain == PERIPHERAL_ID_SHIFT + 1));
    }
}
