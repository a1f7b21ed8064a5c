//! Element kinds and connectivity.

use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::SubdomainId;

/// Topology of a 2D element.
///
/// Node ordering follows the usual convention: vertices first
/// (counter-clockwise), then one mid-side node per side in side order,
/// then the face centre for [`ElementKind::Quad9`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementKind {
    /// Linear triangle.
    Tri3,
    /// Bilinear quadrilateral.
    Quad4,
    /// Quadratic triangle.
    Tri6,
    /// Serendipity quadrilateral.
    Quad8,
    /// Biquadratic quadrilateral.
    Quad9,
}

impl ElementKind {
    /// Total number of nodes.
    #[must_use]
    pub const fn node_count(self) -> usize {
        match self {
            Self::Tri3 => 3,
            Self::Quad4 => 4,
            Self::Tri6 => 6,
            Self::Quad8 => 8,
            Self::Quad9 => 9,
        }
    }

    /// Number of corner nodes, equal to the number of sides.
    #[must_use]
    pub const fn vertex_count(self) -> usize {
        match self {
            Self::Tri3 | Self::Tri6 => 3,
            Self::Quad4 | Self::Quad8 | Self::Quad9 => 4,
        }
    }

    /// Whether sides carry mid-side nodes.
    #[must_use]
    pub const fn is_second_order(self) -> bool {
        matches!(self, Self::Tri6 | Self::Quad8 | Self::Quad9)
    }

    /// Whether this is a triangle.
    #[must_use]
    pub const fn is_triangle(self) -> bool {
        matches!(self, Self::Tri3 | Self::Tri6)
    }

    /// Local node pairs swapped to reverse orientation.
    ///
    /// Mid-side nodes follow their sides so the flipped element stays valid.
    #[must_use]
    pub const fn flip_swaps(self) -> &'static [(usize, usize)] {
        match self {
            Self::Tri3 => &[(1, 2)],
            Self::Quad4 => &[(1, 3)],
            Self::Tri6 => &[(1, 2), (3, 5)],
            Self::Quad8 | Self::Quad9 => &[(1, 3), (4, 7), (5, 6)],
        }
    }

    /// Local vertex indices bounding `side`.
    #[must_use]
    pub const fn side_vertices(self, side: u8) -> (usize, usize) {
        let n = self.vertex_count();
        let s = side as usize % n;
        (s, (s + 1) % n)
    }

    /// Local index of the mid-side node of `side`, if any.
    #[must_use]
    pub const fn side_midpoint(self, side: u8) -> Option<usize> {
        if self.is_second_order() {
            Some(self.vertex_count() + side as usize % self.vertex_count())
        } else {
            None
        }
    }

    /// The second-order counterpart of a linear kind.
    #[must_use]
    pub const fn promoted(self, quad9: bool) -> Self {
        match self {
            Self::Tri3 | Self::Tri6 => Self::Tri6,
            Self::Quad4 | Self::Quad8 | Self::Quad9 => {
                if quad9 {
                    Self::Quad9
                } else {
                    Self::Quad8
                }
            }
        }
    }

    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tri3 => "TRI3",
            Self::Quad4 => "QUAD4",
            Self::Tri6 => "TRI6",
            Self::Quad8 => "QUAD8",
            Self::Quad9 => "QUAD9",
        }
    }
}

/// A mesh element: kind, node ids, subdomain and extra integers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// Topology.
    pub kind: ElementKind,
    /// Node ids, `kind.node_count()` of them.
    pub nodes: Vec<u32>,
    /// Subdomain (block) id.
    pub subdomain: SubdomainId,
    /// Extra integer values, indexed like the mesh's extra integer names.
    pub extra: Vec<u32>,
}

impl Element {
    /// Create an element with no extra integers.
    #[must_use]
    pub fn new(kind: ElementKind, nodes: Vec<u32>, subdomain: SubdomainId) -> Self {
        Self {
            kind,
            nodes,
            subdomain,
            extra: Vec::new(),
        }
    }

    /// Global node ids of the two vertices bounding `side`.
    #[must_use]
    pub fn side_nodes(&self, side: u8) -> (u32, u32) {
        let (a, b) = self.kind.side_vertices(side);
        (self.nodes[a], self.nodes[b])
    }

    /// Global id of the mid-side node of `side`, if any.
    #[must_use]
    pub fn side_mid_node(&self, side: u8) -> Option<u32> {
        self.kind.side_midpoint(side).map(|i| self.nodes[i])
    }

    /// Side whose vertices are `a` and `b` in either order.
    #[must_use]
    pub fn side_index(&self, a: u32, b: u32) -> Option<u8> {
        (0..self.kind.vertex_count()).find_map(|s| {
            #[allow(clippy::cast_possible_truncation)] // at most four sides
            let side = s as u8;
            let (p, q) = self.side_nodes(side);
            ((p == a && q == b) || (p == b && q == a)).then_some(side)
        })
    }

    /// Corner node ids.
    #[must_use]
    pub fn vertex_nodes(&self) -> &[u32] {
        &self.nodes[..self.kind.vertex_count()]
    }

    /// Reverse orientation in place using the kind's swap list.
    pub fn flip(&mut self) {
        for &(i, j) in self.kind.flip_swaps() {
            self.nodes.swap(i, j);
        }
    }

    /// Signed area given the node coordinate table.
    ///
    /// Curved sides of second-order elements contribute their parabolic
    /// segment, so the value is exact for isoparametric geometry.
    #[must_use]
    pub fn signed_area(&self, coords: &[Point2<f64>]) -> f64 {
        let n = self.kind.vertex_count();
        let mut twice = 0.0;
        let mut curved = 0.0;
        for s in 0..n {
            let a = coords[self.nodes[s] as usize];
            let b = coords[self.nodes[(s + 1) % n] as usize];
            twice += a.x.mul_add(b.y, -(b.x * a.y));
            if self.kind.is_second_order() {
                let m = coords[self.nodes[n + s] as usize];
                let (am, ab) = (m - a, b - a);
                curved += 2.0 / 3.0 * am.x.mul_add(ab.y, -(am.y * ab.x));
            }
        }
        0.5 * twice + curved
    }

    /// Average of the corner coordinates.
    #[must_use]
    pub fn vertex_average(&self, coords: &[Point2<f64>]) -> Point2<f64> {
        let verts = self.vertex_nodes();
        let sum = verts
            .iter()
            .fold(nalgebra::Vector2::<f64>::zeros(), |acc, &v| acc + coords[v as usize].coords);
        #[allow(clippy::cast_precision_loss)]
        let n = verts.len() as f64;
        Point2::from(sum / n)
    }
}
