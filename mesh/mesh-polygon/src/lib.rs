//! Polygon unit-cell meshing with concentric rings and ducts.
//!
//! A unit cell is a regular polygon (hexagon or square for lattices) that
//! holds concentric circular rings, a background transition region and
//! optional polygonal ducts. It is built one angular slice per side, and
//! the slices are stitched into a closed mesh.
//!
//! # Stages
//!
//! - [`correction_factor`] - Radius scale that keeps polygonized rings at the area of their circles
//! - [`region_fractions`] / [`bias_terms`] - Graded radial spacing with boundary layers
//! - [`RadialLayout`] - Node rows and positional block ids shared by all slices
//! - [`build_slice`] - One slice, tagged on its radial cuts and rim
//! - [`assemble_polygon`] - The closed cell with block ids, boundaries and metadata
//! - [`add_peripheral_mesh`] - Strips that square off the rim of a lattice
//!
//! # Quick Start
//!
//! ```
//! use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};
//! use mesh_types::MeshTopology;
//!
//! let params = RingParams::hexagon(1.0, 2)
//!     .with_ring(RegionSpec::new(0.5, 2))
//!     .with_preserve_volumes(true);
//! let mesh = assemble_polygon(&params).unwrap();
//! assert_eq!(mesh.metadata.num_sectors_per_side, vec![2; 6]);
//! assert!(mesh.element_count() > 0);
//! ```
//!
//! # Orientation
//!
//! Cells are built corner up: slice 0 starts on the +y axis and the first
//! corner of the polygon lies there. Set [`RingParams::flat_side_up`] to
//! rotate by half a sector.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod corrector;
mod error;
mod geometry;
mod layout;
mod params;
mod peripheral;
mod ring;
mod slice;
mod spacing;

pub use corrector::{correction_factor, polygonized_area, ElementOrder};
pub use error::{PolygonError, PolygonResult};
pub use geometry::{
    azimuth_degrees, boundary_azimuths, boundary_vertex_nodes, corner_distance,
    distribute_on_sides, four_point_intercept, recenter_side_midpoints, slice_edge_points,
};
pub use layout::{RadialLayout, RowShape};
pub use params::{BackgroundSpec, CenterPatch, InterfaceBoundaries, RegionSpec, RingParams};
pub use peripheral::{
    add_peripheral_mesh, build_peripheral_strip, strip_indices, LatticeShape, PeripheralPoints,
    PieceKind,
};
pub use ring::{assemble_polygon, polygon_azimuths};
pub use slice::{build_slice, inward_interface_id, outward_interface_id, SliceSpec};
pub use spacing::{bias_terms, region_fractions, BoundaryLayer};
