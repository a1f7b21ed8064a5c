//! Core finite-element mesh types for reactor cross-section meshing.
//!
//! This crate provides the foundational types shared by every generation
//! stage:
//!
//! - [`FeMesh`] - Nodes, elements, side tags, names and metadata
//! - [`Element`] / [`ElementKind`] - First- and second-order triangles and quadrilaterals
//! - [`BoundaryInfo`] - Sorted sideset table with names
//! - [`MeshMetadata`] - Pitch, sector counts and azimuthal angles carried between stages
//! - [`SideAdjacency`] - Neighbour lookup by shared corner nodes
//! - [`FeMesh::stitch`] - Coordinate-tolerance stitching along tagged boundaries
//!
//! # Ids
//!
//! Node and element ids are indices into [`FeMesh::nodes`] and
//! [`FeMesh::elements`]. They are unique within a mesh and are renumbered
//! when meshes are stitched together.
//!
//! # Orientation
//!
//! Every element stored through [`FeMesh::add_element`] has positive signed
//! area. Negative input is flipped with the kind's canonical swap list and
//! degenerate input is rejected.
//!
//! # Example
//!
//! ```
//! use mesh_types::{unit_square, FeMesh, MeshTopology, Vector2, OUTER_SIDESET_ID, TOLERANCE};
//!
//! let mut left = unit_square();
//! let mut right = unit_square();
//! right.translate(Vector2::new(1.0, 0.0));
//!
//! left.stitch(right, OUTER_SIDESET_ID, OUTER_SIDESET_ID, TOLERANCE, true).unwrap();
//! assert_eq!(left.node_count(), 6);
//! assert!((left.area() - 2.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod boundary;
mod bounds;
mod element;
mod error;
mod ids;
mod mesh;
mod metadata;
mod order;
mod stitch;
mod traits;

pub use adjacency::{clear_interior_tags, SideAdjacency};
pub use boundary::{BoundaryInfo, SideTag};
pub use bounds::Aabb2;
pub use element::{Element, ElementKind};
pub use error::{MeshError, MeshResult};
pub use ids::{
    fuzzy_eq, wrap_degrees, BoundaryId, SubdomainId, CONTROL_DRUM_ID_NAME, INVALID_ID,
    OUTER_SIDESET_ID, OUTER_SIDESET_ID_ALT, PERIPHERAL_ID_SHIFT, SLICE_ALT, SLICE_BEGIN,
    SLICE_END, TOLERANCE,
};
pub use mesh::{unit_square, FeMesh};
pub use metadata::{MeshMetadata, SizeStyle};
pub use stitch::{stitch_meshes, StitchReport};
pub use traits::{MeshBounds, MeshTopology};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};
