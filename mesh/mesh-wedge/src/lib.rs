//! Angular wedge editing of polygon and lattice meshes.
//!
//! A wedge `[start, end)` is cut out of an existing mesh without adding
//! nodes: each wedge edge is snapped onto the nearest suitable line of
//! nodes, that line is moved onto the edge, and the elements between the
//! edges are moved to new blocks.
//!
//! # Frame
//!
//! Wedge angles are in degrees, counter-clockwise from the mesh's +x axis,
//! the same frame as [`MeshMetadata::azimuthal_angles`]. A wedge may cross
//! the ±180° seam: `[160°, -100°)` covers the 100° through 180°.
//!
//! [`MeshMetadata::azimuthal_angles`]: mesh_types::MeshMetadata::azimuthal_angles
//!
//! # Volume Preservation
//!
//! Moving node lines changes the sector angles of every circle, so with
//! [`WedgeParams::preserve_volumes`] the circles are rescaled by the ratio
//! of the new to the old correction factor. The split fails if the rescaled
//! circles would reach the background nodes.
//!
//! # Example
//!
//! ```
//! use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};
//! use mesh_wedge::{split_wedge, WedgeParams};
//!
//! let mesh = assemble_polygon(&RingParams::hexagon(1.0, 2).with_ring(RegionSpec::new(0.5, 1))).unwrap();
//!
//! let wedge = WedgeParams::new(10.0, 50.0).with_named_block(1, 5, "absorber");
//! let split = split_wedge(&mesh, &wedge).unwrap();
//! assert_eq!(split.mesh.subdomain_id_by_name("absorber"), Some(5));
//! assert_eq!(split.angles.len(), 12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod params;
mod snap;
mod split;

pub use error::{WedgeError, WedgeResult};
pub use params::WedgeParams;
pub use snap::{bracket_angle, choose_moved_angle, corner_test, AngleBracket, AngleSnap};
pub use split::{split_wedge, WedgeSplit};
