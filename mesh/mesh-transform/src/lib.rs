//! Mesh transformation and relaxation in the plane.
//!
//! This crate provides tools for:
//! - Rigid transformations (translate, rotate, uniform scale) via [`Transform2D`]
//! - Area-weighted centroids and re-centring
//! - Laplacian smoothing with fixed boundary nodes
//!
//! # Example
//!
//! ```
//! use mesh_transform::{area_centroid, Transform2D};
//! use mesh_types::unit_square;
//!
//! let mesh = unit_square();
//! let moved = Transform2D::translation(1.0, 2.0).apply_to_mesh(&mesh).unwrap();
//! let c = area_centroid(&moved).unwrap();
//! assert!((c.y - 2.5).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod centroid;
mod error;
mod smooth;
mod transform;

pub use centroid::{area_centroid, center_on_centroid};
pub use error::{TransformError, TransformResult};
pub use smooth::{smooth_laplacian, SmoothResult};
pub use transform::{rotate_mesh, rotate_point, Transform2D};
