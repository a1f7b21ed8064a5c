//! Two-dimensional finite-element meshing of reactor cross-sections.
//!
//! This umbrella crate re-exports the reactor-mesh crates, providing one
//! entry point for the whole pipeline: polygon unit cells with concentric
//! rings and ducts, hexagonal and Cartesian lattices of those cells, and
//! angular wedge editing of the results.
//!
//! # Quick Start
//!
//! ```
//! use reactor_mesh::prelude::*;
//!
//! // A hexagonal pin cell with one fuel ring, area preserving
//! let pin = assemble_polygon(&RingParams::hexagon(0.5, 2).with_ring(RegionSpec::new(0.3, 2))).unwrap();
//!
//! // Seven pins in a hexagonal lattice squared off by a peripheral region
//! let params = LatticeParams::hexagonal(vec![vec![0, 0], vec![0, 0, 0], vec![0, 0]])
//!     .with_peripheral(PeripheralSpec::new(3.4, 1))
//!     .with_uniform_sides(true);
//! let assembly = stitch_lattice(&[pin], &params).unwrap();
//! assert_eq!(assembly.metadata.pattern_pitch, Some(3.4));
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`types`] - Mesh container, elements, side tags, metadata and stitching
//! - [`transform`] - Rotation, translation, centring and Laplacian smoothing
//!
//! ## Unit Cells
//! - [`polygon`] - Area correction, slices and closed polygon cells
//!
//! ## Lattices
//! - [`lattice`] - Pattern stitching, peripheral regions, reporting ids and
//!   control drums
//!
//! ## Editing
//! - [`wedge`] - Angular wedge splitting and block retagging

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![doc(html_root_url = "https://docs.rs/reactor-mesh/0.7.0")]

// =============================================================================
// Re-exports
// =============================================================================

/// Mesh container, elements, side tags, metadata and stitching.
pub use mesh_types as types;

/// Rotation, translation, centring and Laplacian smoothing.
pub use mesh_transform as transform;

/// Area correction, slices and closed polygon cells.
pub use mesh_polygon as polygon;

/// Hexagonal and Cartesian lattices of unit cells.
pub use mesh_lattice as lattice;

/// Angular wedge splitting.
pub use mesh_wedge as wedge;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for reactor meshing.
///
/// # Usage
///
/// ```
/// use reactor_mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{
        ElementKind, FeMesh, MeshMetadata, MeshTopology, Point2, SizeStyle, SubdomainId,
        Vector2, OUTER_SIDESET_ID,
    };

    // Transform
    pub use mesh_transform::{rotate_mesh, Transform2D};

    // Unit cells
    pub use mesh_polygon::{
        assemble_polygon, correction_factor, BackgroundSpec, CenterPatch, ElementOrder,
        RegionSpec, RingParams,
    };

    // Lattices
    pub use mesh_lattice::{
        stitch_lattice, LatticeParams, LatticeShape, PeripheralSpec, ReportingIdSpec,
        ReportingPolicy,
    };

    // Editing
    pub use mesh_wedge::{split_wedge, WedgeParams};
}

// =============================================================================
// Tests
// =============================================================================
