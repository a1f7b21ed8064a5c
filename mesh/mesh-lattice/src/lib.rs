//! Hexagonal and Cartesian lattices of polygon unit meshes.
//!
//! A lattice is described by a pattern: rows of indices into a list of unit
//! meshes built by `mesh-polygon` (pins, assemblies or control drums). The
//! stitcher places every cell, optionally wraps the rim with a peripheral
//! region of background and duct layers, and fuses the cells along their
//! shared external boundaries.
//!
//! # Lattice Shapes
//!
//! - **Hexagonal**: corner-up cells forming a flat-topped hexagon; an odd
//!   number of rows, growing by one cell towards the middle row
//! - **Cartesian**: axis-aligned square cells in a rectangular grid
//!
//! # Quick Start
//!
//! ```
//! use mesh_lattice::{stitch_lattice, LatticeParams, PeripheralSpec};
//! use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};
//!
//! let pin = assemble_polygon(&RingParams::square(0.5, 2).with_ring(RegionSpec::new(0.3, 1))).unwrap();
//! let params = LatticeParams::cartesian(vec![vec![0; 3]; 3])
//!     .with_peripheral(PeripheralSpec::new(3.4, 1));
//! let lattice = stitch_lattice(&[pin], &params).unwrap();
//! assert!((lattice.area() - 3.4 * 3.4).abs() < 1e-9);
//! ```
//!
//! # Reporting Ids
//!
//! [`ReportingIdSpec`] attaches an extra element integer grouping elements
//! by cell, by input, or by a user array. Duct layers of the peripheral
//! region get their own ids above the cell ids.
//!
//! # Core Mode
//!
//! With [`LatticeParams::core_mode`] the inputs are assemblies: their
//! pattern pitch sets the lattice spacing, and cells built as control drums
//! are numbered by polar angle and reported in the metadata and an
//! optional positions file.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod drums;
mod error;
mod params;
mod pattern;
mod reporting;
mod stitcher;

pub use drums::{
    number_control_drums, polar_angle, sort_control_drums, write_positions_file, ControlDrum,
};
pub use error::{LatticeError, LatticeResult};
pub use params::{
    LatticeParams, PatternBoundary, PeripheralSpec, ReportingIdSpec, ReportingPolicy,
};
pub use pattern::{
    cell_position, hex_row_length, outline_first_corner, peripheral_extras, rim_piece,
    validate_pattern,
};
pub use reporting::{assign_reporting_ids, cell_reporting_ids, CellElements};
pub use stitcher::{reconcile_inputs, stitch_lattice, UnitInfo};

// Re-exported so callers can name lattice shapes without depending on mesh-polygon.
pub use mesh_polygon::{LatticeShape, PieceKind};
