//! Mesh-level metadata carried between generation stages.

use std::collections::BTreeSet;

use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BoundaryId, SubdomainId};

/// How a polygon or duct size is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SizeStyle {
    /// Centre to the middle of a flat side.
    #[default]
    Apothem,
    /// Centre to a corner.
    Radius,
}

impl SizeStyle {
    /// Convert a size in this style to an apothem of an `n`-sided polygon.
    #[must_use]
    pub fn to_apothem(self, size: f64, num_sides: u32) -> f64 {
        match self {
            Self::Apothem => size,
            Self::Radius => size * (std::f64::consts::PI / f64::from(num_sides)).cos(),
        }
    }
}

/// Metadata attached to a generated mesh.
///
/// Filled in by the polygon and lattice builders and read by later stages;
/// lattice stitching compares pitch and sector counts across inputs.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshMetadata {
    /// Flat-to-flat size of the unit this mesh is built from.
    pub pitch: Option<f64>,
    /// Flat-to-flat size of the whole mesh.
    pub pattern_pitch: Option<f64>,
    /// Style in which the size was given.
    pub size_style: SizeStyle,
    /// Number of polygon sides (6 for hexagonal, 4 for Cartesian).
    pub num_sides: u32,
    /// Azimuthal sectors on each polygon side.
    pub num_sectors_per_side: Vec<u32>,
    /// Sorted azimuthal angles (degrees) of nodes on the outer boundary.
    pub azimuthal_angles: Vec<f64>,
    /// Radial intervals of the background region.
    pub background_intervals: u32,
    /// Largest corrected ring radius, 0 without rings.
    pub max_radius: f64,
    /// Block id of the central quad patch, if one exists.
    pub quad_center_block_id: Option<SubdomainId>,
    /// Whether this unit is a control drum.
    pub is_control_drum: bool,
    /// Positions of control drums, sorted by polar angle.
    pub control_drum_positions: Vec<Point2<f64>>,
    /// Azimuthal angle lists of the control drums, in the same order.
    pub control_drum_azimuths: Vec<Vec<f64>>,
    /// Interface boundary ids created between regions.
    pub interface_boundary_ids: BTreeSet<BoundaryId>,
}

impl MeshMetadata {
    /// Whether this mesh was produced by a polygon or lattice builder.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.pitch.is_some()
    }
}
