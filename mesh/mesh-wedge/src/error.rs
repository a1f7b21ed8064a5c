//! Error types for wedge editing.

use mesh_polygon::PolygonError;
use mesh_types::{BoundaryId, MeshError, SubdomainId};
use thiserror::Error;

/// Result type for wedge operations.
pub type WedgeResult<T> = Result<T, WedgeError>;

/// Errors that can occur while splitting a wedge out of a mesh.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WedgeError {
    /// Start and end angles coincide.
    #[error("wedge starts and ends at {angle}°")]
    ZeroWidth {
        /// The shared angle in degrees.
        angle: f64,
    },

    /// Old and new block lists differ in length.
    #[error("{old} old block ids but {new} new block ids")]
    BlockListLength {
        /// Number of old ids.
        old: usize,
        /// Number of new ids.
        new: usize,
    },

    /// New block names are given but do not match the new ids.
    #[error("{blocks} new block ids but {names} new block names")]
    BlockNameLength {
        /// Number of new ids.
        blocks: usize,
        /// Number of names.
        names: usize,
    },

    /// An old block id is not present in the mesh.
    #[error("block {0} does not exist in the mesh")]
    MissingBlock(SubdomainId),

    /// The central quad patch cannot be split.
    #[error("block {0} is the central quad patch and cannot be split")]
    QuadCenterBlock(SubdomainId),

    /// The mesh carries no polygon metadata.
    #[error("mesh has no polygon side count in its metadata")]
    MissingMetadata,

    /// The external boundary is not present.
    #[error("external boundary {0} does not exist in the mesh")]
    MissingBoundary(BoundaryId),

    /// Both wedge edges snap to the same mesh angle.
    #[error("wedge [{start}°, {end}°) is too narrow for the mesh: both edges move the node line at {angle}°")]
    TooCoarse {
        /// Requested start angle.
        start: f64,
        /// Requested end angle.
        end: f64,
        /// Angle both edges would move.
        angle: f64,
    },

    /// Rescaled circles would cross the background region.
    #[error("corrected circular radius {max_circular} reaches the background node at radius {min_non_circular}")]
    RegionOverlap {
        /// Largest circular radius after rescaling.
        max_circular: f64,
        /// Smallest radius of a moved background node.
        min_non_circular: f64,
    },

    /// A polygon helper failed.
    #[error(transparent)]
    Polygon(#[from] PolygonError),

    /// A mesh operation failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
