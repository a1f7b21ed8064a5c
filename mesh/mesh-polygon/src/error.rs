//! Error types for polygon unit-cell meshing.

use mesh_types::{MeshError, SubdomainId};
use thiserror::Error;

/// Errors that can occur while building polygon meshes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PolygonError {
    /// Fewer than two azimuthal angles were supplied.
    #[error("need at least {required} azimuthal angles, got {actual}")]
    TooFewAngles {
        /// Minimum count.
        required: usize,
        /// Provided count.
        actual: usize,
    },

    /// Two consecutive azimuthal angles coincide or decrease.
    #[error("azimuthal angles must be strictly increasing: {previous} then {next}")]
    NonIncreasingAngles {
        /// Earlier angle (degrees).
        previous: f64,
        /// Later angle (degrees).
        next: f64,
    },

    /// An azimuthal interval is too wide to polygonize.
    #[error("azimuthal interval of {interval} degrees is not below 120 degrees")]
    IntervalTooWide {
        /// Offending interval (degrees).
        interval: f64,
    },

    /// Second-order correction needs vertex/midpoint pairs.
    #[error("second-order correction needs an even number of intervals, got {0}")]
    OddIntervalCount(usize),

    /// A partial sweep must begin on a vertex for second-order correction.
    #[error("a partial azimuthal sweep must start on a vertex for second-order correction")]
    PartialSweepStartsOnMidpoint,

    /// The polygon must have at least three sides.
    #[error("number of sides must be at least 3, got {0}")]
    InvalidSideCount(u32),

    /// The polygon size must be positive.
    #[error("polygon size must be positive, got {0}")]
    InvalidSize(f64),

    /// A per-side sector list has the wrong length.
    #[error("expected {expected} sector counts (one per side), got {actual}")]
    SectorCountLength {
        /// Number of sides.
        expected: usize,
        /// Provided list length.
        actual: usize,
    },

    /// A side has no sectors.
    #[error("side {side} has zero azimuthal sectors")]
    ZeroSectors {
        /// Side index.
        side: usize,
    },

    /// A central quad patch needs an even sector count on every side.
    #[error("side {side} has {sectors} sectors; a quad centre needs an even count")]
    OddSectorsForQuadCenter {
        /// Side index.
        side: usize,
        /// Sector count.
        sectors: u32,
    },

    /// Peripheral strips need an even, non-zero sector count.
    #[error("peripheral strips need an even sector count, got {0}")]
    OddPeripheralSectors(u32),

    /// Region sizes must be positive and strictly ascending.
    #[error("{region} sizes must be positive and strictly ascending: {sizes:?}")]
    NonAscendingSizes {
        /// Region kind.
        region: &'static str,
        /// Offending sizes.
        sizes: Vec<f64>,
    },

    /// A region needs at least one radial interval.
    #[error("{region} {index} needs at least one radial interval")]
    ZeroIntervals {
        /// Region kind.
        region: &'static str,
        /// Region index.
        index: usize,
    },

    /// Radial bias must be positive.
    #[error("radial bias must be positive, got {0}")]
    InvalidBias(f64),

    /// A boundary layer width and interval count disagree.
    #[error("boundary layer width {width} is inconsistent with {intervals} intervals")]
    InconsistentBoundaryLayer {
        /// Layer width.
        width: f64,
        /// Layer interval count.
        intervals: u32,
    },

    /// Boundary layers leave no room in their region.
    #[error("{region} {index}: boundary layers ({fraction:.3} of the width) must be thinner than the region")]
    BoundaryLayerTooThick {
        /// Region kind.
        region: &'static str,
        /// Region index.
        index: usize,
        /// Combined fractional width.
        fraction: f64,
    },

    /// The (corrected) outermost ring reaches the polygon edge.
    #[error("ring radius {radius} (after correction) must be smaller than the polygon apothem {apothem}")]
    RingTooLarge {
        /// Corrected ring radius.
        radius: f64,
        /// Polygon apothem.
        apothem: f64,
    },

    /// A duct lies inside the outermost ring.
    #[error("duct size {duct} must exceed the outermost ring radius {ring}")]
    DuctInsideRing {
        /// Duct apothem.
        duct: f64,
        /// Corrected ring radius.
        ring: f64,
    },

    /// A duct reaches the polygon edge.
    #[error("duct size {duct} must be smaller than the polygon apothem {apothem}")]
    DuctTooLarge {
        /// Duct apothem.
        duct: f64,
        /// Polygon apothem.
        apothem: f64,
    },

    /// The central quad patch factor is out of range.
    #[error("center quad factor must lie in (0, 1), got {0}")]
    InvalidCenterQuadFactor(f64),

    /// A custom tangent distribution is malformed.
    #[error("side {side}: tangents must be {expected} ascending values from 0 to 2")]
    InvalidTangents {
        /// Side index.
        side: usize,
        /// Required value count.
        expected: usize,
    },

    /// Custom block ids or names have the wrong length.
    #[error("expected {expected} block {what}, got {actual}")]
    BlockListLength {
        /// "ids" or "names".
        what: &'static str,
        /// Number of blocks generated.
        expected: usize,
        /// Provided list length.
        actual: usize,
    },

    /// Two different block ids share a name.
    #[error("block name '{name}' is assigned to both id {first} and id {second}")]
    DuplicateBlockName {
        /// The shared name.
        name: String,
        /// First id.
        first: SubdomainId,
        /// Second id.
        second: SubdomainId,
    },

    /// Interface boundary names have the wrong length.
    #[error("expected {expected} interface boundary names, got {actual}")]
    InterfaceNameLength {
        /// Number of interfaces.
        expected: usize,
        /// Provided list length.
        actual: usize,
    },

    /// Underlying mesh operation failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for polygon meshing.
pub type PolygonResult<T> = Result<T, PolygonError>;
