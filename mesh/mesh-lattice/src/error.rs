//! Error types for lattice stitching.

use mesh_polygon::PolygonError;
use mesh_transform::TransformError;
use mesh_types::MeshError;
use thiserror::Error;

/// Result type for lattice operations.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Errors that can occur while stitching a lattice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LatticeError {
    /// No unit meshes were supplied.
    #[error("lattice needs at least one input mesh")]
    NoInputs,

    /// The pattern has no rows or an empty row.
    #[error("pattern is empty")]
    EmptyPattern,

    /// A hexagonal pattern needs an odd number of rows.
    #[error("hexagonal pattern needs an odd number of rows, got {0}")]
    EvenHexRowCount(usize),

    /// A hexagonal pattern row has the wrong length.
    #[error("hexagonal pattern row {row} should have {expected} entries, got {actual}")]
    MalformedHexRow {
        /// Row index.
        row: usize,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A Cartesian pattern row has a different length from the first row.
    #[error("Cartesian pattern row {row} should have {expected} entries, got {actual}")]
    RaggedCartesianRow {
        /// Row index.
        row: usize,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A pattern entry references a missing input.
    #[error("pattern entry ({row}, {col}) references input {index}, but only {inputs} inputs exist")]
    InputOutOfRange {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Referenced input.
        index: usize,
        /// Number of inputs.
        inputs: usize,
    },

    /// A peripheral boundary needs a larger pattern.
    #[error("peripheral boundary needs a pattern of at least {required} rows, got {rows}")]
    PatternTooSmall {
        /// Rows in the pattern.
        rows: usize,
        /// Minimum number of rows.
        required: usize,
    },

    /// A Cartesian pattern is not square.
    #[error("Cartesian pattern must be square, got {rows} x {cols}")]
    NonSquarePattern {
        /// Rows in the pattern.
        rows: usize,
        /// Columns in the pattern.
        cols: usize,
    },

    /// An input mesh was not produced by a polygon or lattice builder.
    #[error("input {input} carries no pitch metadata")]
    MissingMetadata {
        /// Input index.
        input: usize,
    },

    /// An input mesh has the wrong number of sides for the lattice.
    #[error("input {input} has {actual} sides, the lattice needs {expected}")]
    WrongSideCount {
        /// Input index.
        input: usize,
        /// Sides required by the lattice shape.
        expected: u32,
        /// Sides reported by the input.
        actual: u32,
    },

    /// An input mesh has a different pitch from the first input.
    #[error("input {input} has pitch {actual}, expected {expected}")]
    PitchMismatch {
        /// Input index.
        input: usize,
        /// Pitch of the first input.
        expected: f64,
        /// Pitch of this input.
        actual: f64,
    },

    /// An input mesh has different sector counts from the first input.
    #[error("input {input} has sectors per side {actual:?}, expected {expected:?}")]
    SectorMismatch {
        /// Input index.
        input: usize,
        /// Sectors of the first input.
        expected: Vec<u32>,
        /// Sectors of this input.
        actual: Vec<u32>,
    },

    /// Peripheral strips need the same sector count on every side.
    #[error("peripheral boundary needs equal sectors on every side, got {0:?}")]
    NonUniformSectors(Vec<u32>),

    /// The pattern pitch leaves no room for the peripheral region.
    #[error("pattern pitch {pattern_pitch} is too small; the first peripheral layer would be {extra} thick")]
    PatternPitchTooSmall {
        /// Requested pattern pitch.
        pattern_pitch: f64,
        /// Resulting first-layer thickness.
        extra: f64,
    },

    /// Duct sizes must increase outwards.
    #[error("duct sizes must be strictly ascending, got {0:?}")]
    NonAscendingDucts(Vec<f64>),

    /// A duct reaches the pattern boundary.
    #[error("duct size {duct} (as apothem) must be below half the pattern pitch {pattern_pitch}")]
    DuctOutsidePattern {
        /// Duct apothem.
        duct: f64,
        /// Pattern pitch.
        pattern_pitch: f64,
    },

    /// Duct interval count does not match the duct count.
    #[error("expected {expected} duct interval counts, got {actual}")]
    DuctIntervalLength {
        /// Number of ducts.
        expected: usize,
        /// Number of interval counts.
        actual: usize,
    },

    /// A peripheral layer has zero intervals.
    #[error("peripheral layer {layer} needs at least one interval")]
    ZeroIntervals {
        /// Layer index, 0 being the background.
        layer: usize,
    },

    /// Peripheral block ids or names do not match the layer count.
    #[error("expected {expected} peripheral block {what}, got {actual}")]
    PeripheralBlockLength {
        /// `"ids"` or `"names"`.
        what: &'static str,
        /// Number of peripheral layers.
        expected: usize,
        /// Number supplied.
        actual: usize,
    },

    /// Uniform boundary spacing needs a straight-sided boundary.
    #[error("uniform side spacing requires a peripheral boundary")]
    UniformSidesWithoutBoundary,

    /// A manual reporting id array does not match the pattern.
    #[error("reporting id {name:?}: row {row} should have {expected} entries, got {actual}")]
    ReportingIdShape {
        /// Reporting id name.
        name: String,
        /// Row index, or the row count for a row-count mismatch.
        row: usize,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Two reporting ids share a name.
    #[error("reporting id name {0:?} is used twice")]
    DuplicateReportingId(String),

    /// An input mesh is never referenced by the pattern.
    #[error("input {index} is not referenced by the pattern")]
    UnusedInput {
        /// Unreferenced input.
        index: usize,
    },

    /// A reporting id excludes an input that does not exist.
    #[error("reporting id {name:?} excludes input {index}, but only {inputs} inputs exist")]
    ExcludedInputOutOfRange {
        /// Reporting id name.
        name: String,
        /// Excluded input.
        index: usize,
        /// Number of inputs.
        inputs: usize,
    },

    /// Control drum positions are only tracked in core mode.
    #[error("a control drum positions file requires core mode")]
    PositionsWithoutCoreMode,

    /// A polygon stage failed.
    #[error(transparent)]
    Polygon(#[from] PolygonError),

    /// A mesh operation failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A transformation failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Writing the positions file failed.
    #[error("failed to write control drum positions: {0}")]
    Io(#[from] std::io::Error),
}
