//! Error types for mesh transformation operations.

use thiserror::Error;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur during mesh transformation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// Matrix is not invertible.
    #[error("matrix is not invertible")]
    NotInvertible,

    /// The transform mirrors the plane, which would invert every element.
    #[error("transform has non-positive determinant {determinant}")]
    Reflection {
        /// Determinant of the linear part.
        determinant: f64,
    },

    /// The mesh has no element area to average over.
    #[error("mesh is empty")]
    EmptyMesh,
}
