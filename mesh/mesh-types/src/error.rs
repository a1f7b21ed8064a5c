//! Error types for mesh containers and stitching.

use thiserror::Error;

use crate::{BoundaryId, SubdomainId};

/// Errors raised by [`FeMesh`](crate::FeMesh) operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// An element references a node that does not exist.
    #[error("element references node {node}, but the mesh has {node_count} nodes")]
    NodeOutOfRange {
        /// The offending node index.
        node: u32,
        /// Number of nodes in the mesh.
        node_count: usize,
    },

    /// The node list does not match the element kind.
    #[error("element kind {kind} needs {expected} nodes, got {actual}")]
    WrongNodeCount {
        /// Element kind name.
        kind: &'static str,
        /// Required node count.
        expected: usize,
        /// Provided node count.
        actual: usize,
    },

    /// An element has (near) zero area.
    #[error("degenerate element with signed area {area:e}")]
    DegenerateElement {
        /// Signed area before any flip.
        area: f64,
    },

    /// An element has no side with the given end nodes.
    #[error("element {element} has no side between nodes {a} and {b}")]
    NoSuchSide {
        /// Element index.
        element: u32,
        /// First end node.
        a: u32,
        /// Second end node.
        b: u32,
    },

    /// A stitch found no coincident nodes on the requested boundaries.
    #[error("stitching boundaries {tag_a} and {tag_b} matched no nodes within tolerance {tolerance:e}")]
    NothingToStitch {
        /// Boundary tag on the first mesh.
        tag_a: BoundaryId,
        /// Boundary tag on the second mesh.
        tag_b: BoundaryId,
        /// Matching tolerance.
        tolerance: f64,
    },

    /// A boundary node of one mesh matched several nodes of the other.
    #[error("ambiguous stitch: node {node} matches {candidates} nodes within tolerance {tolerance:e}")]
    AmbiguousStitch {
        /// Node index in the second mesh.
        node: u32,
        /// Number of candidate matches.
        candidates: usize,
        /// Matching tolerance.
        tolerance: f64,
    },

    /// The same subdomain name is bound to two different ids.
    #[error("subdomain name '{name}' is used for both id {first} and id {second}")]
    SubdomainNameConflict {
        /// The shared name.
        name: String,
        /// First id carrying the name.
        first: SubdomainId,
        /// Second id carrying the name.
        second: SubdomainId,
    },

    /// The same boundary name is bound to two different ids.
    #[error("boundary name '{name}' is used for both id {first} and id {second}")]
    BoundaryNameConflict {
        /// The shared name.
        name: String,
        /// First id carrying the name.
        first: BoundaryId,
        /// Second id carrying the name.
        second: BoundaryId,
    },

    /// The two meshes being merged use different element orders.
    #[error("cannot combine first-order and second-order elements in one mesh")]
    MixedOrder,
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
