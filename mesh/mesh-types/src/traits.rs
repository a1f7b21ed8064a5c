//! Traits for mesh types.

use nalgebra::Point2;

use crate::{Aabb2, Element};

/// Minimal read access to a finite-element mesh.
pub trait MeshTopology {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of elements.
    fn element_count(&self) -> usize;

    /// Whether the mesh has no elements.
    fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// Node coordinates by index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn node(&self, index: usize) -> Option<&Point2<f64>>;

    /// Element by index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn element(&self, index: usize) -> Option<&Element>;
}

/// Types that can compute a bounding box.
pub trait MeshBounds {
    /// Bounding box of all nodes, empty when there are none.
    fn bounds(&self) -> Aabb2;

    /// Bounding box, `None` when empty.
    fn bounds_opt(&self) -> Option<Aabb2> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Centre of the bounding box.
    fn center(&self) -> Point2<f64> {
        self.bounds().center()
    }
}
