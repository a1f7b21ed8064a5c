//! Side-to-element adjacency.
//!
//! Sides are keyed by their two corner nodes, so neighbours are found
//! regardless of element kind or orientation.

use hashbrown::HashMap;

use crate::{BoundaryId, FeMesh};

/// Adjacency between element sides.
#[derive(Debug, Clone)]
pub struct SideAdjacency {
    /// Maps edge (n0, n1), n0 < n1, to the `(element, side)` pairs using it.
    edge_to_sides: HashMap<(u32, u32), Vec<(u32, u8)>>,
}

impl SideAdjacency {
    /// Build the adjacency table of a mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{unit_square, SideAdjacency};
    ///
    /// let adj = SideAdjacency::build(&unit_square());
    /// assert_eq!(adj.boundary_sides().len(), 4);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(mesh: &FeMesh) -> Self {
        let mut edge_to_sides: HashMap<(u32, u32), Vec<(u32, u8)>> = HashMap::new();
        for (ei, e) in mesh.elements.iter().enumerate() {
            for s in 0..e.kind.vertex_count() {
                let side = s as u8;
                let (a, b) = e.side_nodes(side);
                edge_to_sides
                    .entry(normalize_edge(a, b))
                    .or_default()
                    .push((ei as u32, side));
            }
        }
        Self { edge_to_sides }
    }

    /// The other element sharing a side, if any.
    #[must_use]
    pub fn neighbour(&self, mesh: &FeMesh, element: u32, side: u8) -> Option<(u32, u8)> {
        let (a, b) = mesh.elements.get(element as usize)?.side_nodes(side);
        self.edge_to_sides
            .get(&normalize_edge(a, b))?
            .iter()
            .find(|&&(e, _)| e != element)
            .copied()
    }

    /// Whether a side is shared with another element.
    #[must_use]
    pub fn has_neighbour(&self, mesh: &FeMesh, element: u32, side: u8) -> bool {
        self.neighbour(mesh, element, side).is_some()
    }

    /// Sides used by exactly one element, sorted.
    #[must_use]
    pub fn boundary_sides(&self) -> Vec<(u32, u8)> {
        let mut out: Vec<(u32, u8)> = self
            .edge_to_sides
            .values()
            .filter(|s| s.len() == 1)
            .map(|s| s[0])
            .collect();
        out.sort_unstable();
        out
    }

    /// Boundary edges as node pairs.
    #[must_use]
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let mut out: Vec<(u32, u32)> = self
            .edge_to_sides
            .iter()
            .filter(|(_, s)| s.len() == 1)
            .map(|(&e, _)| e)
            .collect();
        out.sort_unstable();
        out
    }

    /// Whether every edge is used by at most two elements.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_sides.values().all(|s| s.len() <= 2)
    }

    /// Number of connected loops formed by the boundary edges.
    #[must_use]
    pub fn boundary_loop_count(&self) -> usize {
        let edges = self.boundary_edges();
        let mut parent: HashMap<u32, u32> = HashMap::new();
        for &(a, b) in &edges {
            parent.entry(a).or_insert(a);
            parent.entry(b).or_insert(b);
            let ra = find_root(&mut parent, a);
            let rb = find_root(&mut parent, b);
            if ra != rb {
                parent.insert(ra, rb);
            }
        }
        let keys: Vec<u32> = parent.keys().copied().collect();
        let mut roots: Vec<u32> = keys.into_iter().map(|k| find_root(&mut parent, k)).collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }
}

/// Remove `id` from every side that has a neighbouring element.
///
/// Returns the number of removed tags.
pub fn clear_interior_tags(mesh: &mut FeMesh, id: BoundaryId) -> usize {
    let adj = SideAdjacency::build(mesh);
    let interior: Vec<(u32, u8)> = mesh
        .boundary
        .sides_with_id(id)
        .filter(|&(e, s)| adj.has_neighbour(mesh, e, s))
        .collect();
    for &(e, s) in &interior {
        mesh.boundary.remove_side(e, s, id);
    }
    interior.len()
}

/// Normalize edge direction so the smaller id comes first.
#[inline]
const fn normalize_edge(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

fn find_root(parent: &mut HashMap<u32, u32>, mut x: u32) -> u32 {
    while let Some(&p) = parent.get(&x) {
        if p == x {
            break;
        }
        let grand = parent.get(&p).copied().unwrap_or(p);
        parent.insert(x, grand);
        x = grand;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{unit_square, OUTER_SIDESET_ID};

    #[test]
    fn diagonal_is_shared() {
        let mesh = unit_square();
        let adj = SideAdjacency::build(&mesh);
        // element 0 side 2 is the diagonal (2, 0)
        assert_eq!(adj.neighbour(&mesh, 0, 2), Some((1, 0)));
        assert!(!adj.has_neighbour(&mesh, 0, 0));
        assert!(adj.is_manifold());
        assert_eq!(adj.boundary_loop_count(), 1);
    }

    #[test]
    fn interior_tags_are_cleared() {
        let mut mesh = unit_square();
        mesh.boundary.add_side(0, 2, OUTER_SIDESET_ID);
        assert_eq!(clear_interior_tags(&mut mesh, OUTER_SIDESET_ID), 1);
        assert_eq!(mesh.boundary.side_count(OUTER_SIDESET_ID), 4);
    }
}
