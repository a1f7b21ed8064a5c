//! The finite-element mesh container.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::{
    Aabb2, BoundaryId, BoundaryInfo, Element, ElementKind, MeshBounds, MeshMetadata,
    MeshTopology, SubdomainId, INVALID_ID, OUTER_SIDESET_ID,
};

/// Signed areas at or below this magnitude are rejected as degenerate.
const DEGENERATE_AREA: f64 = 1e-14;

/// A 2D finite-element mesh.
///
/// Nodes are addressed by their index in [`FeMesh::nodes`]; elements by
/// their index in [`FeMesh::elements`]. Boundary tags are attached to
/// element sides in [`FeMesh::boundary`].
///
/// # Orientation
///
/// [`FeMesh::add_element`] reorders nodes so every element has positive
/// signed area. Sides should therefore be tagged by their end nodes with
/// [`FeMesh::tag_side`] rather than by a precomputed side index.
///
/// # Example
///
/// ```
/// use mesh_types::{ElementKind, FeMesh, MeshTopology, Point2};
///
/// let mut mesh = FeMesh::new();
/// let a = mesh.add_node(Point2::new(0.0, 0.0));
/// let b = mesh.add_node(Point2::new(1.0, 0.0));
/// let c = mesh.add_node(Point2::new(0.0, 1.0));
/// // clockwise input is flipped on insertion
/// let e = mesh.add_element(ElementKind::Tri3, &[a, c, b], 1).unwrap();
/// assert!(mesh.element_area(e as usize) > 0.0);
/// assert_eq!(mesh.element_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeMesh {
    /// Node coordinates.
    pub nodes: Vec<Point2<f64>>,
    /// Elements.
    pub elements: Vec<Element>,
    /// Boundary side tags and names.
    pub boundary: BoundaryInfo,
    /// Subdomain names.
    pub subdomain_names: BTreeMap<SubdomainId, String>,
    /// Names of the extra element integers, in storage order.
    pub extra_integer_names: Vec<String>,
    /// Generation metadata.
    pub metadata: MeshMetadata,
}

impl FeMesh {
    /// Create an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with reserved storage.
    ///
    /// # Arguments
    ///
    /// * `node_count` - Expected number of nodes
    /// * `element_count` - Expected number of elements
    #[must_use]
    pub fn with_capacity(node_count: usize, element_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            elements: Vec::with_capacity(element_count),
            ..Self::default()
        }
    }

    /// Append a node and return its id.
    #[allow(clippy::cast_possible_truncation)] // meshes stay far below u32::MAX nodes
    pub fn add_node(&mut self, p: Point2<f64>) -> u32 {
        self.nodes.push(p);
        (self.nodes.len() - 1) as u32
    }

    /// Append an element, flipping it if its signed area is negative.
    ///
    /// Extra integers of the new element start as [`INVALID_ID`].
    ///
    /// # Errors
    ///
    /// Returns an error if the node count does not match `kind`, a node id
    /// is out of range, or the element is degenerate.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        nodes: &[u32],
        subdomain: SubdomainId,
    ) -> MeshResult<u32> {
        if nodes.len() != kind.node_count() {
            return Err(MeshError::WrongNodeCount {
                kind: kind.name(),
                expected: kind.node_count(),
                actual: nodes.len(),
            });
        }
        if let Some(&bad) = nodes.iter().find(|&&n| n as usize >= self.nodes.len()) {
            return Err(MeshError::NodeOutOfRange {
                node: bad,
                node_count: self.nodes.len(),
            });
        }
        let mut element = Element::new(kind, nodes.to_vec(), subdomain);
        let area = element.signed_area(&self.nodes);
        if area.abs() <= DEGENERATE_AREA {
            return Err(MeshError::DegenerateElement { area });
        }
        if area < 0.0 {
            element.flip();
        }
        element.extra = vec![INVALID_ID; self.extra_integer_names.len()];
        self.elements.push(element);
        Ok((self.elements.len() - 1) as u32)
    }

    /// Tag the side of `element` bounded by nodes `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NoSuchSide`] if the element has no such side.
    pub fn tag_side(&mut self, element: u32, a: u32, b: u32, id: BoundaryId) -> MeshResult<()> {
        let side = self
            .elements
            .get(element as usize)
            .and_then(|e| e.side_index(a, b))
            .ok_or(MeshError::NoSuchSide { element, a, b })?;
        self.boundary.add_side(element, side, id);
        Ok(())
    }

    /// Area of one element.
    #[must_use]
    pub fn element_area(&self, index: usize) -> f64 {
        self.elements[index].signed_area(&self.nodes)
    }

    /// Total area of all elements.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.elements.iter().map(|e| e.signed_area(&self.nodes)).sum()
    }

    /// Total area of elements in `subdomain`.
    #[must_use]
    pub fn subdomain_area(&self, subdomain: SubdomainId) -> f64 {
        self.elements
            .iter()
            .filter(|e| e.subdomain == subdomain)
            .map(|e| e.signed_area(&self.nodes))
            .sum()
    }

    /// Smallest element signed area, `None` for an empty mesh.
    #[must_use]
    pub fn min_element_area(&self) -> Option<f64> {
        self.elements
            .iter()
            .map(|e| e.signed_area(&self.nodes))
            .min_by(f64::total_cmp)
    }

    /// Whether all elements are second order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::MixedOrder`] if first- and second-order elements coexist.
    pub fn is_second_order(&self) -> MeshResult<bool> {
        let second = self.elements.iter().filter(|e| e.kind.is_second_order()).count();
        if second == 0 {
            Ok(false)
        } else if second == self.elements.len() {
            Ok(true)
        } else {
            Err(MeshError::MixedOrder)
        }
    }

    /// Every subdomain id present on an element.
    #[must_use]
    pub fn subdomain_ids(&self) -> BTreeSet<SubdomainId> {
        self.elements.iter().map(|e| e.subdomain).collect()
    }

    /// Id bound to a subdomain name, if any.
    #[must_use]
    pub fn subdomain_id_by_name(&self, name: &str) -> Option<SubdomainId> {
        self.subdomain_names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&id, _)| id)
    }

    /// Merge another subdomain name map into this one.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SubdomainNameConflict`] if one name would be
    /// bound to two different ids.
    pub fn merge_subdomain_names(
        &mut self,
        other: &BTreeMap<SubdomainId, String>,
    ) -> MeshResult<()> {
        for (&id, name) in other {
            if let Some(existing) = self.subdomain_id_by_name(name) {
                if existing != id {
                    return Err(MeshError::SubdomainNameConflict {
                        name: name.clone(),
                        first: existing,
                        second: id,
                    });
                }
            }
            self.subdomain_names.insert(id, name.clone());
        }
        Ok(())
    }

    /// Merge another boundary name map into this one.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::BoundaryNameConflict`] if one name would be
    /// bound to two different ids.
    pub fn merge_boundary_names(&mut self, other: &BTreeMap<BoundaryId, String>) -> MeshResult<()> {
        for (&id, name) in other {
            if let Some(existing) = self.boundary.id_by_name(name) {
                if existing != id {
                    return Err(MeshError::BoundaryNameConflict {
                        name: name.clone(),
                        first: existing,
                        second: id,
                    });
                }
            }
            self.boundary.names_mut().insert(id, name.clone());
        }
        Ok(())
    }

    /// Index of an extra element integer, registering it if new.
    ///
    /// Returns `(index, newly_added)`.
    pub fn add_extra_integer(&mut self, name: &str) -> (usize, bool) {
        if let Some(i) = self.extra_integer_index(name) {
            return (i, false);
        }
        self.extra_integer_names.push(name.to_owned());
        for e in &mut self.elements {
            e.extra.push(INVALID_ID);
        }
        (self.extra_integer_names.len() - 1, true)
    }

    /// Index of an extra element integer.
    #[must_use]
    pub fn extra_integer_index(&self, name: &str) -> Option<usize> {
        self.extra_integer_names.iter().position(|n| n == name)
    }

    /// Node ids on every side carrying `id`, vertices and mid-side nodes.
    #[must_use]
    pub fn boundary_nodes(&self, id: BoundaryId) -> BTreeSet<u32> {
        let mut out = BTreeSet::new();
        for (elem, side) in self.boundary.sides_with_id(id) {
            let e = &self.elements[elem as usize];
            let (a, b) = e.side_nodes(side);
            out.insert(a);
            out.insert(b);
            if let Some(m) = e.side_mid_node(side) {
                out.insert(m);
            }
        }
        out
    }

    /// Translate every node.
    pub fn translate(&mut self, offset: Vector2<f64>) {
        for p in &mut self.nodes {
            *p += offset;
        }
    }

    /// Scale every node about the origin.
    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.nodes {
            p.coords *= factor;
        }
    }

    /// Change the subdomain of every element in `old` to `new`.
    pub fn renumber_subdomain(&mut self, old: SubdomainId, new: SubdomainId) {
        for e in &mut self.elements {
            if e.subdomain == old {
                e.subdomain = new;
            }
        }
    }

    /// Drop nodes no element references and compact node ids.
    ///
    /// Returns the number of removed nodes.
    #[allow(clippy::cast_possible_truncation)]
    pub fn remove_orphan_nodes(&mut self) -> usize {
        let mut used = vec![false; self.nodes.len()];
        for e in &self.elements {
            for &n in &e.nodes {
                used[n as usize] = true;
            }
        }
        let mut remap = vec![u32::MAX; self.nodes.len()];
        let mut kept = Vec::with_capacity(self.nodes.len());
        for (i, p) in self.nodes.iter().enumerate() {
            if used[i] {
                remap[i] = kept.len() as u32;
                kept.push(*p);
            }
        }
        let removed = self.nodes.len() - kept.len();
        self.nodes = kept;
        for e in &mut self.elements {
            for n in &mut e.nodes {
                *n = remap[*n as usize];
            }
        }
        removed
    }

    /// Append the elements and side tags of `other`, renumbering its nodes
    /// through `node_remap`. Returns the element offset.
    ///
    /// Extra integers are matched by name; values missing on either side
    /// become [`INVALID_ID`].
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn append_disjoint(&mut self, other: FeMesh, node_remap: &[u32]) -> u32 {
        let elem_offset = self.elements.len() as u32;
        let mut extra_map = Vec::with_capacity(other.extra_integer_names.len());
        for name in &other.extra_integer_names {
            extra_map.push(self.add_extra_integer(name).0);
        }
        let width = self.extra_integer_names.len();
        for mut e in other.elements {
            for n in &mut e.nodes {
                *n = node_remap[*n as usize];
            }
            let mut extra = vec![INVALID_ID; width];
            for (src, &dst) in extra_map.iter().enumerate() {
                if let Some(&v) = e.extra.get(src) {
                    extra[dst] = v;
                }
            }
            e.extra = extra;
            self.elements.push(e);
        }
        for t in other.boundary.iter() {
            self.boundary.add_side(t.element + elem_offset, t.side, t.id);
        }
        elem_offset
    }
}

impl MeshTopology for FeMesh {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn node(&self, index: usize) -> Option<&Point2<f64>> {
        self.nodes.get(index)
    }

    fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }
}

impl MeshBounds for FeMesh {
    fn bounds(&self) -> Aabb2 {
        Aabb2::from_points(self.nodes.iter())
    }
}

/// A unit square split into two triangles with its rim tagged
/// [`OUTER_SIDESET_ID`]. Handy as a small fixture.
#[must_use]
pub fn unit_square() -> FeMesh {
    let mut mesh = FeMesh::with_capacity(4, 2);
    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
        mesh.add_node(Point2::new(x, y));
    }
    mesh.elements.push(Element::new(ElementKind::Tri3, vec![0, 1, 2], 1));
    mesh.elements.push(Element::new(ElementKind::Tri3, vec![0, 2, 3], 1));
    mesh.boundary.add_side(0, 0, OUTER_SIDESET_ID);
    mesh.boundary.add_side(0, 1, OUTER_SIDESET_ID);
    mesh.boundary.add_side(1, 1, OUTER_SIDESET_ID);
    mesh.boundary.add_side(1, 2, OUTER_SIDESET_ID);
    mesh
}
