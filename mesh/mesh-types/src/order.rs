//! Promotion of linear elements to second order.

use hashbrown::HashMap;
use nalgebra::{center, Point2, Vector2};

use crate::error::MeshResult;
use crate::{ElementKind, FeMesh};

impl FeMesh {
    /// Convert every linear element to its second-order counterpart.
    ///
    /// Mid-side nodes are created once per edge at the straight midpoint and
    /// shared between neighbours. Quadrilaterals become [`ElementKind::Quad9`]
    /// when `quad9` is set, otherwise [`ElementKind::Quad8`]. Side tags keep
    /// their side indices.
    ///
    /// Returns the mid-side node of each edge, keyed by its corner nodes in
    /// ascending order. The map is empty when the mesh is already second order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::MixedOrder`](crate::MeshError::MixedOrder) if the
    /// mesh already mixes element orders.
    pub fn to_second_order(&mut self, quad9: bool) -> MeshResult<HashMap<(u32, u32), u32>> {
        let mut mids: HashMap<(u32, u32), u32> = HashMap::new();
        if self.is_second_order()? {
            return Ok(mids);
        }
        for ei in 0..self.elements.len() {
            let kind = self.elements[ei].kind;
            let n = kind.vertex_count();
            for s in 0..n {
                let a = self.elements[ei].nodes[s];
                let b = self.elements[ei].nodes[(s + 1) % n];
                let key = if a < b { (a, b) } else { (b, a) };
                let mid = match mids.get(&key) {
                    Some(&m) => m,
                    None => {
                        let p = center(&self.nodes[a as usize], &self.nodes[b as usize]);
                        let m = self.add_node(p);
                        mids.insert(key, m);
                        m
                    }
                };
                self.elements[ei].nodes.push(mid);
            }
            let promoted = kind.promoted(quad9);
            if promoted == ElementKind::Quad9 {
                let c = self.elements[ei].vertex_average(&self.nodes);
                let m = self.add_node(c);
                self.elements[ei].nodes.push(m);
            }
            self.elements[ei].kind = promoted;
        }
        Ok(mids)
    }

    /// Move the face node of every [`ElementKind::Quad9`] to the transfinite
    /// blend of its eight boundary nodes.
    pub fn recenter_quad9_faces(&mut self) {
        let sum_of = |ids: &[u32]| {
            ids.iter()
                .fold(Vector2::<f64>::zeros(), |acc, &n| acc + self.nodes[n as usize].coords)
        };
        let updates: Vec<(usize, Point2<f64>)> = self
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::Quad9)
            .map(|e| {
                let corners = sum_of(&e.nodes[..4]);
                let mids = sum_of(&e.nodes[4..8]);
                (e.nodes[8] as usize, Point2::from(mids * 0.5 - corners * 0.25))
            })
            .collect();
        for (node, p) in updates {
            self.nodes[node] = p;
        }
    }
}
