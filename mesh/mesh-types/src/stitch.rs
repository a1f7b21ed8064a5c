//! Stitching meshes along tagged boundaries.
//!
//! Nodes on the two boundaries are matched with a spatial hash whose cells
//! are twice the tolerance wide, so each query inspects a 3x3 neighbourhood.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use nalgebra::Point2;
use tracing::debug;

use crate::adjacency::SideAdjacency;
use crate::error::{MeshError, MeshResult};
use crate::{BoundaryId, FeMesh};

/// Outcome of a stitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StitchReport {
    /// Node pairs merged into one node.
    pub merged_nodes: usize,
    /// Boundary tags removed from sides that became interior.
    pub cleared_sides: usize,
}

impl FeMesh {
    /// Merge `other` into this mesh, fusing coincident nodes found on the
    /// `tag_self` boundary of this mesh and the `tag_other` boundary of
    /// `other`.
    ///
    /// With `clear` set, `tag_self` and `tag_other` are removed from the
    /// sides that end up shared between two elements. Subdomain and
    /// boundary names are merged; the metadata of `self` is kept.
    ///
    /// # Errors
    ///
    /// Fails without modifying `self` if no node pair matches, a node
    /// matches several candidates, names conflict, or the element orders differ.
    pub fn stitch(
        &mut self,
        other: FeMesh,
        tag_self: BoundaryId,
        tag_other: BoundaryId,
        tolerance: f64,
        clear: bool,
    ) -> MeshResult<StitchReport> {
        if !self.elements.is_empty()
            && !other.elements.is_empty()
            && self.is_second_order()? != other.is_second_order()?
        {
            return Err(MeshError::MixedOrder);
        }

        let targets = self.boundary_nodes(tag_self);
        let sources = other.boundary_nodes(tag_other);
        let matches = match_nodes(&self.nodes, &targets, &other.nodes, &sources, tolerance, false)?;
        if matches.is_empty() {
            return Err(MeshError::NothingToStitch {
                tag_a: tag_self,
                tag_b: tag_other,
                tolerance,
            });
        }

        let mut subdomain_names = self.subdomain_names.clone();
        merge_checked(&mut subdomain_names, &other.subdomain_names, |name, first, second| {
            MeshError::SubdomainNameConflict { name, first, second }
        })?;
        let mut boundary_names = self.boundary.names().clone();
        merge_checked(&mut boundary_names, other.boundary.names(), |name, first, second| {
            MeshError::BoundaryNameConflict { name, first, second }
        })?;

        let mut remap = vec![u32::MAX; other.nodes.len()];
        for &(src, dst) in &matches {
            remap[src as usize] = dst;
        }
        for (i, p) in other.nodes.iter().enumerate() {
            if remap[i] == u32::MAX {
                remap[i] = self.add_node(*p);
            }
        }

        self.subdomain_names = subdomain_names;
        *self.boundary.names_mut() = boundary_names;
        let elem_offset = self.append_disjoint(other, &remap);

        let cleared = if clear {
            self.clear_stitched(|element, id| {
                (element < elem_offset && id == tag_self) || (element >= elem_offset && id == tag_other)
            })
        } else {
            0
        };
        debug!(
            merged = matches.len(),
            cleared,
            tag_self,
            tag_other,
            "stitched meshes"
        );
        Ok(StitchReport {
            merged_nodes: matches.len(),
            cleared_sides: cleared,
        })
    }

    /// Fuse coincident nodes between two boundaries of this mesh.
    ///
    /// Nodes of `tag_b` are replaced by their match on `tag_a`. Nodes that
    /// already lie on both boundaries are left alone.
    ///
    /// # Errors
    ///
    /// Fails without modifying the mesh if no node pair matches or a node
    /// matches several candidates.
    pub fn stitch_surfaces(
        &mut self,
        tag_a: BoundaryId,
        tag_b: BoundaryId,
        tolerance: f64,
        clear: bool,
    ) -> MeshResult<StitchReport> {
        let targets = self.boundary_nodes(tag_a);
        let sources: BTreeSet<u32> = self
            .boundary_nodes(tag_b)
            .difference(&targets)
            .copied()
            .collect();
        let matches = match_nodes(&self.nodes, &targets, &self.nodes, &sources, tolerance, true)?;
        if matches.is_empty() {
            return Err(MeshError::NothingToStitch {
                tag_a,
                tag_b,
                tolerance,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let mut remap: Vec<u32> = (0..self.nodes.len() as u32).collect();
        for &(src, dst) in &matches {
            remap[src as usize] = dst;
        }
        for e in &mut self.elements {
            for n in &mut e.nodes {
                *n = remap[*n as usize];
            }
        }
        self.remove_orphan_nodes();

        let cleared = if clear {
            self.clear_stitched(|_, id| id == tag_a || id == tag_b)
        } else {
            0
        };
        debug!(merged = matches.len(), cleared, tag_a, tag_b, "stitched surfaces");
        Ok(StitchReport {
            merged_nodes: matches.len(),
            cleared_sides: cleared,
        })
    }

    /// Remove tags selected by `pick` from sides that now have a neighbour.
    fn clear_stitched(&mut self, pick: impl Fn(u32, BoundaryId) -> bool) -> usize {
        let adj = SideAdjacency::build(self);
        let interior: Vec<_> = self
            .boundary
            .iter()
            .filter(|t| pick(t.element, t.id) && adj.has_neighbour(self, t.element, t.side))
            .copied()
            .collect();
        for t in &interior {
            self.boundary.remove_side(t.element, t.side, t.id);
        }
        interior.len()
    }
}

/// Merge `mesh_b` into `mesh_a`, returning the combined mesh.
///
/// Functional form of [`FeMesh::stitch`].
///
/// # Errors
///
/// See [`FeMesh::stitch`].
pub fn stitch_meshes(
    mut mesh_a: FeMesh,
    mesh_b: FeMesh,
    tag_a: BoundaryId,
    tag_b: BoundaryId,
    tolerance: f64,
    clear: bool,
) -> MeshResult<FeMesh> {
    mesh_a.stitch(mesh_b, tag_a, tag_b, tolerance, clear)?;
    Ok(mesh_a)
}

/// Pair every source node with the unique target node within `tolerance`.
///
/// `same_mesh` excludes trivial self matches when both sets index one node table.
fn match_nodes(
    target_coords: &[Point2<f64>],
    targets: &BTreeSet<u32>,
    source_coords: &[Point2<f64>],
    sources: &BTreeSet<u32>,
    tolerance: f64,
    same_mesh: bool,
) -> MeshResult<Vec<(u32, u32)>> {
    let cell_size = (tolerance * 2.0).max(f64::MIN_POSITIVE);
    let mut spatial_hash: HashMap<(i64, i64), Vec<u32>> = HashMap::new();
    for &t in targets {
        let cell = pos_to_cell(&target_coords[t as usize], cell_size);
        spatial_hash.entry(cell).or_default().push(t);
    }

    let mut matches = Vec::new();
    for &s in sources {
        let p = source_coords[s as usize];
        let cell = pos_to_cell(&p, cell_size);
        let mut found: Vec<u32> = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(candidates) = spatial_hash.get(&(cell.0 + dx, cell.1 + dy)) {
                    found.extend(candidates.iter().copied().filter(|&t| {
                        (!same_mesh || t != s)
                            && (target_coords[t as usize] - p).norm() <= tolerance
                    }));
                }
            }
        }
        match found.len() {
            0 => {}
            1 => matches.push((s, found[0])),
            n => {
                return Err(MeshError::AmbiguousStitch {
                    node: s,
                    candidates: n,
                    tolerance,
                })
            }
        }
    }
    Ok(matches)
}

fn merge_checked<I: Copy + Ord>(
    into: &mut BTreeMap<I, String>,
    from: &BTreeMap<I, String>,
    conflict: impl Fn(String, I, I) -> MeshError,
) -> MeshResult<()> {
    for (&id, name) in from {
        if let Some((&existing, _)) = into.iter().find(|(_, n)| *n == name) {
            if existing != id {
                return Err(conflict(name.clone(), existing, id));
            }
        }
        into.insert(id, name.clone());
    }
    Ok(())
}

/// Convert a position to its spatial hash cell.
#[allow(clippy::cast_possible_truncation)]
fn pos_to_cell(pos: &Point2<f64>, cell_size: f64) -> (i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
    )
}
