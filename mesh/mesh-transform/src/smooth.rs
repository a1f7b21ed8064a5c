//! Laplacian node smoothing.
//!
//! Each free node moves toward the centroid of its edge neighbours:
//!
//! ```text
//! v_new = v + lambda * (centroid(N(v)) - v)
//! ```
//!
//! Nodes on the mesh boundary stay fixed, so the outline of a generated
//! polygon is preserved exactly.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use mesh_types::{FeMesh, SideAdjacency};
use nalgebra::Vector2;
use tracing::debug;

/// Outcome of a smoothing run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothResult {
    /// Iterations performed.
    pub iterations: u32,
    /// Largest node displacement in the final iteration.
    pub max_displacement: f64,
}

/// Apply `iterations` rounds of Laplacian smoothing with strength `lambda`.
///
/// Only corner nodes of elements participate; the mesh is expected to be
/// first order. Zero iterations leave the mesh untouched.
///
/// # Arguments
///
/// * `mesh` - The mesh to smooth
/// * `iterations` - Number of smoothing rounds
/// * `lambda` - Smoothing factor (0.0-1.0), 1.0 moves nodes fully to the neighbour centroid
pub fn smooth_laplacian(mesh: &mut FeMesh, iterations: u32, lambda: f64) -> SmoothResult {
    if iterations == 0 || mesh.elements.is_empty() {
        return SmoothResult::default();
    }

    let neighbors = build_node_neighbors(mesh);
    let boundary = find_boundary_nodes(mesh);

    let mut max_displacement = 0.0;
    for _ in 0..iterations {
        let moves: Vec<(usize, Vector2<f64>)> = neighbors
            .iter()
            .filter(|(n, _)| !boundary.contains(n))
            .map(|(&n, adj)| {
                let sum = adj
                    .iter()
                    .fold(Vector2::zeros(), |acc, &m| acc + mesh.nodes[m as usize].coords);
                #[allow(clippy::cast_precision_loss)]
                let centroid = sum / adj.len() as f64;
                (n as usize, (centroid - mesh.nodes[n as usize].coords) * lambda)
            })
            .collect();
        max_displacement = moves.iter().map(|(_, d)| d.norm()).fold(0.0, f64::max);
        for (n, d) in moves {
            mesh.nodes[n] += d;
        }
    }
    debug!(iterations, max_displacement, "laplacian smoothing done");
    SmoothResult {
        iterations,
        max_displacement,
    }
}

fn build_node_neighbors(mesh: &FeMesh) -> HashMap<u32, BTreeSet<u32>> {
    let mut neighbors: HashMap<u32, BTreeSet<u32>> = HashMap::new();
    for e in &mesh.elements {
        let verts = e.vertex_nodes();
        let n = verts.len();
        for i in 0..n {
            let (a, b) = (verts[i], verts[(i + 1) % n]);
            neighbors.entry(a).or_default().insert(b);
            neighbors.entry(b).or_default().insert(a);
        }
    }
    neighbors
}

fn find_boundary_nodes(mesh: &FeMesh) -> BTreeSet<u32> {
    SideAdjacency::build(mesh)
        .boundary_edges()
        .into_iter()
        .flat_map(|(a, b)| [a, b])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{ElementKind, Point2};

    /// 3x3 grid of quads with the centre node displaced.
    fn grid_with_bump() -> FeMesh {
        let mut mesh = FeMesh::new();
        for j in 0..4 {
            for i in 0..4 {
                mesh.add_node(Point2::new(f64::from(i), f64::from(j)));
            }
        }
        for j in 0..3u32 {
            for i in 0..3u32 {
                let a = j * 4 + i;
                mesh.add_element(ElementKind::Quad4, &[a, a + 1, a + 5, a + 4], 1)
                    .unwrap();
            }
        }
        mesh.nodes[5] += Vector2::new(0.2, 0.1);
        mesh
    }

    #[test]
    fn zero_iterations_is_identity() {
        let mut mesh = grid_with_bump();
        let before = mesh.clone();
        let result = smooth_laplacian(&mut mesh, 0, 1.0);
        assert_eq!(result.iterations, 0);
        assert_eq!(mesh, before);
    }

    #[test]
    fn interior_nodes_relax_and_boundary_stays() {
        let mut mesh = grid_with_bump();
        let area = mesh.area();
        smooth_laplacian(&mut mesh, 50, 1.0);
        assert_relative_eq!(mesh.nodes[5], Point2::new(1.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(mesh.nodes[0], Point2::new(0.0, 0.0));
        assert_relative_eq!(mesh.area(), area, epsilon = 1e-12);
    }
}
