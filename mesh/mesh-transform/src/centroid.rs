//! Area-weighted mesh centroid.

use mesh_types::FeMesh;
use nalgebra::{Point2, Vector2};

use crate::error::{TransformError, TransformResult};

/// Area-weighted average of element vertex averages.
///
/// # Errors
///
/// Returns [`TransformError::EmptyMesh`] when the mesh has no element area.
///
/// # Example
///
/// ```
/// use mesh_transform::area_centroid;
/// use mesh_types::unit_square;
///
/// let c = area_centroid(&unit_square()).unwrap();
/// assert!((c.x - 0.5).abs() < 1e-12);
/// ```
pub fn area_centroid(mesh: &FeMesh) -> TransformResult<Point2<f64>> {
    let mut weighted = Vector2::zeros();
    let mut total = 0.0;
    for e in &mesh.elements {
        let area = e.signed_area(&mesh.nodes);
        weighted += e.vertex_average(&mesh.nodes).coords * area;
        total += area;
    }
    if total <= 0.0 {
        return Err(TransformError::EmptyMesh);
    }
    Ok(Point2::from(weighted / total))
}

/// Translate a mesh so its area centroid sits at the origin.
///
/// Returns the applied offset.
///
/// # Errors
///
/// See [`area_centroid`].
pub fn center_on_centroid(mesh: &mut FeMesh) -> TransformResult<Vector2<f64>> {
    let offset = -area_centroid(mesh)?.coords;
    mesh.translate(offset);
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::unit_square;

    #[test]
    fn shifted_square_recentres() {
        let mut mesh = unit_square();
        mesh.translate(Vector2::new(3.0, -2.0));
        let offset = center_on_centroid(&mut mesh).unwrap();
        assert_relative_eq!(offset, Vector2::new(-3.5, 1.5), epsilon = 1e-12);
        assert_relative_eq!(area_centroid(&mesh).unwrap(), Point2::origin(), epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_has_no_centroid() {
        assert!(matches!(
            area_centroid(&FeMesh::new()),
            Err(TransformError::EmptyMesh)
        ));
    }
}
