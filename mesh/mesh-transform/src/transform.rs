//! Rigid and similarity transformations in the mesh plane.

use mesh_types::FeMesh;
use nalgebra::{Matrix2, Matrix3, Point2, Vector2, Vector3};

use crate::error::{TransformError, TransformResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D transformation represented as a 3x3 homogeneous matrix.
///
/// # Example
///
/// ```
/// use mesh_transform::Transform2D;
/// use nalgebra::Point2;
///
/// let t = Transform2D::rotation_degrees(90.0).then(&Transform2D::translation(1.0, 0.0));
/// let p = t.transform_point(Point2::new(1.0, 0.0));
/// assert!((p.x - 1.0).abs() < 1e-12 && (p.y - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform2D {
    matrix: Matrix3<f64>,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// Create a transformation from a homogeneous matrix.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Self { matrix }
    }

    /// The identity transformation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Translation by `(tx, ty)`.
    #[must_use]
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_translation(Vector2::new(tx, ty))
    }

    /// Translation by a vector.
    #[must_use]
    pub fn from_translation(v: Vector2<f64>) -> Self {
        Self {
            matrix: Matrix3::new_translation(&v),
        }
    }

    /// Uniform scaling about the origin.
    #[must_use]
    pub fn uniform_scale(factor: f64) -> Self {
        Self {
            matrix: Matrix3::new_scaling(factor),
        }
    }

    /// Counter-clockwise rotation about the origin.
    ///
    /// # Arguments
    ///
    /// * `angle` - Rotation angle in radians
    #[must_use]
    pub fn rotation(angle: f64) -> Self {
        Self {
            matrix: Matrix3::new_rotation(angle),
        }
    }

    /// Counter-clockwise rotation about the origin, in degrees.
    #[must_use]
    pub fn rotation_degrees(degrees: f64) -> Self {
        Self::rotation(degrees.to_radians())
    }

    /// The underlying matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Compose this transformation with another (self then other).
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// The inverse transformation, `None` if singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|m| Self { matrix: m })
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m: Matrix2<f64> = self.matrix.fixed_view::<2, 2>(0, 0).into_owned();
        m.determinant()
    }

    /// Transform a point (applies translation).
    #[must_use]
    pub fn transform_point(&self, point: Point2<f64>) -> Point2<f64> {
        let r = self.matrix * Vector3::new(point.x, point.y, 1.0);
        Point2::new(r.x, r.y)
    }

    /// Transform a direction (ignores translation).
    #[must_use]
    pub fn transform_vector(&self, v: Vector2<f64>) -> Vector2<f64> {
        let r = self.matrix * Vector3::new(v.x, v.y, 0.0);
        Vector2::new(r.x, r.y)
    }

    /// Transform every node of a mesh in place.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Reflection`] for transforms that would
    /// invert element orientation; the mesh is left untouched.
    pub fn apply_in_place(&self, mesh: &mut FeMesh) -> TransformResult<()> {
        let determinant = self.determinant();
        if determinant <= 0.0 {
            return Err(TransformError::Reflection { determinant });
        }
        for p in &mut mesh.nodes {
            *p = self.transform_point(*p);
        }
        Ok(())
    }

    /// Apply this transformation to a copy of a mesh.
    ///
    /// # Errors
    ///
    /// See [`Transform2D::apply_in_place`].
    pub fn apply_to_mesh(&self, mesh: &FeMesh) -> TransformResult<FeMesh> {
        let mut result = mesh.clone();
        self.apply_in_place(&mut result)?;
        Ok(result)
    }
}

/// Rotate every node of a mesh about the origin.
pub fn rotate_mesh(mesh: &mut FeMesh, degrees: f64) {
    if degrees == 0.0 {
        return;
    }
    let t = Transform2D::rotation_degrees(degrees);
    for p in &mut mesh.nodes {
        *p = t.transform_point(*p);
    }
}

/// Rotate a single point about the origin.
#[must_use]
pub fn rotate_point(p: Point2<f64>, degrees: f64) -> Point2<f64> {
    let (s, c) = degrees.to_radians().sin_cos();
    Point2::new(p.x.mul_add(c, -(p.y * s)), p.x.mul_add(s, p.y * c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::unit_square;

    #[test]
    fn identity_transformation() {
        let t = Transform2D::identity();
        let p = t.transform_point(Point2::new(1.0, 2.0));
        assert_relative_eq!(p, Point2::new(1.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn translation_does_not_affect_vectors() {
        let t = Transform2D::translation(10.0, 20.0);
        let v = t.transform_vector(Vector2::new(1.0, 0.0));
        assert_relative_eq!(v, Vector2::new(1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rotation_and_inverse() {
        let t = Transform2D::rotation_degrees(30.0).then(&Transform2D::translation(2.0, -1.0));
        let inv = t.inverse().unwrap();
        let p = Point2::new(0.3, 0.7);
        assert_relative_eq!(inv.transform_point(t.transform_point(p)), p, epsilon = 1e-12);
        assert_relative_eq!(rotate_point(p, 30.0).x, Transform2D::rotation_degrees(30.0).transform_point(p).x, epsilon = 1e-12);
    }

    #[test]
    fn reflection_is_rejected() {
        let mirror = Transform2D::from_matrix(Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        let mut mesh = unit_square();
        let before = mesh.clone();
        assert!(matches!(
            mirror.apply_in_place(&mut mesh),
            Err(TransformError::Reflection { .. })
        ));
        assert_eq!(mesh, before);
    }

    #[test]
    fn rotated_mesh_keeps_area() {
        let mut mesh = unit_square();
        rotate_mesh(&mut mesh, 37.0);
        assert_relative_eq!(mesh.area(), 1.0, epsilon = 1e-12);
        assert!(mesh.min_element_area().unwrap() > 0.0);
    }
}
