//! Axis-aligned bounding box in the mesh plane.

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb2, Point2};
///
/// let aabb = Aabb2::from_points([Point2::new(-1.0, 0.0), Point2::new(2.0, 3.0)].iter());
/// assert_eq!(aabb.size().x, 3.0);
/// assert!(aabb.contains(&Point2::new(0.0, 1.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb2 {
    /// Minimum corner.
    pub min: Point2<f64>,
    /// Maximum corner.
    pub max: Point2<f64>,
}

impl Aabb2 {
    /// Create a box from two corners, ordering them per axis.
    #[must_use]
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// An empty box (min > max), the identity for [`Aabb2::expand_to_include`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point of the iterator.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point2<f64>>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_to_include(p);
        }
        aabb
    }

    /// Whether the box contains no point.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Width and height.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector2<f64> {
        self.max - self.min
    }

    /// Centre point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the diagonal, 0 for an empty box.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.size().norm()
        }
    }

    /// Grow the box to include `p`.
    pub fn expand_to_include(&mut self, p: &Point2<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Whether `p` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_box_has_zero_diagonal() {
        let aabb = Aabb2::empty();
        assert!(aabb.is_empty());
        assert_relative_eq!(aabb.diagonal(), 0.0);
    }

    #[test]
    fn new_orders_corners() {
        let aabb = Aabb2::new(Point2::new(3.0, -1.0), Point2::new(-1.0, 2.0));
        assert_eq!(aabb.min, Point2::new(-1.0, -1.0));
        assert_eq!(aabb.max, Point2::new(3.0, 2.0));
        assert_relative_eq!(aabb.diagonal(), 5.0);
        assert_eq!(aabb.center(), Point2::new(1.0, 0.5));
    }
}
