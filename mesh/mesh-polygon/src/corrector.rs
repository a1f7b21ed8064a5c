//! Radius correction that preserves the area of polygonized circles.
//!
//! A circle of radius `r` discretized by nodes at azimuthal angles
//! `θ_0 < θ_1 < ...` has less area than `π r²`. Scaling the radius by the
//! factor returned here restores it.

use std::f64::consts::PI;

use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PolygonError, PolygonResult};

/// Intervals at or above this width (degrees) cannot be polygonized.
const MAX_INTERVAL_DEGREES: f64 = 120.0;

/// Element order of the discretized arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementOrder {
    /// Straight chords between consecutive nodes.
    #[default]
    First,
    /// Parabolic arcs through vertex, midpoint and vertex.
    Second,
}

/// Compute the radius scale factor that preserves area.
///
/// # Arguments
///
/// * `angles` - Azimuthal node angles in degrees, strictly increasing
/// * `full_circle` - Whether the list closes on itself (`front + 360` is appended)
/// * `order` - Element order of the arc
/// * `first_is_vertex` - For second order, whether `angles[0]` is a vertex node
///
/// For first order the factor is `sqrt(Σθ / Σ sin θ)`. For second order
/// intervals are paired `(θ0, θ1)` around each midpoint and the factor is
/// `sqrt(Σ(θ0+θ1) / Σ[(4/3)(sin θ0 + sin θ1) − (1/3) sin(θ0+θ1)])`.
///
/// # Errors
///
/// Returns an error if fewer than two angles are given, angles do not
/// increase, any interval reaches 120°, a second-order list has an odd
/// number of intervals, or a partial second-order sweep starts on a
/// midpoint.
///
/// # Example
///
/// ```
/// use mesh_polygon::{correction_factor, ElementOrder};
///
/// let f = correction_factor(&[0.0, 90.0, 180.0, 270.0], true, ElementOrder::First, true).unwrap();
/// assert!((f - (std::f64::consts::PI / 2.0).sqrt()).abs() < 1e-12);
/// ```
pub fn correction_factor(
    angles: &[f64],
    full_circle: bool,
    order: ElementOrder,
    first_is_vertex: bool,
) -> PolygonResult<f64> {
    if angles.len() < 2 {
        return Err(PolygonError::TooFewAngles {
            required: 2,
            actual: angles.len(),
        });
    }
    if order == ElementOrder::Second && !full_circle && !first_is_vertex {
        return Err(PolygonError::PartialSweepStartsOnMidpoint);
    }

    let mut list = angles.to_vec();
    if full_circle {
        list.push(angles[0] + 360.0);
    }
    let mut intervals = Vec::with_capacity(list.len() - 1);
    for pair in list.windows(2) {
        let interval = pair[1] - pair[0];
        if interval <= 0.0 {
            return Err(PolygonError::NonIncreasingAngles {
                previous: pair[0],
                next: pair[1],
            });
        }
        if interval >= MAX_INTERVAL_DEGREES {
            return Err(PolygonError::IntervalTooWide { interval });
        }
        intervals.push(interval.to_radians());
    }

    let factor = match order {
        ElementOrder::First => {
            let total: f64 = intervals.iter().sum();
            let chords: f64 = intervals.iter().map(|t| t.sin()).sum();
            (total / chords).sqrt()
        }
        ElementOrder::Second => {
            if intervals.len() % 2 != 0 {
                return Err(PolygonError::OddIntervalCount(intervals.len()));
            }
            if !first_is_vertex {
                intervals.rotate_left(1);
            }
            let mut total = 0.0;
            let mut area = 0.0;
            for pair in intervals.chunks_exact(2) {
                let (t0, t1) = (pair[0], pair[1]);
                total += t0 + t1;
                area += (4.0 / 3.0) * (t0.sin() + t1.sin()) - (t0 + t1).sin() / 3.0;
            }
            (total / area).sqrt()
        }
    };
    debug!(count = angles.len(), ?order, factor, "computed correction factor");
    Ok(factor)
}

/// Area of a full-circle polygonized disk of radius `radius`.
///
/// Companion to [`correction_factor`] for checks and tests.
///
/// # Errors
///
/// Same conditions as [`correction_factor`] with `full_circle` set.
pub fn polygonized_area(
    angles: &[f64],
    radius: f64,
    order: ElementOrder,
    first_is_vertex: bool,
) -> PolygonResult<f64> {
    let factor = correction_factor(angles, true, order, first_is_vertex)?;
    Ok(PI * radius * radius / (factor * factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(n: usize) -> Vec<f64> {
        (0..n).map(|i| 360.0 * i as f64 / n as f64).collect()
    }

    #[test]
    fn four_sectors_restore_the_square_area() {
        let f = correction_factor(&uniform(4), true, ElementOrder::First, true).unwrap();
        assert_relative_eq!(f, (PI / 2.0).sqrt(), epsilon = 1e-12);
        // the inscribed square of radius f has area 2 f^2 = pi
        assert_relative_eq!(2.0 * f * f, PI, epsilon = 1e-12);
    }

    #[test]
    fn factor_approaches_one_for_fine_lists() {
        let f = correction_factor(&uniform(720), true, ElementOrder::First, true).unwrap();
        assert!(f > 1.0 && f < 1.0001);
    }

    #[test]
    fn second_order_is_closer_to_one() {
        let angles = uniform(12);
        let first = correction_factor(&angles, true, ElementOrder::First, true).unwrap();
        let second = correction_factor(&angles, true, ElementOrder::Second, true).unwrap();
        assert!(second > 1.0);
        assert!(second < first);
    }

    #[test]
    fn rotation_for_midpoint_start_only_matters_for_uneven_pairs() {
        let angles = [0.0, 10.0, 30.0, 60.0, 100.0, 150.0, 210.0, 280.0];
        let a = correction_factor(&angles, true, ElementOrder::Second, true).unwrap();
        let b = correction_factor(&angles, true, ElementOrder::Second, false).unwrap();
        assert!((a - b).abs() > 1e-9);
    }

    #[test]
    fn partial_sweep() {
        let f = correction_factor(&[0.0, 30.0, 60.0], false, ElementOrder::First, true).unwrap();
        let t = 30.0_f64.to_radians();
        assert_relative_eq!(f, (2.0 * t / (2.0 * t.sin())).sqrt(), epsilon = 1e-12);
        assert!(matches!(
            correction_factor(&[0.0, 30.0, 60.0], false, ElementOrder::Second, false),
            Err(PolygonError::PartialSweepStartsOnMidpoint)
        ));
    }

    #[test]
    fn degenerate_input_fails_fast() {
        assert!(matches!(
            correction_factor(&[0.0], true, ElementOrder::First, true),
            Err(PolygonError::TooFewAngles { .. })
        ));
        assert!(matches!(
            correction_factor(&[0.0, 10.0, 10.0], false, ElementOrder::First, true),
            Err(PolygonError::NonIncreasingAngles { .. })
        ));
        assert!(matches!(
            correction_factor(&[0.0, 120.0, 240.0], true, ElementOrder::First, true),
            Err(PolygonError::IntervalTooWide { .. })
        ));
        assert!(matches!(
            correction_factor(&[0.0, 30.0, 60.0, 90.0], false, ElementOrder::Second, true),
            Err(PolygonError::OddIntervalCount(3))
        ));
    }

    #[test]
    fn polygonized_area_matches_the_hexagon() {
        let area = polygonized_area(&uniform(6), 1.0, ElementOrder::First, true).unwrap();
        assert_relative_eq!(area, 1.5 * 3.0_f64.sqrt(), epsilon = 1e-12);
    }
}
