//! Snapping wedge edges onto existing node lines.
//!
//! A wedge edge at a target angle is realised by moving one existing line
//! of nodes onto it. The candidates are the nearest azimuthal angles below
//! and above the target; the list wraps at ±180°.

use mesh_types::{wrap_degrees, TOLERANCE};

/// Neighbouring mesh angles around a target.
///
/// Angles across the ±180° seam are unwrapped, so `lower <= target <= upper`
/// always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleBracket {
    /// Nearest angle below the target.
    pub lower: f64,
    /// Index of `lower` in the angle list.
    pub lower_index: usize,
    /// Nearest angle at or above the target.
    pub upper: f64,
    /// Index of `upper` in the angle list.
    pub upper_index: usize,
}

/// Which node line realises one wedge edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSnap {
    /// Requested edge angle.
    pub target: f64,
    /// Neighbouring angle that stays in place.
    pub kept_angle: f64,
    /// Angle whose nodes move onto the target.
    pub moved_angle: f64,
    /// Index of `moved_angle` in the angle list.
    pub moved_index: usize,
}

/// Find the neighbours of `target` in a sorted angle list.
///
/// Returns `None` for an empty list.
///
/// # Example
///
/// ```
/// use mesh_wedge::bracket_angle;
///
/// let b = bracket_angle(170.0, &[-120.0, 0.0, 120.0]).unwrap();
/// assert_eq!((b.lower_index, b.upper_index), (2, 0));
/// assert!((b.upper - 240.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn bracket_angle(target: f64, angles: &[f64]) -> Option<AngleBracket> {
    let last = angles.len().checked_sub(1)?;
    let index = angles.partition_point(|&a| a < target);
    let bracket = if index == 0 {
        AngleBracket {
            lower: angles[last] - 360.0,
            lower_index: last,
            upper: angles[0],
            upper_index: 0,
        }
    } else if index > last {
        AngleBracket {
            lower: angles[last],
            lower_index: last,
            upper: angles[0] + 360.0,
            upper_index: 0,
        }
    } else {
        AngleBracket {
            lower: angles[index - 1],
            lower_index: index - 1,
            upper: angles[index],
            upper_index: index,
        }
    };
    Some(bracket)
}

/// Pick the neighbour that moves onto `target`.
///
/// A neighbour on a polygon corner stays unless the target already sits on
/// it; the lower neighbour is checked first. Without a corner the closer
/// neighbour moves.
#[must_use]
pub fn choose_moved_angle(target: f64, bracket: &AngleBracket, is_corner: impl Fn(f64) -> bool) -> AngleSnap {
    let lower = (bracket.lower, bracket.lower_index);
    let upper = (bracket.upper, bracket.upper_index);
    let ((kept, _), (moved, moved_index)) =
        if is_corner(bracket.lower) && (bracket.lower - target).abs() > TOLERANCE {
            (lower, upper)
        } else if is_corner(bracket.upper) && (bracket.upper - target).abs() > TOLERANCE {
            (upper, lower)
        } else if target - bracket.lower > (bracket.upper - bracket.lower) / 2.0 {
            (lower, upper)
        } else {
            (upper, lower)
        };
    AngleSnap {
        target,
        kept_angle: wrap_degrees(kept),
        moved_angle: wrap_degrees(moved),
        moved_index,
    }
}

/// Corner test for a regular polygon with a corner at `first_corner`.
///
/// An angle is a corner when it is a whole number of side sectors
/// (`360° / num_sides`) away from `first_corner`.
#[must_use]
pub fn corner_test(num_sides: u32, first_corner: f64) -> impl Fn(f64) -> bool {
    let sector = 360.0 / f64::from(num_sides);
    move |angle| {
        let steps = (angle - first_corner) / sector;
        (steps - steps.round()).abs() < TOLERANCE
    }
}
