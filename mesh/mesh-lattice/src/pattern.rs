//! Lattice pattern geometry: validation, cell positions and rim pieces.
//!
//! Hexagonal patterns hold an odd number of rows whose lengths grow by one
//! up to the middle row and shrink again, so the corner-up cells fill a
//! flat-topped hexagon. Cartesian patterns are square.

use mesh_polygon::{LatticeShape, PieceKind};
use mesh_types::Point2;

use crate::error::{LatticeError, LatticeResult};
use crate::params::PeripheralSpec;

/// Check the row structure of a pattern.
///
/// # Errors
///
/// Returns an error for an empty pattern, an even hexagonal row count, a
/// row of the wrong length or a Cartesian pattern that is not square.
pub fn validate_pattern(shape: LatticeShape, pattern: &[Vec<usize>]) -> LatticeResult<()> {
    if pattern.is_empty() || pattern.iter().any(Vec::is_empty) {
        return Err(LatticeError::EmptyPattern);
    }
    let rows = pattern.len();
    match shape {
        LatticeShape::Hexagonal => {
            if rows % 2 == 0 {
                return Err(LatticeError::EvenHexRowCount(rows));
            }
            for (row, cells) in pattern.iter().enumerate() {
                let expected = hex_row_length(rows, row);
                if cells.len() != expected {
                    return Err(LatticeError::MalformedHexRow {
                        row,
                        expected,
                        actual: cells.len(),
                    });
                }
            }
        }
        LatticeShape::Cartesian => {
            let expected = pattern[0].len();
            if let Some((row, cells)) = pattern.iter().enumerate().find(|(_, r)| r.len() != expected) {
                return Err(LatticeError::RaggedCartesianRow {
                    row,
                    expected,
                    actual: cells.len(),
                });
            }
            if expected != rows {
                return Err(LatticeError::NonSquarePattern { rows, cols: expected });
            }
        }
    }
    Ok(())
}

/// Number of cells in row `row` of a hexagonal pattern with `rows` rows.
#[must_use]
pub const fn hex_row_length(rows: usize, row: usize) -> usize {
    let half = (rows + 1) / 2;
    let from_edge = if row < rows - 1 - row { row } else { rows - 1 - row };
    half + from_edge
}

/// Centre of cell `(row, col)` before the lattice is re-centred.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cell_position(shape: LatticeShape, row_length: usize, row: usize, col: usize, pitch: f64) -> Point2<f64> {
    match shape {
        LatticeShape::Hexagonal => Point2::new(
            (col as f64 - (row_length as f64 - 1.0) / 2.0) * pitch,
            -(row as f64) * pitch * 60.0_f64.to_radians().sin(),
        ),
        LatticeShape::Cartesian => Point2::new(col as f64 * pitch, -(row as f64) * pitch),
    }
}

/// Peripheral piece of cell `(row, col)` and its rotation in degrees.
///
/// Pieces are described for the top-right cell and rotated
/// counter-clockwise into place. Interior cells return `None`.
#[must_use]
pub fn rim_piece(shape: LatticeShape, pattern: &[Vec<usize>], row: usize, col: usize) -> Option<(PieceKind, f64)> {
    let last_row = pattern.len() - 1;
    let last_col = pattern[row].len() - 1;
    let first = col == 0;
    let last = col == last_col;
    match shape {
        LatticeShape::Hexagonal => {
            let mid = pattern.len() / 2;
            let corner = match (row, first, last) {
                (0, true, _) => Some(60.0),
                (0, _, true) => Some(0.0),
                (r, true, _) if r == mid => Some(120.0),
                (r, _, true) if r == mid => Some(-60.0),
                (r, true, _) if r == last_row => Some(180.0),
                (r, _, true) if r == last_row => Some(-120.0),
                _ => None,
            };
            if let Some(rotation) = corner {
                return Some((PieceKind::Corner, rotation));
            }
            let edge = if row == 0 {
                Some(0.0)
            } else if row == last_row {
                Some(180.0)
            } else if first {
                Some(if row < mid { 60.0 } else { 120.0 })
            } else if last {
                Some(if row < mid { -60.0 } else { -120.0 })
            } else {
                None
            };
            edge.map(|rotation| (PieceKind::Edge, rotation))
        }
        LatticeShape::Cartesian => {
            let corner = match (row, first, last) {
                (0, true, _) => Some(90.0),
                (0, _, true) => Some(0.0),
                (r, true, _) if r == last_row => Some(180.0),
                (r, _, true) if r == last_row => Some(-90.0),
                _ => None,
            };
            if let Some(rotation) = corner {
                return Some((PieceKind::Corner, rotation));
            }
            let edge = if row == 0 {
                Some(0.0)
            } else if row == last_row {
                Some(180.0)
            } else if first {
                Some(90.0)
            } else if last {
                Some(-90.0)
            } else {
                None
            };
            edge.map(|rotation| (PieceKind::Edge, rotation))
        }
    }
}

/// Azimuth of the first corner of the lattice outline, in degrees.
#[must_use]
pub const fn outline_first_corner(shape: LatticeShape) -> f64 {
    match shape {
        LatticeShape::Hexagonal => 0.0,
        LatticeShape::Cartesian => 45.0,
    }
}

/// Outer offset of each peripheral layer beyond the cell rim.
///
/// The offsets are measured along the outward normal of the lattice
/// outline: one per duct, then the pattern boundary.
///
/// # Errors
///
/// Returns an error if a duct reaches the pattern boundary or the pattern
/// pitch leaves no room for the background layer.
#[allow(clippy::cast_precision_loss)]
pub fn peripheral_extras(
    shape: LatticeShape,
    rows: usize,
    pitch: f64,
    spec: &PeripheralSpec,
) -> LatticeResult<Vec<f64>> {
    let rim = match shape {
        LatticeShape::Hexagonal => pitch / 3.0_f64.sqrt() * (3.0 * (rows / 2) as f64 + 2.0),
        LatticeShape::Cartesian => rows as f64 * pitch,
    };
    let half_pattern = spec.pattern_pitch / 2.0;
    let mut extras = Vec::with_capacity(spec.layer_count());
    for &size in &spec.duct_sizes {
        let duct = spec.duct_size_style.to_apothem(size, shape.num_sides());
        if duct >= half_pattern {
            return Err(LatticeError::DuctOutsidePattern {
                duct,
                pattern_pitch: spec.pattern_pitch,
            });
        }
        extras.push(duct - rim / 2.0);
    }
    extras.push(half_pattern - rim / 2.0);
    if extras[0] <= 0.0 {
        return Err(LatticeError::PatternPitchTooSmall {
            pattern_pitch: spec.pattern_pitch,
            extra: extras[0],
        });
    }
    Ok(extras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::SizeStyle;

    fn hex(rows: usize) -> Vec<Vec<usize>> {
        (0..rows).map(|r| vec![0; hex_row_length(rows, r)]).collect()
    }

    #[test]
    fn hex_row_lengths() {
        let lengths: Vec<usize> = (0..5).map(|r| hex_row_length(5, r)).collect();
        assert_eq!(lengths, vec![3, 4, 5, 4, 3]);
        assert_eq!(hex_row_length(1, 0), 1);
    }

    #[test]
    fn malformed_patterns() {
        assert!(validate_pattern(LatticeShape::Hexagonal, &hex(5)).is_ok());
        assert!(matches!(
            validate_pattern(LatticeShape::Hexagonal, &hex(4)),
            Err(LatticeError::EvenHexRowCount(4))
        ));
        assert!(matches!(
            validate_pattern(LatticeShape::Hexagonal, &[vec![0, 0], vec![0, 0], vec![0, 0]]),
            Err(LatticeError::MalformedHexRow { row: 1, expected: 3, actual: 2 })
        ));
        assert!(matches!(
            validate_pattern(LatticeShape::Cartesian, &[vec![0, 0], vec![0]]),
            Err(LatticeError::RaggedCartesianRow { row: 1, .. })
        ));
        assert!(matches!(
            validate_pattern(LatticeShape::Cartesian, &[vec![0, 0, 0], vec![0, 0, 0]]),
            Err(LatticeError::NonSquarePattern { rows: 2, cols: 3 })
        ));
        assert!(validate_pattern(LatticeShape::Cartesian, &[vec![0; 3], vec![0; 3], vec![0; 3]]).is_ok());
        assert!(matches!(
            validate_pattern(LatticeShape::Cartesian, &[]),
            Err(LatticeError::EmptyPattern)
        ));
    }

    #[test]
    fn hex_neighbours_are_one_pitch_apart() {
        let p = 1.3;
        let a = cell_position(LatticeShape::Hexagonal, 2, 0, 0, p);
        let b = cell_position(LatticeShape::Hexagonal, 3, 1, 0, p);
        let c = cell_position(LatticeShape::Hexagonal, 3, 1, 1, p);
        assert_relative_eq!((a - b).norm(), p, epsilon = 1e-12);
        assert_relative_eq!((a - c).norm(), p, epsilon = 1e-12);
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn every_rim_cell_gets_a_piece() {
        let pattern = hex(5);
        let mut corners = 0;
        let mut edges = 0;
        for (r, row) in pattern.iter().enumerate() {
            for c in 0..row.len() {
                match rim_piece(LatticeShape::Hexagonal, &pattern, r, c) {
                    Some((PieceKind::Corner, _)) => corners += 1,
                    Some((PieceKind::Edge, _)) => edges += 1,
                    None => {}
                }
            }
        }
        assert_eq!(corners, 6);
        assert_eq!(edges, 6);
        assert!(rim_piece(LatticeShape::Hexagonal, &pattern, 2, 2).is_none());
        assert_eq!(rim_piece(LatticeShape::Hexagonal, &pattern, 0, 2), Some((PieceKind::Corner, 0.0)));
        assert_eq!(rim_piece(LatticeShape::Hexagonal, &pattern, 3, 3), Some((PieceKind::Edge, -120.0)));
    }

    #[test]
    fn cartesian_rim() {
        let pattern = vec![vec![0; 3]; 3];
        assert_eq!(rim_piece(LatticeShape::Cartesian, &pattern, 0, 0), Some((PieceKind::Corner, 90.0)));
        assert_eq!(rim_piece(LatticeShape::Cartesian, &pattern, 2, 2), Some((PieceKind::Corner, -90.0)));
        assert_eq!(rim_piece(LatticeShape::Cartesian, &pattern, 1, 0), Some((PieceKind::Edge, 90.0)));
        assert_eq!(rim_piece(LatticeShape::Cartesian, &pattern, 1, 1), None);
    }

    #[test]
    fn hex_extras_reach_the_pattern_boundary() {
        let spec = PeripheralSpec::new(3.2, 1);
        let extras = peripheral_extras(LatticeShape::Hexagonal, 3, 1.0, &spec).unwrap();
        // the top corner of the top row sits at sqrt(3)/2 + 1/sqrt(3)
        let top = 3.0_f64.sqrt() / 2.0 + 1.0 / 3.0_f64.sqrt();
        assert_relative_eq!(extras[0], 1.6 - top, epsilon = 1e-12);
    }

    #[test]
    fn cartesian_extras_with_ducts() {
        let spec = PeripheralSpec::new(8.0, 1)
            .with_duct(3.2, 1)
            .with_duct(3.6, 1)
            .with_duct_size_style(SizeStyle::Apothem);
        let extras = peripheral_extras(LatticeShape::Cartesian, 3, 2.0, &spec).unwrap();
        assert_eq!(extras.len(), 3);
        assert_relative_eq!(extras[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(extras[1], 0.6, epsilon = 1e-12);
        assert_relative_eq!(extras[2], 1.0, epsilon = 1e-12);

        let tight = PeripheralSpec::new(6.0, 1);
        assert!(matches!(
            peripheral_extras(LatticeShape::Cartesian, 3, 2.0, &tight),
            Err(LatticeError::PatternPitchTooSmall { .. })
        ));
        let outside = PeripheralSpec::new(8.0, 1).with_duct(4.0, 1);
        assert!(matches!(
            peripheral_extras(LatticeShape::Cartesian, 3, 2.0, &outside),
            Err(LatticeError::DuctOutsidePattern { .. })
        ));
    }
}
