//! Control drum numbering and the positions file.

use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use mesh_types::{FeMesh, Point2, CONTROL_DRUM_ID_NAME};
use tracing::debug;

use crate::error::LatticeResult;

/// A control drum placed in a core.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDrum {
    /// Drum centre in the core frame.
    pub position: Point2<f64>,
    /// Azimuthal angles of the drum mesh, in degrees.
    pub azimuths: Vec<f64>,
    /// Elements of the drum cell.
    pub elements: Range<usize>,
}

/// Polar angle of a point in `[0, 2π)`.
#[must_use]
pub fn polar_angle(p: &Point2<f64>) -> f64 {
    p.y.atan2(p.x).rem_euclid(TAU)
}

/// Sort drums by polar angle, nearer drums first on ties.
pub fn sort_control_drums(drums: &mut [ControlDrum]) {
    drums.sort_by(|a, b| {
        polar_angle(&a.position)
            .total_cmp(&polar_angle(&b.position))
            .then(a.position.coords.norm().total_cmp(&b.position.coords.norm()))
    });
}

/// Sort the drums and number their elements.
///
/// Registers the [`CONTROL_DRUM_ID_NAME`] extra integer: elements of the
/// `k`-th drum in polar order get `k + 1`, every other element `0`. The
/// sorted drums are returned.
pub fn number_control_drums(mesh: &mut FeMesh, mut drums: Vec<ControlDrum>) -> Vec<ControlDrum> {
    sort_control_drums(&mut drums);
    let (index, _) = mesh.add_extra_integer(CONTROL_DRUM_ID_NAME);
    for e in &mut mesh.elements {
        e.extra[index] = 0;
    }
    for (k, drum) in drums.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let id = k as u32 + 1;
        for e in &mut mesh.elements[drum.elements.clone()] {
            e.extra[index] = id;
        }
    }
    debug!(drums = drums.len(), "numbered control drums");
    drums
}

/// Write one `"<x> <y> 0.0"` line per drum position.
///
/// # Errors
///
/// Returns [`LatticeError::Io`](crate::LatticeError::Io) if the file cannot
/// be created or written.
pub fn write_positions_file<P: AsRef<Path>>(path: P, positions: &[Point2<f64>]) -> LatticeResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for p in positions {
        writeln!(writer, "{} {} 0.0", p.x, p.y)?;
    }
    writer.flush()?;
    Ok(())
}
