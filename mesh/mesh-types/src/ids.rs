//! Identifier aliases and reserved tag values.

/// Identifier of an element subdomain (block).
pub type SubdomainId = u32;

/// Identifier of a boundary (sideset) tag.
pub type BoundaryId = u32;

/// Marker for an unassigned extra element integer.
pub const INVALID_ID: u32 = u32::MAX;

/// Tag carried by the external rim of every generated piece.
pub const OUTER_SIDESET_ID: BoundaryId = 10_000;

/// Base of the per-side tags used for the second half of each polygon side.
pub const OUTER_SIDESET_ID_ALT: BoundaryId = 15_000;

/// Radial slice edge lying on the +y axis.
pub const SLICE_BEGIN: BoundaryId = 30_500;

/// Radial slice edge at `90° - 360°/n`.
pub const SLICE_END: BoundaryId = 31_000;

/// Base of the peripheral inner/outer interface tags.
pub const SLICE_ALT: BoundaryId = 30_000;

/// Offset of peripheral region block ids.
pub const PERIPHERAL_ID_SHIFT: SubdomainId = 1_000;

/// Coordinate tolerance for stitching and fuzzy comparisons.
pub const TOLERANCE: f64 = 1e-6;

/// Name of the extra element integer carrying control-drum numbering.
pub const CONTROL_DRUM_ID_NAME: &str = "control_drum_id";

/// Returns `true` when `a` and `b` agree within [`TOLERANCE`], scaled by magnitude.
#[must_use]
pub fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Wraps an angle in degrees to `(-180, 180]`.
#[must_use]
pub fn wrap_degrees(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}
