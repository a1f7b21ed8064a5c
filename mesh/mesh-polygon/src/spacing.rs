//! Radial node spacing inside one region.
//!
//! A region is divided into an optional inner boundary layer, a main layer
//! and an optional outer boundary layer. Each layer is split into intervals
//! whose sizes grow geometrically by the layer's bias.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PolygonError, PolygonResult};

/// A graded sub-layer at the inner or outer face of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundaryLayer {
    /// Absolute thickness of the layer.
    pub width: f64,
    /// Radial intervals inside the layer.
    pub intervals: u32,
    /// Growth factor between consecutive intervals (outward).
    pub bias: f64,
}

impl Default for BoundaryLayer {
    fn default() -> Self {
        Self::none()
    }
}

impl BoundaryLayer {
    /// No boundary layer.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            width: 0.0,
            intervals: 0,
            bias: 1.0,
        }
    }

    /// A boundary layer of the given width and interval count.
    #[must_use]
    pub const fn new(width: f64, intervals: u32) -> Self {
        Self {
            width,
            intervals,
            bias: 1.0,
        }
    }

    /// Set the growth factor.
    #[must_use]
    pub const fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Whether this layer is absent.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.intervals == 0
    }

    /// Check that width and interval count agree.
    ///
    /// # Errors
    ///
    /// Returns an error if the width is zero with intervals, non-zero
    /// without, or the bias is not positive.
    pub fn validate(&self) -> PolygonResult<()> {
        if self.bias.is_nan() || self.bias <= 0.0 {
            return Err(PolygonError::InvalidBias(self.bias));
        }
        if (self.width > 0.0) != (self.intervals > 0) || self.width < 0.0 {
            return Err(PolygonError::InconsistentBoundaryLayer {
                width: self.width,
                intervals: self.intervals,
            });
        }
        Ok(())
    }
}

/// Relative interval sizes for `intervals` intervals growing by `bias`.
///
/// The sizes sum to one. A bias of one gives uniform intervals.
///
/// # Example
///
/// ```
/// use mesh_polygon::bias_terms;
///
/// let t = bias_terms(2.0, 3);
/// assert!((t[0] - 1.0 / 7.0).abs() < 1e-12);
/// assert!((t[2] - 4.0 / 7.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn bias_terms(bias: f64, intervals: u32) -> Vec<f64> {
    let n = f64::from(intervals);
    if intervals == 0 {
        return Vec::new();
    }
    if (bias - 1.0).abs() < f64::EPSILON {
        return vec![1.0 / n; intervals as usize];
    }
    let denominator = 1.0 - bias.powf(n);
    (0..intervals)
        .map(|i| bias.powf(f64::from(i)) * (1.0 - bias) / denominator)
        .collect()
}

/// Radial fractions of the node rows inside one region.
///
/// Returns one fraction per row after the region's inner face, in `(0, 1]`
/// and strictly increasing; the last is exactly one. The total row count is
/// `inner.intervals + intervals + outer.intervals`.
///
/// Layer widths are converted to fractions of `region_width`.
///
/// # Errors
///
/// Returns [`PolygonError::BoundaryLayerTooThick`] if the two layers do not
/// leave room for the main layer.
pub fn region_fractions(
    region: &'static str,
    index: usize,
    region_width: f64,
    intervals: u32,
    bias: f64,
    inner: &BoundaryLayer,
    outer: &BoundaryLayer,
) -> PolygonResult<Vec<f64>> {
    let inner_fraction = if inner.is_none() { 0.0 } else { inner.width / region_width };
    let outer_fraction = if outer.is_none() { 0.0 } else { outer.width / region_width };
    let fraction = inner_fraction + outer_fraction;
    if fraction >= 1.0 {
        return Err(PolygonError::BoundaryLayerTooThick {
            region,
            index,
            fraction,
        });
    }

    let mut sizes: Vec<f64> = Vec::new();
    sizes.extend(bias_terms(inner.bias, inner.intervals).iter().map(|t| t * inner_fraction));
    sizes.extend(
        bias_terms(bias, intervals)
            .iter()
            .map(|t| t * (1.0 - fraction)),
    );
    // the outer layer is graded inward from the outer face
    let mut outer_sizes: Vec<f64> = bias_terms(1.0 / outer.bias, outer.intervals)
        .iter()
        .map(|t| t * outer_fraction)
        .collect();
    outer_sizes.reverse();
    sizes.extend(outer_sizes);

    let mut acc = 0.0;
    let mut rows: Vec<f64> = sizes
        .iter()
        .map(|s| {
            acc += s;
            acc
        })
        .collect();
    if let Some(last) = rows.last_mut() {
        *last = 1.0;
    }
    Ok(rows)
}
