//! Radial layout of the node rows of a polygon cell.
//!
//! Every slice of a polygon shares the same rows. A row is either a circle
//! (ring regions), a blend from the last circle to a scaled copy of the
//! polygon edge (background), or a scaled copy of the polygon edge (ducts).

use mesh_types::{Point2, SubdomainId};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PolygonError, PolygonResult};
use crate::params::RingParams;
use crate::spacing::{region_fractions, BoundaryLayer};

/// Shape of one node row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RowShape {
    /// A circle of the given radius.
    Circle {
        /// Row radius.
        radius: f64,
    },
    /// Linear blend between a circle and a scaled polygon edge.
    Blend {
        /// Radius of the circle at fraction 0.
        inner_radius: f64,
        /// Scale of the polygon edge at fraction 1.
        outer_scale: f64,
        /// Position of the row between the two.
        fraction: f64,
    },
    /// The polygon edge scaled about the centre.
    Polygon {
        /// Scale relative to the polygon edge.
        scale: f64,
    },
}

impl RowShape {
    /// Node position in direction `dir` (unit) whose polygon edge point is `edge`.
    #[must_use]
    pub fn position(&self, edge: &Point2<f64>) -> Point2<f64> {
        let dir = edge.coords.normalize();
        match *self {
            Self::Circle { radius } => Point2::from(dir * radius),
            Self::Blend {
                inner_radius,
                outer_scale,
                fraction,
            } => Point2::from(dir * inner_radius * (1.0 - fraction) + edge.coords * outer_scale * fraction),
            Self::Polygon { scale } => Point2::from(edge.coords * scale),
        }
    }

    /// Whether the row is a circle.
    #[must_use]
    pub const fn is_circle(&self) -> bool {
        matches!(self, Self::Circle { .. })
    }
}

/// Node rows, region bookkeeping and positional block ids of a cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadialLayout {
    /// Node rows from the centre outward.
    pub rows: Vec<RowShape>,
    /// Region index of each row.
    pub row_regions: Vec<usize>,
    /// Index of the last row of each region.
    pub region_ends: Vec<usize>,
    /// Positional block id of each element layer (layer `i` ends at row `i`).
    pub layer_blocks: Vec<SubdomainId>,
    /// Number of positional block ids.
    pub block_count: usize,
    /// Largest ring radius after correction, 0 without rings.
    pub max_radius: f64,
}

impl RadialLayout {
    /// Lay out the rows of a cell.
    ///
    /// `factor` scales every ring radius (the area correction, or 1).
    /// Positional block ids start at `shift + 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the corrected rings reach the polygon edge, a duct
    /// lies inside the rings or reaches the edge, or boundary layers are too
    /// thick for their region.
    pub fn new(params: &RingParams, factor: f64, shift: SubdomainId) -> PolygonResult<Self> {
        let apothem = params.apothem();
        let n = params.num_sides;
        let radii: Vec<f64> = params.rings.iter().map(|r| r.size * factor).collect();
        let max_radius = radii.last().copied().unwrap_or(0.0);
        if max_radius >= apothem {
            return Err(PolygonError::RingTooLarge {
                radius: max_radius,
                apothem,
            });
        }
        let ducts = params.duct_apothems();
        if let Some(&first) = ducts.first() {
            if first <= max_radius {
                return Err(PolygonError::DuctInsideRing {
                    duct: first,
                    ring: max_radius,
                });
            }
        }
        if let Some(&last) = ducts.last() {
            if last >= apothem {
                return Err(PolygonError::DuctTooLarge {
                    duct: last,
                    apothem,
                });
            }
        }

        let mut rows = Vec::new();
        let mut row_regions = Vec::new();
        let mut region_ends = Vec::new();
        let mut region = 0;

        let mut inner = 0.0;
        for (i, (ring, &radius)) in params.rings.iter().zip(&radii).enumerate() {
            let width = radius - inner;
            for f in region_fractions(
                "ring",
                i,
                width,
                ring.intervals,
                ring.bias,
                &ring.inner_layer,
                &ring.outer_layer,
            )? {
                rows.push(RowShape::Circle {
                    radius: inner + f * width,
                });
                row_regions.push(region);
            }
            region_ends.push(rows.len() - 1);
            region += 1;
            inner = radius;
        }

        let background_outer = ducts.first().copied().unwrap_or(apothem);
        let background = &params.background;
        for f in region_fractions(
            "background",
            0,
            background_outer - max_radius,
            background.intervals,
            background.bias,
            &background.inner_layer,
            &background.outer_layer,
        )? {
            rows.push(RowShape::Blend {
                inner_radius: max_radius,
                outer_scale: background_outer / apothem,
                fraction: f,
            });
            row_regions.push(region);
        }
        region_ends.push(rows.len() - 1);
        region += 1;

        for (i, duct) in params.ducts.iter().enumerate() {
            let from = ducts[i];
            let to = ducts.get(i + 1).copied().unwrap_or(apothem);
            let style = params.duct_size_style;
            let inner_layer = BoundaryLayer {
                width: style.to_apothem(duct.inner_layer.width, n),
                ..duct.inner_layer
            };
            let outer_layer = BoundaryLayer {
                width: style.to_apothem(duct.outer_layer.width, n),
                ..duct.outer_layer
            };
            for f in region_fractions(
                "duct",
                i,
                to - from,
                duct.intervals,
                duct.bias,
                &inner_layer,
                &outer_layer,
            )? {
                rows.push(RowShape::Polygon {
                    scale: (from + f * (to - from)) / apothem,
                });
                row_regions.push(region);
            }
            region_ends.push(rows.len() - 1);
            region += 1;
        }

        let mut layer_blocks = vec![shift + 1];
        let mut next = shift + 2;
        let mut open_region = None;
        let mut open_id = shift + 1;
        for &r in &row_regions[1..] {
            if open_region != Some(r) {
                open_region = Some(r);
                open_id = next;
                next += 1;
            }
            layer_blocks.push(open_id);
        }
        let block_count = (next - shift - 1) as usize;

        debug!(
            rows = rows.len(),
            regions = region_ends.len(),
            blocks = block_count,
            max_radius,
            "laid out radial rows"
        );
        Ok(Self {
            rows,
            row_regions,
            region_ends,
            layer_blocks,
            block_count,
            max_radius,
        })
    }

    /// Radii of all circular rows.
    #[must_use]
    pub fn circle_radii(&self) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| match r {
                RowShape::Circle { radius } => Some(*radius),
                _ => None,
            })
            .collect()
    }

    /// Number of region interfaces.
    #[must_use]
    pub fn interface_count(&self) -> usize {
        self.region_ends.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BackgroundSpec, RegionSpec};
    use approx::assert_relative_eq;

    #[test]
    fn one_ring_two_intervals() {
        let params = RingParams::hexagon(1.0, 2).with_ring(RegionSpec::new(0.5, 2));
        let layout = RadialLayout::new(&params, 1.0, 0).unwrap();
        assert_eq!(layout.rows.len(), 3);
        assert_eq!(layout.circle_radii(), vec![0.25, 0.5]);
        assert_eq!(layout.layer_blocks, vec![1, 2, 3]);
        assert_eq!(layout.block_count, 3);
        assert_eq!(layout.region_ends, vec![1, 2]);
        assert_eq!(layout.interface_count(), 1);
    }

    #[test]
    fn single_interval_ring_has_no_second_block() {
        let params = RingParams::hexagon(1.0, 2)
            .with_ring(RegionSpec::new(0.3, 1))
            .with_ring(RegionSpec::new(0.6, 2))
            .with_background(BackgroundSpec::new(2))
            .with_duct(RegionSpec::new(0.8, 1));
        let layout = RadialLayout::new(&params, 1.0, 10).unwrap();
        assert_eq!(layout.layer_blocks, vec![11, 12, 12, 13, 13, 14]);
        assert_eq!(layout.block_count, 4);
    }

    #[test]
    fn background_only() {
        let params = RingParams::hexagon(1.0, 2).with_background(BackgroundSpec::new(3));
        let layout = RadialLayout::new(&params, 1.0, 0).unwrap();
        assert_eq!(layout.layer_blocks, vec![1, 2, 2]);
        let edge = Point2::new(0.0, 2.0 / 3.0_f64.sqrt());
        let p = layout.rows[0].position(&edge);
        assert_relative_eq!(p.y, edge.y / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn geometry_errors() {
        let big = RingParams::hexagon(1.0, 2).with_ring(RegionSpec::new(0.9, 1));
        assert!(matches!(
            RadialLayout::new(&big, 1.2, 0),
            Err(PolygonError::RingTooLarge { .. })
        ));
        let inside = RingParams::hexagon(1.0, 2)
            .with_ring(RegionSpec::new(0.5, 1))
            .with_duct(RegionSpec::new(0.4, 1));
        assert!(matches!(
            RadialLayout::new(&inside, 1.0, 0),
            Err(PolygonError::DuctInsideRing { .. })
        ));
        let thick = RingParams::hexagon(1.0, 2).with_ring(
            RegionSpec::new(0.5, 1).with_inner_layer(BoundaryLayer::new(0.6, 1)),
        );
        assert!(matches!(
            RadialLayout::new(&thick, 1.0, 0),
            Err(PolygonError::BoundaryLayerTooThick { .. })
        ));
    }
}
