//! Parameters for polygon unit-cell meshes.

use std::collections::BTreeMap;

use mesh_types::{BoundaryId, SizeStyle, SubdomainId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::corrector::ElementOrder;
use crate::error::{PolygonError, PolygonResult};
use crate::spacing::BoundaryLayer;

/// One concentric ring or duct region.
///
/// `size` is the outer radius of a ring, or the inner size of a duct
/// (apothem or corner distance, per [`RingParams::duct_size_style`]).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionSpec {
    /// Radius (rings) or size (ducts).
    pub size: f64,
    /// Radial intervals of the main layer.
    pub intervals: u32,
    /// Growth factor of the main layer.
    pub bias: f64,
    /// Boundary layer at the inner face.
    pub inner_layer: BoundaryLayer,
    /// Boundary layer at the outer face.
    pub outer_layer: BoundaryLayer,
}

impl RegionSpec {
    /// A region with uniform spacing and no boundary layers.
    #[must_use]
    pub const fn new(size: f64, intervals: u32) -> Self {
        Self {
            size,
            intervals,
            bias: 1.0,
            inner_layer: BoundaryLayer::none(),
            outer_layer: BoundaryLayer::none(),
        }
    }

    /// Set the growth factor of the main layer.
    #[must_use]
    pub const fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Set the inner boundary layer.
    #[must_use]
    pub const fn with_inner_layer(mut self, layer: BoundaryLayer) -> Self {
        self.inner_layer = layer;
        self
    }

    /// Set the outer boundary layer.
    #[must_use]
    pub const fn with_outer_layer(mut self, layer: BoundaryLayer) -> Self {
        self.outer_layer = layer;
        self
    }

    /// Total radial intervals including boundary layers.
    #[must_use]
    pub const fn total_intervals(&self) -> u32 {
        self.inner_layer.intervals + self.intervals + self.outer_layer.intervals
    }

    fn validate(&self, region: &'static str, index: usize) -> PolygonResult<()> {
        if self.intervals == 0 {
            return Err(PolygonError::ZeroIntervals { region, index });
        }
        if self.bias.is_nan() || self.bias <= 0.0 {
            return Err(PolygonError::InvalidBias(self.bias));
        }
        self.inner_layer.validate()?;
        self.outer_layer.validate()
    }
}

/// The transition region between the last ring and the polygon edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BackgroundSpec {
    /// Radial intervals of the main layer.
    pub intervals: u32,
    /// Growth factor of the main layer.
    pub bias: f64,
    /// Boundary layer at the inner face.
    pub inner_layer: BoundaryLayer,
    /// Boundary layer at the outer face.
    pub outer_layer: BoundaryLayer,
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BackgroundSpec {
    /// A uniform background with `intervals` radial intervals.
    #[must_use]
    pub const fn new(intervals: u32) -> Self {
        Self {
            intervals,
            bias: 1.0,
            inner_layer: BoundaryLayer::none(),
            outer_layer: BoundaryLayer::none(),
        }
    }

    /// Total radial intervals including boundary layers.
    #[must_use]
    pub const fn total_intervals(&self) -> u32 {
        self.inner_layer.intervals + self.intervals + self.outer_layer.intervals
    }
}

/// How the centre of the polygon is meshed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CenterPatch {
    /// A fan of triangles around the centre node.
    #[default]
    Triangles,
    /// A structured patch of quadrilaterals.
    Quads {
        /// Patch size relative to the first node row, `(a/2)/(a/2+1)` when `None`.
        factor: Option<f64>,
    },
}

/// Interface boundaries between radial regions.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceBoundaries {
    /// Tag the outer face of each inner region (`2m + 1 + shift`).
    pub outward: bool,
    /// Tag the inner face of each outer region (`2m + 2 + shift`).
    pub inward: bool,
    /// Offset added to every interface id.
    pub id_shift: BoundaryId,
    /// Optional names, one per interface, for outward ids.
    pub outward_names: Vec<String>,
    /// Optional names, one per interface, for inward ids.
    pub inward_names: Vec<String>,
}

impl InterfaceBoundaries {
    /// Whether any interface is tagged.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.outward || self.inward
    }
}

/// Parameters for a polygon unit cell with concentric rings.
///
/// # Example
///
/// ```
/// use mesh_polygon::{RegionSpec, RingParams};
///
/// let params = RingParams::hexagon(1.0, 2)
///     .with_ring(RegionSpec::new(0.5, 2))
///     .with_preserve_volumes(true);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RingParams {
    /// Number of polygon sides.
    pub num_sides: u32,
    /// Polygon size, measured per `size_style`.
    pub polygon_size: f64,
    /// How `polygon_size` is measured.
    pub size_style: SizeStyle,
    /// Azimuthal sectors on each side.
    pub num_sectors_per_side: Vec<u32>,
    /// Rings, innermost first.
    pub rings: Vec<RegionSpec>,
    /// Background region.
    pub background: BackgroundSpec,
    /// Ducts, innermost first.
    pub ducts: Vec<RegionSpec>,
    /// How duct sizes (and duct layer widths) are measured.
    pub duct_size_style: SizeStyle,
    /// Scale ring radii so polygonized rings keep the area of the circles.
    pub preserve_volumes: bool,
    /// Meshing of the centre.
    pub center: CenterPatch,
    /// Custom azimuthal node distribution per side, as tangent positions
    /// from 0 to 2 (one more than the side's sector count).
    pub side_tangents: BTreeMap<u32, Vec<f64>>,
    /// Move outer-edge nodes to uniform positions along each side.
    pub uniform_mesh_on_sides: bool,
    /// Laplacian smoothing iterations.
    pub smoothing_iterations: u32,
    /// Element order of the output.
    pub order: ElementOrder,
    /// Use nine-node quadrilaterals for second order.
    pub quad9: bool,
    /// Custom block ids, one per generated block.
    pub block_ids: Vec<SubdomainId>,
    /// Block names, one per generated block.
    pub block_names: Vec<String>,
    /// Replacement id for the external boundary.
    pub external_boundary_id: Option<BoundaryId>,
    /// Name of the external boundary.
    pub external_boundary_name: Option<String>,
    /// Keep per-side external boundary ids.
    pub create_side_boundaries: bool,
    /// Interface boundaries between regions.
    pub interfaces: InterfaceBoundaries,
    /// Rotate so a flat side faces +y.
    pub flat_side_up: bool,
    /// Mark the cell as a control drum.
    pub is_control_drum: bool,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            num_sides: 6,
            polygon_size: 1.0,
            size_style: SizeStyle::Apothem,
            num_sectors_per_side: vec![2; 6],
            rings: Vec::new(),
            background: BackgroundSpec::default(),
            ducts: Vec::new(),
            duct_size_style: SizeStyle::Apothem,
            preserve_volumes: true,
            center: CenterPatch::Triangles,
            side_tangents: BTreeMap::new(),
            uniform_mesh_on_sides: false,
            smoothing_iterations: 0,
            order: ElementOrder::First,
            quad9: false,
            block_ids: Vec::new(),
            block_names: Vec::new(),
            external_boundary_id: None,
            external_boundary_name: None,
            create_side_boundaries: false,
            interfaces: InterfaceBoundaries::default(),
            flat_side_up: false,
            is_control_drum: false,
        }
    }
}

impl RingParams {
    /// Creates default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A regular polygon with the same sector count on every side.
    ///
    /// # Arguments
    ///
    /// * `num_sides` - Number of polygon sides
    /// * `apothem` - Centre-to-flat distance
    /// * `sectors` - Azimuthal sectors per side
    #[must_use]
    pub fn polygon(num_sides: u32, apothem: f64, sectors: u32) -> Self {
        Self {
            num_sides,
            polygon_size: apothem,
            num_sectors_per_side: vec![sectors; num_sides as usize],
            ..Self::default()
        }
    }

    /// A hexagonal cell, corner up.
    #[must_use]
    pub fn hexagon(apothem: f64, sectors: u32) -> Self {
        Self::polygon(6, apothem, sectors)
    }

    /// A square cell with sides parallel to the axes.
    #[must_use]
    pub fn square(apothem: f64, sectors: u32) -> Self {
        Self {
            flat_side_up: true,
            ..Self::polygon(4, apothem, sectors)
        }
    }

    /// Append a ring.
    #[must_use]
    pub fn with_ring(mut self, ring: RegionSpec) -> Self {
        self.rings.push(ring);
        self
    }

    /// Append a duct.
    #[must_use]
    pub fn with_duct(mut self, duct: RegionSpec) -> Self {
        self.ducts.push(duct);
        self
    }

    /// Set the background region.
    #[must_use]
    pub fn with_background(mut self, background: BackgroundSpec) -> Self {
        self.background = background;
        self
    }

    /// Enable or disable area preservation of the rings.
    #[must_use]
    pub fn with_preserve_volumes(mut self, preserve: bool) -> Self {
        self.preserve_volumes = preserve;
        self
    }

    /// Set the centre patch.
    #[must_use]
    pub fn with_center(mut self, center: CenterPatch) -> Self {
        self.center = center;
        self
    }

    /// Set the output element order.
    #[must_use]
    pub fn with_order(mut self, order: ElementOrder, quad9: bool) -> Self {
        self.order = order;
        self.quad9 = quad9;
        self
    }

    /// Set custom block ids and names.
    #[must_use]
    pub fn with_blocks(mut self, ids: Vec<SubdomainId>, names: Vec<String>) -> Self {
        self.block_ids = ids;
        self.block_names = names;
        self
    }

    /// Override the external boundary id and name.
    #[must_use]
    pub fn with_external_boundary(mut self, id: BoundaryId, name: Option<String>) -> Self {
        self.external_boundary_id = Some(id);
        self.external_boundary_name = name;
        self
    }

    /// Set the smoothing iteration count.
    #[must_use]
    pub fn with_smoothing(mut self, iterations: u32) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Set a custom tangent distribution on one side.
    #[must_use]
    pub fn with_side_tangents(mut self, side: u32, tangents: Vec<f64>) -> Self {
        self.side_tangents.insert(side, tangents);
        self
    }

    /// Mark the cell as a control drum.
    #[must_use]
    pub fn with_control_drum(mut self, is_drum: bool) -> Self {
        self.is_control_drum = is_drum;
        self
    }

    /// Centre-to-flat distance of the polygon.
    #[must_use]
    pub fn apothem(&self) -> f64 {
        self.size_style.to_apothem(self.polygon_size, self.num_sides)
    }

    /// Duct apothems, innermost first.
    #[must_use]
    pub fn duct_apothems(&self) -> Vec<f64> {
        self.ducts
            .iter()
            .map(|d| self.duct_size_style.to_apothem(d.size, self.num_sides))
            .collect()
    }

    /// Check every parameter that can be checked without geometry.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn validate(&self) -> PolygonResult<()> {
        if self.num_sides < 3 {
            return Err(PolygonError::InvalidSideCount(self.num_sides));
        }
        if self.polygon_size.is_nan() || self.polygon_size <= 0.0 {
            return Err(PolygonError::InvalidSize(self.polygon_size));
        }
        if self.num_sectors_per_side.len() != self.num_sides as usize {
            return Err(PolygonError::SectorCountLength {
                expected: self.num_sides as usize,
                actual: self.num_sectors_per_side.len(),
            });
        }
        for (side, &sectors) in self.num_sectors_per_side.iter().enumerate() {
            if sectors == 0 {
                return Err(PolygonError::ZeroSectors { side });
            }
            if matches!(self.center, CenterPatch::Quads { .. }) && sectors % 2 != 0 {
                return Err(PolygonError::OddSectorsForQuadCenter { side, sectors });
            }
        }
        if let CenterPatch::Quads { factor: Some(f) } = self.center {
            if f.is_nan() || f <= 0.0 || f >= 1.0 {
                return Err(PolygonError::InvalidCenterQuadFactor(f));
            }
        }
        check_ascending("ring", &self.rings.iter().map(|r| r.size).collect::<Vec<_>>())?;
        check_ascending("duct", &self.ducts.iter().map(|d| d.size).collect::<Vec<_>>())?;
        for (i, ring) in self.rings.iter().enumerate() {
            ring.validate("ring", i)?;
        }
        for (i, duct) in self.ducts.iter().enumerate() {
            duct.validate("duct", i)?;
        }
        if self.background.intervals == 0 {
            return Err(PolygonError::ZeroIntervals {
                region: "background",
                index: 0,
            });
        }
        if self.background.bias.is_nan() || self.background.bias <= 0.0 {
            return Err(PolygonError::InvalidBias(self.background.bias));
        }
        self.background.inner_layer.validate()?;
        self.background.outer_layer.validate()?;
        for (&side, tangents) in &self.side_tangents {
            let sectors = self
                .num_sectors_per_side
                .get(side as usize)
                .copied()
                .ok_or(PolygonError::InvalidTangents {
                    side: side as usize,
                    expected: 0,
                })?;
            let expected = sectors as usize + 1;
            let ascending = tangents.windows(2).all(|w| w[1] > w[0]);
            let ends = tangents.first() == Some(&0.0) && tangents.last() == Some(&2.0);
            if tangents.len() != expected || !ascending || !ends {
                return Err(PolygonError::InvalidTangents {
                    side: side as usize,
                    expected,
                });
            }
        }
        let interfaces = self.rings.len() + self.ducts.len();
        for names in [&self.interfaces.outward_names, &self.interfaces.inward_names] {
            if !names.is_empty() && names.len() != interfaces {
                return Err(PolygonError::InterfaceNameLength {
                    expected: interfaces,
                    actual: names.len(),
                });
            }
        }
        Ok(())
    }
}

fn check_ascending(region: &'static str, sizes: &[f64]) -> PolygonResult<()> {
    let positive = sizes.iter().all(|&s| s > 0.0);
    let ascending = sizes.windows(2).all(|w| w[1] > w[0]);
    if positive && ascending {
        Ok(())
    } else {
        Err(PolygonError::NonAscendingSizes {
            region,
            sizes: sizes.to_vec(),
        })
    }
}
