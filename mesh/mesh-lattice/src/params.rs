//! Lattice stitching parameters.

use std::collections::BTreeSet;
use std::path::PathBuf;

use mesh_polygon::LatticeShape;
use mesh_types::{BoundaryId, SizeStyle, SubdomainId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, LatticeResult};
use crate::pattern::validate_pattern;

/// Peripheral region that squares off the rim of a lattice.
///
/// The region is split into layers: a background layer from the cells out
/// to the first duct (or the pattern boundary), then one layer per duct.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeripheralSpec {
    /// Flat-to-flat size of the whole lattice.
    pub pattern_pitch: f64,
    /// Radial intervals of the background layer.
    pub background_intervals: u32,
    /// Inner sizes of the ducts, ascending.
    pub duct_sizes: Vec<f64>,
    /// Radial intervals of each duct.
    pub duct_intervals: Vec<u32>,
    /// How duct sizes are measured.
    pub duct_size_style: SizeStyle,
    /// Block ids of the layers; empty keeps the generated ids.
    pub block_ids: Vec<SubdomainId>,
    /// Block names of the layers; empty leaves them unnamed.
    pub block_names: Vec<String>,
}

impl PeripheralSpec {
    /// A background layer only.
    #[must_use]
    pub const fn new(pattern_pitch: f64, background_intervals: u32) -> Self {
        Self {
            pattern_pitch,
            background_intervals,
            duct_sizes: Vec::new(),
            duct_intervals: Vec::new(),
            duct_size_style: SizeStyle::Apothem,
            block_ids: Vec::new(),
            block_names: Vec::new(),
        }
    }

    /// Append a duct of the given inner size.
    #[must_use]
    pub fn with_duct(mut self, size: f64, intervals: u32) -> Self {
        self.duct_sizes.push(size);
        self.duct_intervals.push(intervals);
        self
    }

    /// Set how duct sizes are measured.
    #[must_use]
    pub fn with_duct_size_style(mut self, style: SizeStyle) -> Self {
        self.duct_size_style = style;
        self
    }

    /// Set the block ids and names of the layers.
    #[must_use]
    pub fn with_blocks(mut self, ids: Vec<SubdomainId>, names: Vec<String>) -> Self {
        self.block_ids = ids;
        self.block_names = names;
        self
    }

    /// Number of layers, background included.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.duct_sizes.len() + 1
    }

    /// Radial intervals of each layer, background first.
    #[must_use]
    pub fn layer_intervals(&self) -> Vec<u32> {
        std::iter::once(self.background_intervals)
            .chain(self.duct_intervals.iter().copied())
            .collect()
    }

    fn validate(&self) -> LatticeResult<()> {
        if self.duct_intervals.len() != self.duct_sizes.len() {
            return Err(LatticeError::DuctIntervalLength {
                expected: self.duct_sizes.len(),
                actual: self.duct_intervals.len(),
            });
        }
        if let Some(layer) = self.layer_intervals().iter().position(|&n| n == 0) {
            return Err(LatticeError::ZeroIntervals { layer });
        }
        if self.duct_sizes.windows(2).any(|w| w[1] <= w[0]) {
            return Err(LatticeError::NonAscendingDucts(self.duct_sizes.clone()));
        }
        let layers = self.layer_count();
        if !self.block_ids.is_empty() && self.block_ids.len() != layers {
            return Err(LatticeError::PeripheralBlockLength {
                what: "ids",
                expected: layers,
                actual: self.block_ids.len(),
            });
        }
        if !self.block_names.is_empty() && self.block_names.len() != layers {
            return Err(LatticeError::PeripheralBlockLength {
                what: "names",
                expected: layers,
                actual: self.block_names.len(),
            });
        }
        Ok(())
    }
}

/// Outer boundary treatment of a lattice.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PatternBoundary {
    /// The lattice keeps the jagged outline of its cells.
    #[default]
    None,
    /// The lattice is wrapped by a peripheral region.
    Peripheral(PeripheralSpec),
}

impl PatternBoundary {
    /// The peripheral region, if any.
    #[must_use]
    pub const fn peripheral(&self) -> Option<&PeripheralSpec> {
        match self {
            Self::None => None,
            Self::Peripheral(spec) => Some(spec),
        }
    }
}

/// How reporting ids are derived for the cells of a lattice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReportingPolicy {
    /// One id per cell, counting in pattern order.
    #[default]
    Cell,
    /// The input index of each cell.
    Pattern,
    /// Ids from an array shaped like the pattern.
    Manual(Vec<Vec<u32>>),
}

/// One reporting id to attach to the lattice elements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportingIdSpec {
    /// Name of the extra element integer.
    pub name: String,
    /// How ids are assigned.
    pub policy: ReportingPolicy,
    /// Inputs whose cells receive no id.
    pub exclude: BTreeSet<usize>,
}

impl ReportingIdSpec {
    /// A reporting id with no excluded inputs.
    #[must_use]
    pub fn new(name: impl Into<String>, policy: ReportingPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            exclude: BTreeSet::new(),
        }
    }

    /// Exclude the cells of an input.
    #[must_use]
    pub fn with_exclude(mut self, input: usize) -> Self {
        self.exclude.insert(input);
        self
    }
}

/// Configuration of a lattice of unit meshes.
///
/// # Examples
///
/// ```
/// use mesh_lattice::{LatticeParams, PeripheralSpec, ReportingIdSpec, ReportingPolicy};
///
/// let params = LatticeParams::hexagonal(vec![vec![0, 0], vec![0, 1, 0], vec![0, 0]])
///     .with_peripheral(PeripheralSpec::new(8.0, 2).with_duct(3.6, 1))
///     .with_reporting_id(ReportingIdSpec::new("pin_id", ReportingPolicy::Cell));
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatticeParams {
    /// Cell shape.
    pub shape: LatticeShape,
    /// Input index of every cell, row by row from the top.
    pub pattern: Vec<Vec<usize>>,
    /// Outer boundary treatment.
    pub boundary: PatternBoundary,
    /// Counter-clockwise rotation of the finished lattice, in degrees.
    pub rotation: f64,
    /// Space the outer boundary nodes evenly along each side.
    pub uniform_sides: bool,
    /// The inputs are assemblies; pitch is read from their pattern pitch
    /// and control drums are tracked.
    pub core_mode: bool,
    /// Replacement for the external boundary id.
    pub external_boundary_id: Option<BoundaryId>,
    /// Name of the external boundary.
    pub external_boundary_name: Option<String>,
    /// Reporting ids to assign.
    pub reporting_ids: Vec<ReportingIdSpec>,
    /// Where to write the control drum positions (core mode only).
    pub positions_file: Option<PathBuf>,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            shape: LatticeShape::Hexagonal,
            pattern: vec![vec![0]],
            boundary: PatternBoundary::None,
            rotation: 0.0,
            uniform_sides: false,
            core_mode: false,
            external_boundary_id: None,
            external_boundary_name: None,
            reporting_ids: Vec::new(),
            positions_file: None,
        }
    }
}

impl LatticeParams {
    /// A hexagonal lattice.
    #[must_use]
    pub fn hexagonal(pattern: Vec<Vec<usize>>) -> Self {
        Self {
            shape: LatticeShape::Hexagonal,
            pattern,
            ..Self::default()
        }
    }

    /// A Cartesian lattice.
    #[must_use]
    pub fn cartesian(pattern: Vec<Vec<usize>>) -> Self {
        Self {
            shape: LatticeShape::Cartesian,
            pattern,
            ..Self::default()
        }
    }

    /// Wrap the lattice with a peripheral region.
    #[must_use]
    pub fn with_peripheral(mut self, spec: PeripheralSpec) -> Self {
        self.boundary = PatternBoundary::Peripheral(spec);
        self
    }

    /// Rotate the finished lattice.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Space the outer boundary nodes evenly.
    #[must_use]
    pub fn with_uniform_sides(mut self, uniform: bool) -> Self {
        self.uniform_sides = uniform;
        self
    }

    /// Treat the inputs as assemblies of a core.
    #[must_use]
    pub fn with_core_mode(mut self, core: bool) -> Self {
        self.core_mode = core;
        self
    }

    /// Set the external boundary id and name.
    #[must_use]
    pub fn with_external_boundary(mut self, id: BoundaryId, name: Option<String>) -> Self {
        self.external_boundary_id = Some(id);
        self.external_boundary_name = name;
        self
    }

    /// Add a reporting id.
    #[must_use]
    pub fn with_reporting_id(mut self, spec: ReportingIdSpec) -> Self {
        self.reporting_ids.push(spec);
        self
    }

    /// Write the control drum positions to a file.
    #[must_use]
    pub fn with_positions_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.positions_file = Some(path.into());
        self
    }

    /// Number of cells in the pattern.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.pattern.iter().map(Vec::len).sum()
    }

    /// Check the parameters without looking at the inputs.
    ///
    /// # Errors
    ///
    /// Returns the first malformed pattern, peripheral or reporting id setting.
    pub fn validate(&self) -> LatticeResult<()> {
        validate_pattern(self.shape, &self.pattern)?;
        match &self.boundary {
            PatternBoundary::None => {
                if self.uniform_sides {
                    return Err(LatticeError::UniformSidesWithoutBoundary);
                }
            }
            PatternBoundary::Peripheral(spec) => {
                spec.validate()?;
                let rows = self.pattern.len();
                let required = match self.shape {
                    LatticeShape::Hexagonal => 3,
                    LatticeShape::Cartesian => 2,
                };
                if rows < required {
                    return Err(LatticeError::PatternTooSmall { rows, required });
                }
            }
        }

        let mut names = BTreeSet::new();
        for spec in &self.reporting_ids {
            if !names.insert(spec.name.as_str()) {
                return Err(LatticeError::DuplicateReportingId(spec.name.clone()));
            }
            if let ReportingPolicy::Manual(ids) = &spec.policy {
                check_manual_shape(&spec.name, ids, &self.pattern)?;
            }
        }

        if self.positions_file.is_some() && !self.core_mode {
            return Err(LatticeError::PositionsWithoutCoreMode);
        }
        Ok(())
    }
}

fn check_manual_shape(name: &str, ids: &[Vec<u32>], pattern: &[Vec<usize>]) -> LatticeResult<()> {
    if ids.len() != pattern.len() {
        return Err(LatticeError::ReportingIdShape {
            name: name.to_owned(),
            row: ids.len(),
            expected: pattern.len(),
            actual: ids.len(),
        });
    }
    for (row, (a, b)) in ids.iter().zip(pattern).enumerate() {
        if a.len() != b.len() {
            return Err(LatticeError::ReportingIdShape {
                name: name.to_owned(),
                row,
                expected: b.len(),
                actual: a.len(),
            });
        }
    }
    Ok(())
}
