//! Wedge split parameters.

use mesh_types::{fuzzy_eq, wrap_degrees, BoundaryId, SubdomainId, OUTER_SIDESET_ID};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{WedgeError, WedgeResult};

/// Parameters of a wedge split.
///
/// Angles are in degrees, measured counter-clockwise from the mesh's +x
/// axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WedgeParams {
    /// Angle where the wedge starts.
    pub start_angle: f64,
    /// Angle where the wedge ends, counter-clockwise from the start.
    pub end_angle: f64,
    /// Blocks whose elements inside the wedge are retagged.
    pub old_block_ids: Vec<SubdomainId>,
    /// Replacement block of each old block.
    pub new_block_ids: Vec<SubdomainId>,
    /// Names of the new blocks; empty leaves them unnamed.
    pub new_block_names: Vec<String>,
    /// Rescale circles so their polygonized area is preserved.
    pub preserve_volumes: bool,
    /// External boundary of the mesh.
    pub external_boundary_id: BoundaryId,
}

impl Default for WedgeParams {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: 90.0,
            old_block_ids: Vec::new(),
            new_block_ids: Vec::new(),
            new_block_names: Vec::new(),
            preserve_volumes: true,
            external_boundary_id: OUTER_SIDESET_ID,
        }
    }
}

impl WedgeParams {
    /// A wedge from `start_angle` to `end_angle` with no block changes.
    #[must_use]
    pub fn new(start_angle: f64, end_angle: f64) -> Self {
        Self {
            start_angle,
            end_angle,
            ..Self::default()
        }
    }

    /// A wedge of `range` degrees starting at `start_angle`.
    #[must_use]
    pub fn from_range(start_angle: f64, range: f64) -> Self {
        Self::new(start_angle, start_angle + range)
    }

    /// Retag block `old` to `new` inside the wedge.
    #[must_use]
    pub fn with_block(mut self, old: SubdomainId, new: SubdomainId) -> Self {
        self.old_block_ids.push(old);
        self.new_block_ids.push(new);
        self
    }

    /// Retag block `old` to a named block `new` inside the wedge.
    #[must_use]
    pub fn with_named_block(mut self, old: SubdomainId, new: SubdomainId, name: impl Into<String>) -> Self {
        self.new_block_names.push(name.into());
        self.with_block(old, new)
    }

    /// Set whether circle areas are preserved.
    #[must_use]
    pub fn with_preserve_volumes(mut self, preserve: bool) -> Self {
        self.preserve_volumes = preserve;
        self
    }

    /// Use a different external boundary id.
    #[must_use]
    pub fn with_external_boundary(mut self, id: BoundaryId) -> Self {
        self.external_boundary_id = id;
        self
    }

    /// Start and end wrapped to `(-180, 180]`.
    #[must_use]
    pub fn wrapped_angles(&self) -> (f64, f64) {
        (wrap_degrees(self.start_angle), wrap_degrees(self.end_angle))
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-width wedge or block lists of different
    /// lengths.
    pub fn validate(&self) -> WedgeResult<()> {
        let (start, end) = self.wrapped_angles();
        if fuzzy_eq(start, end) {
            return Err(WedgeError::ZeroWidth { angle: start });
        }
        if self.old_block_ids.len() != self.new_block_ids.len() {
            return Err(WedgeError::BlockListLength {
                old: self.old_block_ids.len(),
                new: self.new_block_ids.len(),
            });
        }
        if !self.new_block_names.is_empty() && self.new_block_names.len() != self.new_block_ids.len() {
            return Err(WedgeError::BlockNameLength {
                blocks: self.new_block_ids.len(),
                names: self.new_block_names.len(),
            });
        }
        Ok(())
    }
}
