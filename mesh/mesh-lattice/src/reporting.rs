//! Reporting ids: per-element integers grouping the elements of a lattice
//! by cell.

use std::ops::Range;

use mesh_types::{FeMesh, INVALID_ID, PERIPHERAL_ID_SHIFT};
use tracing::{debug, warn};

use crate::params::{ReportingIdSpec, ReportingPolicy};

/// Elements contributed by one lattice cell.
///
/// `cell` covers the unit mesh itself and `periphery` the peripheral strips
/// wrapped around it, which directly follow the cell elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellElements {
    /// Pattern row.
    pub row: usize,
    /// Pattern column.
    pub col: usize,
    /// Input mesh index.
    pub input: usize,
    /// Elements of the unit mesh.
    pub cell: Range<usize>,
    /// Elements of the peripheral strips.
    pub periphery: Range<usize>,
}

/// Id of each cell under `spec`, in the order of `cells`.
#[must_use]
pub fn cell_reporting_ids(cells: &[CellElements], spec: &ReportingIdSpec) -> Vec<u32> {
    let mut next = 0_u32;
    cells
        .iter()
        .map(|c| {
            if spec.exclude.contains(&c.input) {
                return INVALID_ID;
            }
            match &spec.policy {
                ReportingPolicy::Cell => {
                    next += 1;
                    next - 1
                }
                #[allow(clippy::cast_possible_truncation)]
                ReportingPolicy::Pattern => c.input as u32,
                ReportingPolicy::Manual(ids) => ids[c.row][c.col],
            }
        })
        .collect()
}

/// Assign one reporting id to every element.
///
/// Cell elements and the background strips around them get the cell id.
/// Duct strips of layer `k` (1-based) get `max_cell_id + k`, so every duct
/// layer forms its own group above the cells. Returns the largest cell id.
pub fn assign_reporting_ids(mesh: &mut FeMesh, cells: &[CellElements], spec: &ReportingIdSpec) -> Option<u32> {
    let ids = cell_reporting_ids(cells, spec);
    let max_cell_id = ids.iter().copied().filter(|&id| id != INVALID_ID).max();
    let first_duct_id = max_cell_id.map_or(0, |m| m + 1);

    let (index, added) = mesh.add_extra_integer(&spec.name);
    if !added {
        warn!(name = %spec.name, "reporting id already present, overwriting");
    }
    for (cell, &id) in cells.iter().zip(&ids) {
        for e in &mut mesh.elements[cell.cell.clone()] {
            e.extra[index] = id;
        }
        for e in &mut mesh.elements[cell.periphery.clone()] {
            let layer = e.subdomain.saturating_sub(PERIPHERAL_ID_SHIFT);
            e.extra[index] = if layer == 0 { id } else { first_duct_id + layer - 1 };
        }
    }
    debug!(name = %spec.name, cells = cells.len(), ?max_cell_id, "assigned reporting ids");
    max_cell_id
}
