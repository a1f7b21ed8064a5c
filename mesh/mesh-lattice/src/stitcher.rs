//! Stitching unit meshes into a lattice.

use std::collections::{BTreeMap, BTreeSet};

use mesh_polygon::{
    add_peripheral_mesh, azimuth_degrees, boundary_azimuths, boundary_vertex_nodes,
    distribute_on_sides,
};
use mesh_transform::{center_on_centroid, rotate_mesh, rotate_point};
use mesh_types::{
    clear_interior_tags, fuzzy_eq, wrap_degrees, BoundaryId, FeMesh, MeshMetadata, Point2,
    SizeStyle, OUTER_SIDESET_ID, PERIPHERAL_ID_SHIFT, SLICE_ALT, TOLERANCE,
};
use tracing::{debug, info};

use crate::drums::{number_control_drums, write_positions_file, ControlDrum};
use crate::error::{LatticeError, LatticeResult};
use crate::params::{LatticeParams, PeripheralSpec};
use crate::pattern::{cell_position, outline_first_corner, peripheral_extras, rim_piece};
use crate::reporting::{assign_reporting_ids, CellElements};

/// Pitch and sector counts shared by every input.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInfo {
    /// Flat-to-flat size of one cell.
    pub pitch: f64,
    /// Sectors on each cell side.
    pub sectors: Vec<u32>,
}

/// Check that every input fits the lattice and agrees with the first one.
///
/// In core mode the pitch of an input is its pattern pitch when it has one.
///
/// # Errors
///
/// Returns an error naming the first input with missing metadata, the
/// wrong side count, or a pitch or sector count differing from input 0.
pub fn reconcile_inputs(inputs: &[FeMesh], params: &LatticeParams) -> LatticeResult<UnitInfo> {
    let sides = params.shape.num_sides();
    let mut reference: Option<UnitInfo> = None;
    for (input, mesh) in inputs.iter().enumerate() {
        let meta = &mesh.metadata;
        let pitch = if params.core_mode {
            meta.pattern_pitch.or(meta.pitch)
        } else {
            meta.pitch
        }
        .ok_or(LatticeError::MissingMetadata { input })?;
        if meta.num_sides != sides {
            return Err(LatticeError::WrongSideCount {
                input,
                expected: sides,
                actual: meta.num_sides,
            });
        }
        match &reference {
            None => {
                reference = Some(UnitInfo {
                    pitch,
                    sectors: meta.num_sectors_per_side.clone(),
                });
            }
            Some(unit) => {
                if !fuzzy_eq(unit.pitch, pitch) {
                    return Err(LatticeError::PitchMismatch {
                        input,
                        expected: unit.pitch,
                        actual: pitch,
                    });
                }
                if unit.sectors != meta.num_sectors_per_side {
                    return Err(LatticeError::SectorMismatch {
                        input,
                        expected: unit.sectors.clone(),
                        actual: meta.num_sectors_per_side.clone(),
                    });
                }
            }
        }
    }
    reference.ok_or(LatticeError::NoInputs)
}

/// Stitch a pattern of unit meshes into one lattice mesh.
///
/// Cells are placed row by row, rim cells wrapped with their peripheral
/// strips first, and stitched along [`OUTER_SIDESET_ID`]. The finished
/// lattice is centred on its area centroid, optionally given uniform side
/// spacing, rotated, and tagged with control drum and reporting ids.
///
/// # Errors
///
/// Returns an error for invalid parameters, a pattern that references a
/// missing input or leaves one unused, inputs that disagree on pitch or
/// sectors, or a failed stitch. Nothing is written on failure.
///
/// # Example
///
/// ```
/// use mesh_lattice::{stitch_lattice, LatticeParams};
/// use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};
///
/// let pin = assemble_polygon(&RingParams::hexagon(0.5, 2).with_ring(RegionSpec::new(0.3, 1))).unwrap();
/// let params = LatticeParams::hexagonal(vec![vec![0, 0], vec![0, 0, 0], vec![0, 0]]);
/// let lattice = stitch_lattice(&[pin.clone()], &params).unwrap();
/// assert_eq!(lattice.elements.len(), 7 * pin.elements.len());
/// ```
pub fn stitch_lattice(inputs: &[FeMesh], params: &LatticeParams) -> LatticeResult<FeMesh> {
    params.validate()?;
    if inputs.is_empty() {
        return Err(LatticeError::NoInputs);
    }
    check_references(inputs.len(), params)?;
    let unit = reconcile_inputs(inputs, params)?;
    let shape = params.shape;
    let peripheral = params.boundary.peripheral();

    let (extras, intervals, sectors) = match peripheral {
        Some(spec) => {
            let sectors = uniform_sectors(&unit.sectors)?;
            let extras = peripheral_extras(shape, params.pattern.len(), unit.pitch, spec)?;
            (extras, spec.layer_intervals(), sectors)
        }
        None => (Vec::new(), Vec::new(), 0),
    };

    let mut lattice: Option<FeMesh> = None;
    let mut cells: Vec<CellElements> = Vec::with_capacity(params.cell_count());
    let mut centres: Vec<Point2<f64>> = Vec::with_capacity(params.cell_count());
    for (row, entries) in params.pattern.iter().enumerate() {
        for (col, &input) in entries.iter().enumerate() {
            let mut cell = inputs[input].clone();
            let cell_len = cell.elements.len();
            if peripheral.is_some() {
                if let Some((kind, rotation)) = rim_piece(shape, &params.pattern, row, col) {
                    add_peripheral_mesh(
                        &mut cell, shape, kind, rotation, unit.pitch, sectors, &extras, &intervals,
                    )?;
                }
            }
            let centre = cell_position(shape, entries.len(), row, col, unit.pitch);
            cell.translate(centre.coords);

            let total = cell.elements.len();
            let start = lattice.as_ref().map_or(0, |m| m.elements.len());
            match lattice.as_mut() {
                None => lattice = Some(cell),
                Some(acc) => {
                    acc.stitch(cell, OUTER_SIDESET_ID, OUTER_SIDESET_ID, TOLERANCE, false)?;
                }
            }
            cells.push(CellElements {
                row,
                col,
                input,
                cell: start..start + cell_len,
                periphery: start + cell_len..start + total,
            });
            centres.push(centre);
            debug!(row, col, input, "stitched cell");
        }
    }
    let mut mesh = lattice.ok_or(LatticeError::EmptyPattern)?;

    clear_interior_tags(&mut mesh, OUTER_SIDESET_ID);
    let shift = center_on_centroid(&mut mesh)?;
    if params.uniform_sides {
        if let Some(spec) = peripheral {
            distribute_on_sides(
                &mut mesh,
                OUTER_SIDESET_ID,
                shape.num_sides(),
                outline_first_corner(shape),
                spec.pattern_pitch / 2.0,
            );
        }
    }
    rotate_mesh(&mut mesh, params.rotation);
    let centres: Vec<Point2<f64>> = centres
        .iter()
        .map(|c| rotate_point(c + shift, params.rotation))
        .collect();

    let drums = if params.core_mode {
        let drums = cells
            .iter()
            .zip(&centres)
            .filter(|(c, _)| inputs[c.input].metadata.is_control_drum)
            .map(|(c, &position)| ControlDrum {
                position,
                azimuths: rotated_azimuths(&inputs[c.input].metadata.azimuthal_angles, params.rotation),
                elements: c.cell.clone(),
            })
            .collect();
        number_control_drums(&mut mesh, drums)
    } else {
        Vec::new()
    };

    for spec in &params.reporting_ids {
        assign_reporting_ids(&mut mesh, &cells, spec);
    }

    let mut interfaces: BTreeSet<BoundaryId> = inputs
        .iter()
        .flat_map(|m| m.metadata.interface_boundary_ids.iter().copied())
        .collect();
    if let Some(spec) = peripheral {
        apply_peripheral_blocks(&mut mesh, &cells, spec)?;
        interfaces.extend(layer_interfaces(&mut mesh, spec));
    }

    let external = params.external_boundary_id.unwrap_or(OUTER_SIDESET_ID);
    if external != OUTER_SIDESET_ID {
        mesh.boundary.rename_id(OUTER_SIDESET_ID, external);
    }
    if let Some(name) = &params.external_boundary_name {
        mesh.boundary.set_name(external, name.clone());
    }

    let first_corner = outline_first_corner(shape) + params.rotation;
    mesh.metadata = MeshMetadata {
        pitch: Some(unit.pitch),
        pattern_pitch: peripheral.map(|s| s.pattern_pitch),
        size_style: SizeStyle::Apothem,
        num_sides: shape.num_sides(),
        num_sectors_per_side: if peripheral.is_some() {
            outline_sectors(&mesh, external, shape.num_sides(), first_corner)
        } else {
            Vec::new()
        },
        azimuthal_angles: boundary_azimuths(&mesh, external),
        background_intervals: peripheral.map_or(0, |s| s.background_intervals),
        max_radius: 0.0,
        quad_center_block_id: None,
        is_control_drum: false,
        control_drum_positions: drums.iter().map(|d| d.position).collect(),
        control_drum_azimuths: drums.iter().map(|d| d.azimuths.clone()).collect(),
        interface_boundary_ids: interfaces,
    };

    if let Some(path) = &params.positions_file {
        write_positions_file(path, &mesh.metadata.control_drum_positions)?;
    }

    info!(
        shape = ?shape,
        cells = cells.len(),
        nodes = mesh.nodes.len(),
        elements = mesh.elements.len(),
        drums = drums.len(),
        "stitched lattice"
    );
    Ok(mesh)
}

fn check_references(inputs: usize, params: &LatticeParams) -> LatticeResult<()> {
    for (row, entries) in params.pattern.iter().enumerate() {
        if let Some((col, &index)) = entries.iter().enumerate().find(|&(_, &i)| i >= inputs) {
            return Err(LatticeError::InputOutOfRange {
                row,
                col,
                index,
                inputs,
            });
        }
    }
    let used: BTreeSet<usize> = params.pattern.iter().flatten().copied().collect();
    if let Some(index) = (0..inputs).find(|i| !used.contains(i)) {
        return Err(LatticeError::UnusedInput { index });
    }
    for spec in &params.reporting_ids {
        if let Some(&index) = spec.exclude.iter().find(|&&i| i >= inputs) {
            return Err(LatticeError::ExcludedInputOutOfRange {
                name: spec.name.clone(),
                index,
                inputs,
            });
        }
    }
    Ok(())
}

fn uniform_sectors(sectors: &[u32]) -> LatticeResult<u32> {
    match sectors.first() {
        Some(&s) if sectors.iter().all(|&x| x == s) => Ok(s),
        _ => Err(LatticeError::NonUniformSectors(sectors.to_vec())),
    }
}

fn rotated_azimuths(angles: &[f64], rotation: f64) -> Vec<f64> {
    let mut out: Vec<f64> = angles.iter().map(|a| wrap_degrees(a + rotation)).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Move peripheral elements to the requested blocks and name them.
fn apply_peripheral_blocks(mesh: &mut FeMesh, cells: &[CellElements], spec: &PeripheralSpec) -> LatticeResult<()> {
    let generated = |layer: usize| {
        #[allow(clippy::cast_possible_truncation)]
        let layer = layer as u32;
        PERIPHERAL_ID_SHIFT + layer
    };
    if !spec.block_ids.is_empty() {
        for cell in cells {
            for e in &mut mesh.elements[cell.periphery.clone()] {
                let layer = e.subdomain.saturating_sub(PERIPHERAL_ID_SHIFT) as usize;
                if let Some(&id) = spec.block_ids.get(layer) {
                    e.subdomain = id;
                }
            }
        }
    }
    let names: BTreeMap<_, _> = spec
        .block_names
        .iter()
        .enumerate()
        .map(|(layer, name)| {
            let id = spec.block_ids.get(layer).copied().unwrap_or_else(|| generated(layer));
            (id, name.clone())
        })
        .collect();
    mesh.merge_subdomain_names(&names)?;
    Ok(())
}

/// Drop the layer tags lying on the cell rims and the outline; keep the
/// ones between layers as interfaces.
fn layer_interfaces(mesh: &mut FeMesh, spec: &PeripheralSpec) -> Vec<BoundaryId> {
    #[allow(clippy::cast_possible_truncation)]
    let layers = spec.layer_count() as BoundaryId;
    mesh.boundary.remove_id(SLICE_ALT);
    mesh.boundary.remove_id(SLICE_ALT + layers);
    (1..layers).map(|k| SLICE_ALT + k).collect()
}

/// Sectors on each side of the lattice outline.
fn outline_sectors(mesh: &FeMesh, id: BoundaryId, num_sides: u32, first_corner: f64) -> Vec<u32> {
    let sector = 360.0 / f64::from(num_sides);
    let mut counts = vec![1_u32; num_sides as usize];
    for n in boundary_vertex_nodes(mesh, id) {
        let rel = (azimuth_degrees(&mesh.nodes[n as usize]) - first_corner).rem_euclid(360.0);
        let offset = rel % sector;
        if offset < 1e-6 || sector - offset < 1e-6 {
            continue;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let side = ((rel / sector).floor() as usize).min(num_sides as usize - 1);
        counts[side] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{PatternBoundary, ReportingIdSpec, ReportingPolicy};
    use approx::assert_relative_eq;
    use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};
    use mesh_types::{SideAdjacency, INVALID_ID};

    fn pin(apothem: f64) -> FeMesh {
        assemble_polygon(&RingParams::hexagon(apothem, 2).with_ring(RegionSpec::new(0.6 * apothem, 1))).unwrap()
    }

    fn square(apothem: f64) -> FeMesh {
        assemble_polygon(&RingParams::square(apothem, 2).with_ring(RegionSpec::new(0.6 * apothem, 1))).unwrap()
    }

    fn hex3() -> Vec<Vec<usize>> {
        vec![vec![0, 0], vec![0, 0, 0], vec![0, 0]]
    }

    fn hexagon_area(pitch: f64) -> f64 {
        3.0_f64.sqrt() / 2.0 * pitch * pitch
    }

    #[test]
    fn bare_hex_lattice() {
        let cell = pin(0.5);
        let lattice = stitch_lattice(&[cell.clone()], &LatticeParams::hexagonal(hex3())).unwrap();
        assert_eq!(lattice.elements.len(), 7 * cell.elements.len());
        assert_relative_eq!(lattice.area(), 7.0 * hexagon_area(1.0), epsilon = 1e-9);
        let adj = SideAdjacency::build(&lattice);
        assert!(adj.is_manifold());
        assert_eq!(adj.boundary_loop_count(), 1);
        // only the jagged outline keeps the external tag
        assert_eq!(lattice.boundary.side_count(OUTER_SIDESET_ID), adj.boundary_sides().len());
        assert_eq!(lattice.metadata.pitch, Some(1.0));
        assert!(lattice.metadata.pattern_pitch.is_none());
    }

    #[test]
    fn centred_on_the_middle_cell() {
        let lattice = stitch_lattice(&[pin(0.5)], &LatticeParams::hexagonal(hex3())).unwrap();
        let c = mesh_transform::area_centroid(&lattice).unwrap();
        assert_relative_eq!(c.coords.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn peripheral_hex_lattice_fills_the_pattern_hexagon() {
        let pattern_pitch = 3.4;
        let params = LatticeParams::hexagonal(hex3())
            .with_peripheral(PeripheralSpec::new(pattern_pitch, 2))
            .with_uniform_sides(true);
        let lattice = stitch_lattice(&[pin(0.5)], &params).unwrap();
        assert_relative_eq!(lattice.area(), hexagon_area(pattern_pitch), epsilon = 1e-9);
        assert!(lattice.min_element_area().unwrap() > 0.0);
        let adj = SideAdjacency::build(&lattice);
        assert_eq!(adj.boundary_loop_count(), 1);
        assert_eq!(lattice.metadata.pattern_pitch, Some(pattern_pitch));
        assert_eq!(lattice.metadata.num_sectors_per_side.len(), 6);
        let s = lattice.metadata.num_sectors_per_side[0];
        assert!(lattice.metadata.num_sectors_per_side.iter().all(|&x| x == s));
        assert!(!lattice.boundary.has_id(SLICE_ALT));
        assert!(!lattice.boundary.has_id(SLICE_ALT + 1));
    }

    #[test]
    fn peripheral_cartesian_lattice_with_duct() {
        let spec = PeripheralSpec::new(7.0, 1)
            .with_duct(3.2, 1)
            .with_blocks(vec![50, 60], vec!["gap".into(), "wall".into()]);
        let params = LatticeParams::cartesian(vec![vec![0; 3]; 3]).with_peripheral(spec);
        let lattice = stitch_lattice(&[square(1.0)], &params).unwrap();
        assert_relative_eq!(lattice.area(), 49.0, epsilon = 1e-9);
        // the duct band is 0.3 wide
        assert_relative_eq!(lattice.subdomain_area(60), 49.0 - 6.4 * 6.4, epsilon = 1e-9);
        assert_eq!(lattice.subdomain_id_by_name("wall"), Some(60));
        assert!(lattice.metadata.interface_boundary_ids.contains(&(SLICE_ALT + 1)));
        assert!(lattice.boundary.has_id(SLICE_ALT + 1));
    }

    #[test]
    fn rotation_and_external_boundary() {
        let params = LatticeParams::cartesian(vec![vec![0, 0], vec![0, 0]])
            .with_rotation(30.0)
            .with_external_boundary(7, Some("rim".into()));
        let lattice = stitch_lattice(&[square(0.5)], &params).unwrap();
        assert!(!lattice.boundary.has_id(OUTER_SIDESET_ID));
        assert_eq!(lattice.boundary.side_count(7), 8 * 2);
        assert_eq!(lattice.boundary.id_by_name("rim"), Some(7));
        assert_relative_eq!(lattice.area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn mismatched_inputs_are_named() {
        let params = LatticeParams::hexagonal(vec![vec![0, 1], vec![1, 0, 1], vec![0, 0]]);
        assert!(matches!(
            stitch_lattice(&[pin(0.5), pin(0.6)], &params),
            Err(LatticeError::PitchMismatch { input: 1, .. })
        ));
        let coarse = assemble_polygon(&RingParams::hexagon(0.5, 4)).unwrap();
        assert!(matches!(
            stitch_lattice(&[pin(0.5), coarse], &params),
            Err(LatticeError::SectorMismatch { input: 1, .. })
        ));
        assert!(matches!(
            stitch_lattice(&[square(0.5)], &LatticeParams::hexagonal(hex3())),
            Err(LatticeError::WrongSideCount { input: 0, expected: 6, actual: 4 })
        ));
        assert!(matches!(
            stitch_lattice(&[pin(0.5)], &params),
            Err(LatticeError::InputOutOfRange { row: 0, col: 1, index: 1, inputs: 1 })
        ));
    }

    #[test]
    fn unused_inputs_are_rejected() {
        let params = LatticeParams::cartesian(vec![vec![0, 0], vec![0, 0]]);
        assert!(matches!(
            stitch_lattice(&[square(0.5), square(0.5)], &params),
            Err(LatticeError::UnusedInput { index: 1 })
        ));
        let params = LatticeParams::hexagonal(vec![vec![1, 1], vec![1, 1, 1], vec![1, 1]]);
        assert!(matches!(
            stitch_lattice(&[pin(0.5), pin(0.5)], &params),
            Err(LatticeError::UnusedInput { index: 0 })
        ));
    }

    #[test]
    fn reporting_ids_cover_every_element() {
        let spec = PeripheralSpec::new(3.6, 1).with_duct(1.7, 1);
        let params = LatticeParams::hexagonal(vec![vec![0, 1], vec![1, 0, 1], vec![0, 1]])
            .with_peripheral(spec)
            .with_reporting_id(ReportingIdSpec::new("cell", ReportingPolicy::Cell))
            .with_reporting_id(ReportingIdSpec::new("kind", ReportingPolicy::Pattern).with_exclude(1));
        let lattice = stitch_lattice(&[pin(0.5), pin(0.5)], &params).unwrap();
        let cell = lattice.extra_integer_index("cell").unwrap();
        let kind = lattice.extra_integer_index("kind").unwrap();
        let cell_ids: BTreeSet<u32> = lattice.elements.iter().map(|e| e.extra[cell]).collect();
        // seven cells and one duct layer
        assert_eq!(cell_ids, (0..8).collect());
        let kinds: BTreeSet<u32> = lattice.elements.iter().map(|e| e.extra[kind]).collect();
        assert!(kinds.contains(&0));
        assert!(kinds.contains(&INVALID_ID));
        assert!(kinds.contains(&1));
    }

    #[test]
    fn core_mode_numbers_drums_and_writes_positions() {
        let fuel = pin(0.5);
        let drum = assemble_polygon(
            &RingParams::hexagon(0.5, 2)
                .with_ring(RegionSpec::new(0.3, 1))
                .with_control_drum(true),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drums.txt");
        let params = LatticeParams::hexagonal(vec![vec![1, 0], vec![0, 0, 1], vec![0, 0]])
            .with_core_mode(true)
            .with_positions_file(&path);
        let core = stitch_lattice(&[fuel, drum], &params).unwrap();
        assert_eq!(core.metadata.control_drum_positions.len(), 2);
        // (1, 2) lies on the +x axis and comes first
        let first = core.metadata.control_drum_positions[0];
        assert_relative_eq!(first.y, 0.0, epsilon = 1e-9);
        assert!(first.x > 0.0);
        let index = core.extra_integer_index(mesh_types::CONTROL_DRUM_ID_NAME).unwrap();
        let ids: BTreeSet<u32> = core.elements.iter().map(|e| e.extra[index]).collect();
        assert_eq!(ids, [0, 1, 2].into_iter().collect());
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|l| l.ends_with(" 0.0")));
    }

    #[test]
    fn boundary_default_is_none() {
        assert_eq!(LatticeParams::default().boundary, PatternBoundary::None);
    }
}
