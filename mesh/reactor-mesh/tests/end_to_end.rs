//! End-to-end scenarios through the whole meshing pipeline.
//!
//! Each scenario starts from parameter structs and checks the finished mesh:
//! pin cells, assemblies built from pins, control drums split into an
//! absorber wedge, and a core stitched from assemblies and drums.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::BTreeSet;
use std::f64::consts::PI;

use approx::assert_relative_eq;
use reactor_mesh::prelude::*;
use reactor_mesh::types::{SideAdjacency, CONTROL_DRUM_ID_NAME, SLICE_BEGIN, SLICE_END};

const ASSEMBLY_PITCH: f64 = 3.4;

fn hexagon_area(pitch: f64) -> f64 {
    3.0_f64.sqrt() / 2.0 * pitch * pitch
}

fn pin() -> FeMesh {
    assemble_polygon(&RingParams::hexagon(0.5, 2).with_ring(RegionSpec::new(0.3, 2))).unwrap()
}

/// Seven pins in a corner-up hexagonal assembly.
fn assembly() -> FeMesh {
    let params = LatticeParams::hexagonal(vec![vec![0, 0], vec![0, 0, 0], vec![0, 0]])
        .with_peripheral(PeripheralSpec::new(ASSEMBLY_PITCH, 2))
        .with_uniform_sides(true)
        .with_rotation(90.0);
    stitch_lattice(&[pin()], &params).unwrap()
}

/// A control drum matching the assembly outline.
fn drum(sectors: &[u32]) -> FeMesh {
    let params = RingParams {
        num_sectors_per_side: sectors.to_vec(),
        ..RingParams::hexagon(ASSEMBLY_PITCH / 2.0, 1)
            .with_ring(RegionSpec::new(1.0, 2))
            .with_control_drum(true)
    };
    assemble_polygon(&params).unwrap()
}

#[test]
fn single_hexagonal_cell() {
    let params = RingParams::hexagon(1.0, 2)
        .with_ring(RegionSpec::new(0.5, 2))
        .with_preserve_volumes(true);
    let mesh = assemble_polygon(&params).unwrap();

    assert_eq!(mesh.metadata.azimuthal_angles.len(), 12);
    let ring = mesh.subdomain_area(1) + mesh.subdomain_area(2);
    assert_relative_eq!(ring, PI * 0.25, max_relative = 0.01);
    assert_eq!(mesh.boundary.ids(), BTreeSet::from([OUTER_SIDESET_ID]));
    assert!(!mesh.boundary.has_id(SLICE_BEGIN));
    assert!(!mesh.boundary.has_id(SLICE_END));

    let adjacency = SideAdjacency::build(&mesh);
    assert_eq!(adjacency.boundary_loop_count(), 1);
    assert!(mesh.min_element_area().unwrap() > 0.0);
    assert_relative_eq!(mesh.area(), hexagon_area(2.0), max_relative = 1e-9);
}

#[test]
fn assembly_from_pins() {
    let mesh = assembly();
    assert_eq!(mesh.metadata.pitch, Some(1.0));
    assert_eq!(mesh.metadata.pattern_pitch, Some(ASSEMBLY_PITCH));
    assert_relative_eq!(mesh.area(), hexagon_area(ASSEMBLY_PITCH), max_relative = 1e-9);
    assert!(mesh.min_element_area().unwrap() > 0.0);

    let sectors = &mesh.metadata.num_sectors_per_side;
    assert_eq!(sectors.len(), 6);
    assert!(sectors.iter().all(|&s| s == sectors[0]));
}

#[test]
fn drum_with_absorber_wedge() {
    let sectors = assembly().metadata.num_sectors_per_side;
    let drum = drum(&sectors);

    let angles = &drum.metadata.azimuthal_angles;
    let start = (angles[1] + angles[2]) / 2.0;
    let end = (angles[5] + angles[6]) / 2.0;

    let params = WedgeParams::new(start, end).with_named_block(2, 20, "absorber");
    let split = split_wedge(&drum, &params).unwrap();
    assert!(split.angles.iter().any(|a| (a - start).abs() < 1e-6));
    assert!(split.angles.iter().any(|a| (a - end).abs() < 1e-6));
    assert_eq!(split.angles.len(), angles.len());

    let out = &split.mesh;
    assert_eq!(out.subdomain_id_by_name("absorber"), Some(20));
    assert!(out.min_element_area().unwrap() > 0.0);
    assert_relative_eq!(out.area(), drum.area(), max_relative = 1e-9);
    let ring = out.subdomain_area(1) + out.subdomain_area(2) + out.subdomain_area(20);
    assert_relative_eq!(ring, PI, max_relative = 1e-9);
    assert!(out.metadata.is_control_drum);
    assert!(out.metadata.azimuthal_angles.iter().any(|a| (a - start).abs() < 1e-6));
}

#[test]
fn core_of_assemblies_and_drums() {
    let fuel = assembly();
    let drum = drum(&fuel.metadata.num_sectors_per_side);
    let split = split_wedge(&drum, &WedgeParams::new(-50.0, 50.0).with_block(2, 20)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drum_positions.txt");
    let params = LatticeParams::hexagonal(vec![vec![0, 1], vec![1, 0, 0], vec![0, 0]])
        .with_core_mode(true)
        .with_positions_file(&path)
        .with_reporting_id(ReportingIdSpec::new("assembly_id", ReportingPolicy::Cell));
    let core = stitch_lattice(&[fuel, split.mesh], &params).unwrap();

    assert_relative_eq!(core.area(), 7.0 * hexagon_area(ASSEMBLY_PITCH), max_relative = 1e-9);
    assert!(core.min_element_area().unwrap() > 0.0);
    assert_eq!(SideAdjacency::build(&core).boundary_loop_count(), 1);

    // drums sorted counter-clockwise from +x: (0, 1) before (1, 0)
    let positions = &core.metadata.control_drum_positions;
    assert_eq!(positions.len(), 2);
    assert!(positions[0].y > 0.0 && positions[1].x < 0.0);
    assert_eq!(core.metadata.control_drum_azimuths.len(), 2);

    let index = core.extra_integer_index(CONTROL_DRUM_ID_NAME).unwrap();
    let ids: BTreeSet<u32> = core.elements.iter().map(|e| e.extra[index]).collect();
    assert_eq!(ids, BTreeSet::from([0, 1, 2]));

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: Vec<f64> = lines[0].split(' ').map(|v| v.parse().unwrap()).collect();
    assert_relative_eq!(first[0], positions[0].x, epsilon = 1e-12);
    assert_relative_eq!(first[1], positions[0].y, epsilon = 1e-12);
    assert_eq!(first[2], 0.0);
}

#[test]
fn cartesian_assembly_with_duct() {
    let pin = assemble_polygon(&RingParams::square(0.5, 2).with_ring(RegionSpec::new(0.35, 2))).unwrap();
    let peripheral = PeripheralSpec::new(4.0, 1)
        .with_duct(1.8, 1)
        .with_blocks(vec![50, 60], vec!["gap".into(), "duct".into()]);
    let params = LatticeParams::cartesian(vec![vec![0; 3]; 3])
        .with_peripheral(peripheral)
        .with_reporting_id(ReportingIdSpec::new("pin_id", ReportingPolicy::Cell));
    let mesh = stitch_lattice(&[pin], &params).unwrap();

    assert_relative_eq!(mesh.area(), 16.0, max_relative = 1e-9);
    assert_relative_eq!(mesh.subdomain_area(60), 16.0 - 3.6 * 3.6, max_relative = 1e-9);
    assert_eq!(mesh.subdomain_id_by_name("duct"), Some(60));

    let index = mesh.extra_integer_index("pin_id").unwrap();
    let ids: BTreeSet<u32> = mesh.elements.iter().map(|e| e.extra[index]).collect();
    // nine pins and one duct layer
    assert_eq!(ids, (0..10).collect());
}
