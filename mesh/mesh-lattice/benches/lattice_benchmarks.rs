//! Benchmarks for lattice stitching.
//!
//! Run with: cargo bench -p mesh-lattice

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mesh_lattice::{hex_row_length, stitch_lattice, LatticeParams, PeripheralSpec};
use mesh_polygon::{assemble_polygon, RegionSpec, RingParams};

fn hex_pattern(rows: usize) -> Vec<Vec<usize>> {
    (0..rows).map(|r| vec![0; hex_row_length(rows, r)]).collect()
}

// =============================================================================
// Stitching Benchmarks
// =============================================================================

fn bench_hex_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("HexLattice");
    group.sample_size(10);

    let pin = assemble_polygon(&RingParams::hexagon(0.5, 2).with_ring(RegionSpec::new(0.3, 2)))
        .unwrap();
    let inputs = vec![pin];
    for rows in [3_usize, 5, 9] {
        let bare = LatticeParams::hexagonal(hex_pattern(rows));
        group.bench_with_input(BenchmarkId::new("bare", rows), &bare, |b, params| {
            b.iter(|| stitch_lattice(black_box(&inputs), black_box(params)));
        });

        let rim = (3.0 * (rows / 2) as f64 + 2.0) / 3.0_f64.sqrt();
        let wrapped = LatticeParams::hexagonal(hex_pattern(rows))
            .with_peripheral(PeripheralSpec::new(rim + 0.4, 2))
            .with_uniform_sides(true);
        group.bench_with_input(BenchmarkId::new("peripheral", rows), &wrapped, |b, params| {
            b.iter(|| stitch_lattice(black_box(&inputs), black_box(params)));
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_hex_lattice);
criterion_main!(benches);
