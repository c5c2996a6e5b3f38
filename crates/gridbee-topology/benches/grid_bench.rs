//! Benchmarks for the Gridbee coordination grid
//!
//! Measures performance of:
//! - Free-slot scans at varying occupancy
//! - Neighbor iteration
//! - Admission/release churn

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridbee_topology::{neighbors_of, Grid, GridCoord, GRID_COLS, GRID_SLOTS};

fn grid_with_occupancy(count: usize) -> Grid {
    let mut grid = Grid::new();
    for index in 0..count {
        let coord = GridCoord::new(index / GRID_COLS, index % GRID_COLS);
        grid.occupy(coord, format!("bee-{index}"));
    }
    grid
}

/// Benchmark the row-major free-slot scan
fn bench_find_free_slot(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_free_slot");

    for &occupancy in &[0usize, 50, GRID_SLOTS - 1] {
        let grid = grid_with_occupancy(occupancy);
        group.bench_with_input(
            BenchmarkId::from_parameter(occupancy),
            &grid,
            |b, grid| b.iter(|| black_box(grid).find_free_slot()),
        );
    }
    group.finish();
}

/// Benchmark cardinal neighbor iteration
fn bench_neighbors(c: &mut Criterion) {
    c.bench_function("neighbors_of_center", |b| {
        b.iter(|| neighbors_of(black_box(GridCoord::new(5, 5))).count())
    });

    c.bench_function("neighbors_of_corner", |b| {
        b.iter(|| neighbors_of(black_box(GridCoord::new(0, 0))).count())
    });
}

/// Benchmark a full admit/release cycle across the whole grid
fn bench_churn(c: &mut Criterion) {
    c.bench_function("fill_and_drain", |b| {
        b.iter(|| {
            let mut grid = Grid::new();
            let mut coords = Vec::with_capacity(GRID_SLOTS);
            for index in 0..GRID_SLOTS {
                coords.push(grid.reserve(format!("bee-{index}")).unwrap());
            }
            for coord in coords {
                grid.release(coord);
            }
            grid
        })
    });
}

criterion_group!(benches, bench_find_free_slot, bench_neighbors, bench_churn);
criterion_main!(benches);
