//! Criterion benchmarks for the combination search.
//!
//! - explore: raw traversal over the default catalog as the order grows
//! - optimize: traversal plus selection and report assembly
//! - catalog_shape: many small sizes against a few large ones

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use packsize::core::{PackOptimizer, explore};

const DEFAULT_SIZES: [u32; 5] = [5000, 2000, 1000, 500, 250];

// =============================================================================
// Exploration Benchmarks
// =============================================================================

fn explore_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("explore");

    for order in [251_u64, 12_001, 250_000, 1_000_000].iter() {
        group.throughput(Throughput::Elements(*order));
        group.bench_with_input(BenchmarkId::new("order", order), order, |b, &order| {
            b.iter(|| explore(black_box(&DEFAULT_SIZES), black_box(order)))
        });
    }

    group.finish();
}

// =============================================================================
// Optimizer Benchmarks
// =============================================================================

fn optimize_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    let optimizer = PackOptimizer::new();

    for order in [7_321_u64, 263_000].iter() {
        group.bench_with_input(BenchmarkId::new("default_sizes", order), order, |b, &order| {
            b.iter(|| optimizer.optimize(black_box(&DEFAULT_SIZES), black_box(order)))
        });
    }

    group.bench_function("coprime_sizes", |b| {
        b.iter(|| optimizer.optimize(black_box(&[53, 31, 23]), black_box(50_000)))
    });

    group.finish();
}

// =============================================================================
// Catalog Shape Benchmarks
// =============================================================================

fn catalog_shape_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_shape");

    for count in [2_u32, 8, 32].iter() {
        let sizes: Vec<u32> = (1..=*count).rev().map(|i| i * 7 + 3).collect();
        group.bench_with_input(BenchmarkId::new("size_count", count), &sizes, |b, sizes| {
            b.iter(|| explore(black_box(sizes), black_box(10_000)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    explore_benchmarks,
    optimize_benchmarks,
    catalog_shape_benchmarks,
);

criterion_main!(benches);
