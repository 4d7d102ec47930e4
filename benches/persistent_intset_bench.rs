//! Benchmark for PersistentIntSet vs standard BTreeSet.
//!
//! Compares the Patricia-trie set against Rust's standard BTreeSet for
//! membership and set-algebraic operations.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use patmap::persistent::PersistentIntSet;
use std::collections::BTreeSet;

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set_insert");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("PersistentIntSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut set = PersistentIntSet::new();
                    for member in 0..size {
                        set = set.insert(black_box(member));
                    }
                    black_box(set)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut set = BTreeSet::new();
                    for member in 0..size {
                        set.insert(black_box(member));
                    }
                    black_box(set)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// contains Benchmark
// =============================================================================

fn benchmark_contains(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set_contains");

    for size in [100, 1000, 10000] {
        let persistent_set: PersistentIntSet = (0..size).collect();
        let standard_set: BTreeSet<i64> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentIntSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut hits = 0;
                    for member in 0..size * 2 {
                        if persistent_set.contains(black_box(member)) {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeSet", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut hits = 0;
                    for member in 0..size * 2 {
                        if standard_set.contains(&black_box(member)) {
                            hits += 1;
                        }
                    }
                    black_box(hits)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// union / intersection Benchmark
// =============================================================================

fn benchmark_set_algebra(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set_algebra");

    for size in [100, 1000, 10000] {
        let left: PersistentIntSet = (0..size).collect();
        let right: PersistentIntSet = (size / 2..size + size / 2).collect();
        let left_standard: BTreeSet<i64> = (0..size).collect();
        let right_standard: BTreeSet<i64> = (size / 2..size + size / 2).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentIntSet/union", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(left.union(&right)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeSet/union", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let union: BTreeSet<i64> =
                        left_standard.union(&right_standard).copied().collect();
                    black_box(union)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("PersistentIntSet/intersection", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(left.intersection(&right)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeSet/intersection", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let common: BTreeSet<i64> = left_standard
                        .intersection(&right_standard)
                        .copied()
                        .collect();
                    black_box(common)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_contains,
    benchmark_set_algebra
);
criterion_main!(benches);
