//! # Board Benchmarks
//!
//! Performance benchmarks for statistics and view projection.
//!
//! Run with: `cargo bench -p stakeboard-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use stakeboard_core::{Catalog, ItemId, SortKey, StakeLevel, TrackedItem, apply_view, compute_stats};
use std::hint::black_box;

/// N items cycling through every stake level.
fn create_items(size: usize) -> Vec<TrackedItem> {
    (0..size)
        .map(|i| {
            let stake = StakeLevel::ALL[i % StakeLevel::ALL.len()];
            TrackedItem::new(ItemId(i as u32), format!("Item {}", i), stake)
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_compute_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_stats");

    for size in [150, 1_000, 10_000] {
        let items = create_items(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| black_box(compute_stats(items)));
        });
    }

    group.finish();
}

fn bench_apply_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_view");
    let catalog = Catalog::builtin();
    let items: Vec<TrackedItem> = catalog
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            TrackedItem::new(e.id, e.name.clone(), StakeLevel::ALL[i % StakeLevel::ALL.len()])
        })
        .collect();

    for sort in [SortKey::Name, SortKey::Stake, SortKey::Collection] {
        group.bench_with_input(BenchmarkId::new("sort", sort.as_str()), &sort, |b, sort| {
            b.iter(|| black_box(apply_view(&items, &catalog, "", *sort)));
        });
    }
    group.bench_function("search", |b| {
        b.iter(|| black_box(apply_view(&items, &catalog, "joker", SortKey::Collection)));
    });

    group.finish();
}

criterion_group!(benches, bench_compute_stats, bench_apply_view);
criterion_main!(benches);
