//! Benchmarks for the per-scroll hot paths: visible-window math, page
//! planning and cache row lookup.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use futures::executor::LocalPool;
use vortex_table::data::{FetchPolicy, PageCache};
use vortex_table::layout::{ColumnLayout, Viewport};
use vortex_table::{Column, InMemoryLoader, Row};

fn bench_visible_window(c: &mut Criterion) {
    let viewport = Viewport::new(1200.0, 560.0);
    let columns = ColumnLayout::new(
        (0..200)
            .map(|i| Column::new(&format!("c{i}"), 80.0 + f64::from(i % 7) * 10.0))
            .collect(),
    );

    c.bench_function("visible_rows_10m", |b| {
        b.iter(|| viewport.visible_rows(black_box(123_456_789.0), 35.0, 10_000_000))
    });
    c.bench_function("visible_cols_200", |b| {
        b.iter(|| viewport.visible_cols(black_box(9_000.0), &columns))
    });
}

fn bench_page_planning(c: &mut Criterion) {
    let viewport = Viewport::new(1200.0, 560.0);
    let mut group = c.benchmark_group("pages_for");
    for total in [10_000usize, 1_000_000, 100_000_000] {
        let visible = viewport
            .visible_rows(35.0 * (total / 2) as f64, 35.0, total)
            .expect("window");
        group.bench_with_input(BenchmarkId::from_parameter(total), &visible, |b, visible| {
            b.iter(|| FetchPolicy::default().pages_for(black_box(*visible), 10, 100, total))
        });
    }
    group.finish();
}

fn bench_row_lookup(c: &mut Criterion) {
    let total = 100_000;
    let rows: Vec<Row> = (0..total)
        .map(|i| Row::new(i64::try_from(i).unwrap(), i).with("name", "x"))
        .collect();
    let mut pool = LocalPool::new();
    let cache = PageCache::new(InMemoryLoader::new(rows), Rc::new(pool.spawner()), 100);
    cache.set_total_rows(total);
    cache.ensure_range(0, total - 1);
    pool.run_until_stalled();

    c.bench_function("get_row_resident", |b| {
        b.iter(|| cache.get_row(black_box(54_321)))
    });
    c.bench_function("get_row_absent", |b| {
        b.iter(|| cache.get_row(black_box(total + 5)))
    });
}

criterion_group!(benches, bench_visible_window, bench_page_planning, bench_row_lookup);
criterion_main!(benches);
