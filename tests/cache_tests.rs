//! Page cache tests
//!
//! Tests for in-flight dedup, failure handling, clearing and dataset resizing
//! against a loader whose requests resolve on demand.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::ControlledLoader;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use test_case::test_case;
use vortex_table::data::{FetchPolicy, PageCache, PageOutcome, PageStatus};
use vortex_table::layout::RowRange;

fn cache(pool: &LocalPool, loader: &ControlledLoader, total: usize) -> PageCache {
    let cache = PageCache::new(loader.clone(), Rc::new(pool.spawner()), 100);
    cache.set_total_rows(total);
    cache
}

// ============================================================================
// Dedup
// ============================================================================

#[test]
fn test_overlapping_ranges_share_one_fetch() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);

    assert_eq!(cache.ensure_range(0, 50), 1);
    assert_eq!(cache.ensure_range(10, 60), 0);
    assert_eq!(cache.ensure_range(0, 150), 1);
    assert_eq!(loader.calls(), vec![(0, 99), (100, 199)]);
    assert_eq!(cache.pending_count(), 2);

    loader.resolve_all();
    pool.run_until_stalled();
    assert_eq!(cache.pending_count(), 0);
    assert_eq!(cache.cached_row_count(), 200);

    // Resident pages are not fetched again
    assert_eq!(cache.ensure_range(0, 199), 0);
    assert_eq!(loader.call_count(), 2);
}

#[test]
fn test_joined_handles_settle_together() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);

    let first = cache.fetch_page(3).unwrap();
    let second = cache.fetch_page(3).unwrap();
    assert_eq!(loader.call_count(), 1);

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    for handle in [first, second] {
        let sink = Rc::clone(&outcomes);
        pool.spawner()
            .spawn_local(async move { sink.borrow_mut().push(handle.await) })
            .unwrap();
    }
    pool.run_until_stalled();
    assert!(outcomes.borrow().is_empty());

    loader.resolve_all();
    pool.run_until_stalled();
    assert_eq!(*outcomes.borrow(), vec![PageOutcome::Loaded, PageOutcome::Loaded]);
    assert_eq!(cache.get_row(350).unwrap().index, 350);
}

#[test]
fn test_resident_page_handle_is_ready() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);
    cache.fetch_page(0);
    loader.resolve_all();
    pool.run_until_stalled();

    let handle = cache.fetch_page(0).unwrap();
    assert_eq!(pool.run_until(handle), PageOutcome::Loaded);
    assert_eq!(loader.call_count(), 1);
}

#[test]
fn test_completions_out_of_request_order() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);
    let changed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changed);
    cache.subscribe(move |event| sink.borrow_mut().push(event.page));

    assert_eq!(cache.ensure_range(0, 199), 2);
    assert!(loader.resolve_range(100, 199));
    pool.run_until_stalled();
    assert_eq!(cache.page_state(0), PageStatus::Pending);
    assert_eq!(cache.page_state(1), PageStatus::Resident);
    assert_eq!(*changed.borrow(), vec![1]);

    assert!(loader.resolve_range(0, 99));
    pool.run_until_stalled();
    assert_eq!(cache.page_state(0), PageStatus::Resident);
    assert_eq!(*changed.borrow(), vec![1, 0]);
    assert_eq!(cache.cached_row_count(), 200);
    for index in [0, 99, 100, 199] {
        let row = cache.get_row(index).unwrap();
        assert_eq!(row.index, index);
        assert_eq!(row.text("name"), format!("row {index}"));
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_failed_page_retries_on_next_request() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);

    let handle = cache.fetch_page(1).unwrap();
    loader.reject_all("timeout");
    assert_eq!(pool.run_until(handle), PageOutcome::Failed);
    assert_eq!(cache.page_state(1), PageStatus::Failed);
    assert!(cache.get_row(150).is_none());

    assert_eq!(cache.ensure_range(150, 150), 1);
    assert_eq!(loader.calls(), vec![(100, 199), (100, 199)]);
    loader.resolve_all();
    pool.run_until_stalled();
    assert_eq!(cache.page_state(1), PageStatus::Resident);
}

#[test]
fn test_failure_does_not_notify() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);
    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    cache.subscribe(move |_| counter.set(counter.get() + 1));

    cache.fetch_page(0);
    loader.reject_all("boom");
    pool.run_until_stalled();
    assert_eq!(notified.get(), 0);

    cache.fetch_page(0);
    loader.resolve_all();
    pool.run_until_stalled();
    assert_eq!(notified.get(), 1);
}

// ============================================================================
// Clear and resize
// ============================================================================

#[test]
fn test_clear_discards_late_completion() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);

    let handle = cache.fetch_page(0).unwrap();
    cache.clear();
    assert_eq!(cache.page_state(0), PageStatus::Absent);

    loader.resolve_all();
    assert_eq!(pool.run_until(handle), PageOutcome::Discarded);
    assert_eq!(cache.page_state(0), PageStatus::Absent);
    assert_eq!(cache.cached_row_count(), 0);
}

#[test]
fn test_refetch_after_clear_wins_over_stale_fetch() {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 1000);

    let stale = cache.fetch_page(0).unwrap();
    cache.clear();
    let fresh = cache.fetch_page(0).unwrap();
    assert_eq!(loader.call_count(), 2);

    loader.resolve_all();
    assert_eq!(pool.run_until(stale), PageOutcome::Discarded);
    assert_eq!(pool.run_until(fresh), PageOutcome::Loaded);
    assert_eq!(cache.page_state(0), PageStatus::Resident);
}

#[test_case(250, 260, &[0, 1] ; "growth drops the old tail page")]
#[test_case(250, 150, &[0] ; "shrink keeps only unchanged pages")]
#[test_case(300, 400, &[0, 1, 2] ; "growth past a full tail page keeps it")]
fn test_total_rows_change_keeps_unchanged_pages(before: usize, after: usize, kept: &[usize]) {
    let mut pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, before);
    cache.ensure_range(0, before - 1);
    loader.resolve_all();
    pool.run_until_stalled();

    cache.set_total_rows(after);
    let resident: Vec<usize> = (0..3)
        .filter(|page| cache.page_state(*page) == PageStatus::Resident)
        .collect();
    assert_eq!(resident, kept);
}

#[test]
fn test_rows_beyond_total_are_never_requested() {
    let pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 250);

    assert!(cache.fetch_page(3).is_none());
    assert_eq!(cache.ensure_range(240, 10_000), 1);
    assert_eq!(loader.calls(), vec![(200, 249)]);
}

#[test]
fn test_visible_window_preloads_next_page() {
    let pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 10_000);

    let visible = RowRange { start: 100, end: 116 };
    assert_eq!(cache.ensure_visible(visible, 10, FetchPolicy::default()), 3);
    assert_eq!(loader.calls(), vec![(0, 99), (100, 199), (200, 299)]);
    assert_eq!(cache.ensure_visible(visible, 10, FetchPolicy::DirectJump), 0);
}

#[test]
fn test_preload_distance_is_measured_from_last_visible_row() {
    let pool = LocalPool::new();
    let loader = ControlledLoader::new();
    let cache = cache(&pool, &loader, 10_000);

    // Buffered edge at 160 is within 45 rows of 200; row 150 is not
    let visible = RowRange { start: 134, end: 150 };
    let policy = FetchPolicy::Preload { threshold: 45 };
    assert_eq!(cache.ensure_visible(visible, 10, policy), 1);
    assert_eq!(loader.calls(), vec![(100, 199)]);

    let visible = RowRange { start: 140, end: 156 };
    assert_eq!(cache.ensure_visible(visible, 10, policy), 1);
    assert_eq!(loader.calls().last(), Some(&(200, 299)));
}
