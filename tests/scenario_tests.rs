//! End-to-end scenarios
//!
//! Each test drives a headless grid the way a host would and checks the
//! loader traffic, scroll state and recorded draw calls.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use common::Harness;
use futures::task::LocalSpawnExt;
use vortex_table::data::{PageOutcome, PageStatus};
use vortex_table::render::{palette, DrawCommand, LayerKind};
use vortex_table::{GridOptions, Selection};

// ============================================================================
// Scroll into an absent page
// ============================================================================

#[test]
fn test_scrolling_to_row_100_fetches_page_1_and_shows_placeholders() {
    let mut harness = Harness::with_rows(10_000);
    harness.settle();
    assert!(harness.grid.cache().get_row(100).is_none());

    harness.grid.update_scroll_position(0.0, 3_500.0);
    assert!(harness.loader.calls().contains(&(100, 199)));
    assert_eq!(harness.grid.cache().page_state(1), PageStatus::Pending);

    harness.surfaces.reset();
    harness.tick();
    let placeholders: Vec<f64> = harness
        .surfaces
        .commands(LayerKind::Data)
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillRect { y, h, color, .. } if color == palette::PLACEHOLDER => {
                assert_eq!(*h, 35.0);
                Some(*y)
            }
            _ => None,
        })
        .collect();
    let expected: Vec<f64> = (100..=116).map(|row| f64::from(row) * 35.0).collect();
    assert_eq!(placeholders, expected);
}

// ============================================================================
// Concurrent requests for one page
// ============================================================================

#[test]
fn test_two_ensure_range_calls_before_resolution_load_once() {
    let mut harness = Harness::with_rows(0);
    harness.grid.cache().set_total_rows(1_000);

    harness.grid.cache().ensure_range(0, 50);
    harness.grid.cache().ensure_range(0, 50);
    assert_eq!(harness.loader.calls(), vec![(0, 99)]);

    harness.resolve();
    assert_eq!(harness.loader.call_count(), 1);
    assert_eq!(harness.grid.cache().cached_row_count(), 100);
}

// ============================================================================
// Jump to the last row
// ============================================================================

#[test]
fn test_scroll_to_last_index_clamps_and_waits_for_its_page() {
    let mut harness = Harness::with_rows(10_000);
    harness.settle();

    let pending = harness.grid.scroll_to_index(9_999);
    let max_y = 10_000.0 * 35.0 - 560.0;
    assert_eq!(harness.grid.scroll().scroll_y, max_y);
    assert_eq!(harness.grid.max_scroll().scroll_y, max_y);
    assert!(harness.loader.calls().contains(&(9_900, 9_999)));

    let outcome = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&outcome);
    harness
        .pool
        .spawner()
        .spawn_local(async move {
            *sink.borrow_mut() = Some(pending.await);
        })
        .unwrap();

    harness.run_tasks();
    assert_eq!(*outcome.borrow(), None);

    harness.resolve();
    assert_eq!(*outcome.borrow(), Some(PageOutcome::Loaded));
    assert_eq!(harness.grid.cache().page_state(99), PageStatus::Resident);
}

// ============================================================================
// Dataset appears after construction
// ============================================================================

#[test]
fn test_total_rows_from_zero_fetches_first_page_once() {
    let mut harness = Harness::with_rows(0);
    harness.settle();
    assert_eq!(harness.loader.call_count(), 0);

    harness.grid.set_total_rows(500);
    harness.settle();
    harness.tick();
    assert_eq!(harness.loader.calls(), vec![(0, 99)]);
    assert_eq!(harness.grid.total_rows(), 500);
    assert!(harness.grid.scrollbars().vertical.visible);
}

// ============================================================================
// Multi-row, multi-column selection
// ============================================================================

#[test]
fn test_selection_highlight_spans_columns_and_rows() {
    let mut harness = Harness::new(GridOptions {
        total_rows: 100,
        columns: fixtures::narrow_columns(),
        ..GridOptions::default()
    });
    harness.settle();

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    harness
        .grid
        .events()
        .selection_change
        .subscribe(move |sel| sink.borrow_mut().push(*sel));

    let selection = Selection::cell_range(2, 1, 3, 3);
    harness.grid.set_selection(Some(selection));
    assert_eq!(*changes.borrow(), vec![Some(selection)]);

    harness.surfaces.reset();
    harness.tick();
    let theme = harness.grid.options().theme;
    let highlight = harness
        .surfaces
        .commands(LayerKind::Decoration)
        .into_iter()
        .find_map(|c| match c {
            DrawCommand::FillRect { x, y, w, h, color } if color == theme.selection_color => Some((x, y, w, h)),
            _ => None,
        });
    assert_eq!(highlight, Some((80.0, 70.0, 220.0, 70.0)));
}
