//! Page arithmetic and fetch policies.

use std::ops::RangeInclusive;

use crate::layout::RowRange;

/// `row_index / page_size`
pub type PageIndex = usize;

/// Threshold (in rows) used by the default preload policy.
pub const PRELOAD_THRESHOLD_ROWS: usize = 400;

/// Residency of a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// Never requested, or dropped
    Absent,
    /// Fetch in flight
    Pending,
    /// Row batch cached
    Resident,
    /// Last fetch rejected; refetched on the next visibility check
    Failed,
}

/// How a page fetch settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Loaded,
    Failed,
    /// Cache was cleared or the page was invalidated while in flight
    Discarded,
}

pub fn page_of(row: usize, page_size: usize) -> PageIndex {
    row / page_size.max(1)
}

pub fn page_offset(row: usize, page_size: usize) -> usize {
    row % page_size.max(1)
}

/// Inclusive row bounds of a page, clamped at the last row.
/// `None` when the page starts past the end of the dataset.
pub fn page_bounds(page: PageIndex, page_size: usize, total_rows: usize) -> Option<(usize, usize)> {
    let page_size = page_size.max(1);
    let start = page.checked_mul(page_size)?;
    if start >= total_rows {
        return None;
    }
    let end = start
        .saturating_add(page_size - 1)
        .min(total_rows - 1);
    Some((start, end))
}

/// Pages covering the inclusive row span
pub fn pages_covering(start_row: usize, end_row: usize, page_size: usize) -> RangeInclusive<PageIndex> {
    page_of(start_row, page_size)..=page_of(end_row.max(start_row), page_size)
}

/// Which pages to request for a visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Visible pages plus the next page once the window is within
    /// `threshold` rows of its boundary.
    Preload { threshold: usize },
    /// Only the pages covering the window (thumb dragging, track jumps).
    DirectJump,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::Preload {
            threshold: PRELOAD_THRESHOLD_ROWS,
        }
    }
}

impl FetchPolicy {
    /// Pages covering `visible` widened by `buffer` rows on each side.
    ///
    /// The preload distance is measured from the last visible row, not from
    /// the buffered edge.
    pub fn pages_for(&self, visible: RowRange, buffer: usize, page_size: usize, total_rows: usize) -> Vec<PageIndex> {
        if total_rows == 0 || visible.start >= total_rows {
            return Vec::new();
        }
        let last_row = total_rows - 1;
        let window = visible.expand(buffer, last_row);
        let mut pages: Vec<PageIndex> = pages_covering(window.start, window.end, page_size).collect();

        if let Self::Preload { threshold } = *self {
            let visible_end = visible.end.min(last_row);
            let next = page_of(visible_end, page_size) + 1;
            let boundary = next.saturating_mul(page_size.max(1));
            if boundary < total_rows && visible_end.saturating_add(threshold) > boundary && !pages.contains(&next) {
                pages.push(next);
            }
        }
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_clamp_at_last_row() {
        assert_eq!(page_bounds(0, 100, 10_000), Some((0, 99)));
        assert_eq!(page_bounds(1, 100, 10_000), Some((100, 199)));
        assert_eq!(page_bounds(2, 100, 250), Some((200, 249)));
        assert_eq!(page_bounds(3, 100, 250), None);
        assert_eq!(page_bounds(0, 100, 0), None);
    }

    #[test]
    fn lookup_resolves_page_and_offset() {
        assert_eq!(page_of(0, 100), 0);
        assert_eq!(page_of(199, 100), 1);
        assert_eq!(page_offset(199, 100), 99);
        assert_eq!(page_of(5, 0), 5);
    }

    #[test]
    fn preload_adds_next_page_near_boundary() {
        let visible = RowRange { start: 100, end: 116 };
        let policy = FetchPolicy::default();
        assert_eq!(policy.pages_for(visible, 10, 100, 10_000), vec![0, 1, 2]);
        assert_eq!(FetchPolicy::DirectJump.pages_for(visible, 10, 100, 10_000), vec![0, 1]);
        assert_eq!(FetchPolicy::DirectJump.pages_for(visible, 0, 100, 10_000), vec![1]);
    }

    #[test]
    fn preload_distance_ignores_buffer() {
        // Last visible row 150 is 50 rows from the boundary at 200
        let visible = RowRange { start: 134, end: 150 };
        let policy = FetchPolicy::Preload { threshold: 45 };
        assert_eq!(policy.pages_for(visible, 10, 100, 10_000), vec![1]);
        let policy = FetchPolicy::Preload { threshold: 51 };
        assert_eq!(policy.pages_for(visible, 10, 100, 10_000), vec![1, 2]);
    }

    #[test]
    fn buffered_window_already_holding_next_page_is_not_repeated() {
        let visible = RowRange { start: 180, end: 196 };
        assert_eq!(FetchPolicy::default().pages_for(visible, 10, 100, 10_000), vec![1, 2]);
    }

    #[test]
    fn preload_respects_threshold_and_dataset_end() {
        let visible = RowRange { start: 0, end: 10 };
        let far = FetchPolicy::Preload { threshold: 50 };
        assert_eq!(far.pages_for(visible, 0, 1000, 10_000), vec![0]);
        let near = FetchPolicy::Preload { threshold: 995 };
        assert_eq!(near.pages_for(visible, 0, 1000, 10_000), vec![0, 1]);
        // No page past the end of the data
        let tail = RowRange { start: 9990, end: 9999 };
        assert_eq!(FetchPolicy::default().pages_for(tail, 10, 100, 10_000), vec![99]);
    }

    #[test]
    fn window_spanning_pages() {
        let visible = RowRange { start: 95, end: 210 };
        assert_eq!(FetchPolicy::DirectJump.pages_for(visible, 0, 100, 10_000), vec![0, 1, 2]);
    }
}
