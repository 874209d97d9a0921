//! Viewport geometry: scroll state, visible ranges and scroll extents.
//!
//! Everything here is a pure function of scroll offset, row height, viewport
//! size and column widths.

use std::ops::RangeInclusive;

use serde::Serialize;

use super::ColumnLayout;

/// Scroll offset in content coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl ScrollState {
    pub const ORIGIN: Self = Self {
        scroll_x: 0.0,
        scroll_y: 0.0,
    };

    pub fn new(scroll_x: f64, scroll_y: f64) -> Self {
        Self { scroll_x, scroll_y }
    }

    /// Same offset within a sub-pixel tolerance
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.scroll_x - other.scroll_x).abs() <= f64::EPSILON
            && (self.scroll_y - other.scroll_y).abs() <= f64::EPSILON
    }
}

/// Logical (CSS pixel) size of a drawable area
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Inclusive row index range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn iter(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(&self, row: usize) -> bool {
        self.iter().contains(&row)
    }

    /// Grow by `buffer` rows on both sides, clamped to `[0, last_row]`
    #[must_use]
    pub fn expand(&self, buffer: usize, last_row: usize) -> Self {
        Self {
            start: self.start.saturating_sub(buffer),
            end: self.end.saturating_add(buffer).min(last_row),
        }
    }
}

/// Row index containing content-space `y` (floor division by row height).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn row_at_offset(y: f64, row_height: f64) -> usize {
    if row_height.is_nan() || row_height <= 0.0 || !y.is_finite() || y <= 0.0 {
        return 0;
    }
    (y / row_height).floor() as usize
}

/// Number of rows needed to cover `extent` (ceiling division).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rows_to_cover(extent: f64, row_height: f64) -> usize {
    if row_height.is_nan() || row_height <= 0.0 || !extent.is_finite() || extent <= 0.0 {
        return 0;
    }
    (extent / row_height).ceil() as usize
}

/// Total scrollable content height
pub fn content_height(total_rows: usize, row_height: f64) -> f64 {
    total_rows as f64 * row_height
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Visible row range (inclusive) for a vertical scroll offset.
    ///
    /// Includes the partially visible row below the last full row, clamped to
    /// the last valid index. `None` when there are no rows or the offset lies
    /// past the end of the content.
    pub fn visible_rows(&self, scroll_y: f64, row_height: f64, total_rows: usize) -> Option<RowRange> {
        if total_rows == 0 {
            return None;
        }
        let start = row_at_offset(scroll_y, row_height);
        if start >= total_rows {
            return None;
        }
        let end = start
            .saturating_add(rows_to_cover(self.height, row_height))
            .min(total_rows - 1);
        Some(RowRange { start, end })
    }

    /// Visible column range (inclusive) for a horizontal scroll offset.
    pub fn visible_cols(&self, scroll_x: f64, columns: &ColumnLayout) -> Option<(usize, usize)> {
        let last = columns.len().checked_sub(1)?;
        let start = columns.col_at_x(scroll_x.max(0.0))?;
        let end = columns.col_at_x(scroll_x + self.width).unwrap_or(last);
        Some((start, end.max(start)))
    }

    /// `max(0, total_rows * row_height - height)`
    pub fn max_scroll_y(&self, total_rows: usize, row_height: f64) -> f64 {
        (content_height(total_rows, row_height) - self.height).max(0.0)
    }

    /// `max(0, content_width - width)`
    pub fn max_scroll_x(&self, content_width: f64) -> f64 {
        (content_width - self.width).max(0.0)
    }

    /// Clamp an offset into `[0, max_x] × [0, max_y]`.
    pub fn clamp_scroll(&self, scroll: ScrollState, content_width: f64, content_height: f64) -> ScrollState {
        let max_x = (content_width - self.width).max(0.0);
        let max_y = (content_height - self.height).max(0.0);
        ScrollState {
            scroll_x: clamp_finite(scroll.scroll_x, max_x),
            scroll_y: clamp_finite(scroll.scroll_y, max_y),
        }
    }
}

/// Clamp into `[0, max]`, treating NaN as 0.
pub fn clamp_finite(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max.max(0.0))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::Column;

    #[test]
    fn test_visible_rows_at_top() {
        let vp = Viewport::new(800.0, 350.0);
        let range = vp.visible_rows(0.0, 35.0, 10_000);
        assert_eq!(range, Some(RowRange { start: 0, end: 10 }));
    }

    #[test]
    fn test_visible_rows_clamped_at_end() {
        let vp = Viewport::new(800.0, 350.0);
        let range = vp.visible_rows(35.0 * 95.0, 35.0, 100);
        assert_eq!(range, Some(RowRange { start: 95, end: 99 }));
        assert_eq!(vp.visible_rows(35.0 * 100.0, 35.0, 100), None);
        assert_eq!(vp.visible_rows(0.0, 35.0, 0), None);
    }

    #[test]
    fn test_max_scroll() {
        let vp = Viewport::new(800.0, 560.0);
        assert_eq!(vp.max_scroll_y(10_000, 35.0), 350_000.0 - 560.0);
        assert_eq!(vp.max_scroll_y(3, 35.0), 0.0);
        assert_eq!(vp.max_scroll_x(1000.0), 200.0);
        assert_eq!(vp.max_scroll_x(500.0), 0.0);
    }

    #[test]
    fn test_clamp_scroll() {
        let vp = Viewport::new(100.0, 100.0);
        let s = vp.clamp_scroll(ScrollState::new(-5.0, 1e9), 300.0, 1000.0);
        assert_eq!(s, ScrollState::new(0.0, 900.0));
        let s = vp.clamp_scroll(ScrollState::new(f64::NAN, 50.0), 300.0, 1000.0);
        assert_eq!(s, ScrollState::new(0.0, 50.0));
    }

    #[test]
    fn test_visible_cols() {
        let columns = ColumnLayout::new(vec![
            Column::new("a", 100.0),
            Column::new("b", 100.0),
            Column::new("c", 100.0),
            Column::new("d", 100.0),
        ]);
        let vp = Viewport::new(150.0, 100.0);
        assert_eq!(vp.visible_cols(0.0, &columns), Some((0, 1)));
        assert_eq!(vp.visible_cols(120.0, &columns), Some((1, 2)));
        assert_eq!(vp.visible_cols(300.0, &columns), Some((3, 3)));
        assert_eq!(vp.visible_cols(0.0, &ColumnLayout::default()), None);
    }

    #[test]
    fn test_row_range_expand() {
        let r = RowRange { start: 5, end: 20 };
        assert_eq!(r.expand(10, 25), RowRange { start: 0, end: 25 });
        assert_eq!(r.iter().count(), 16);
        assert!(r.contains(20));
        assert!(!r.contains(21));
    }
}
