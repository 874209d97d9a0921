//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on Canvas APIs.
//! Rectangles are in content coordinates; the decoration layer translates by
//! the scroll offset before filling them.

use crate::layout::{ColumnLayout, ScrollState};
use crate::types::Selection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl SelectionRect {
    /// Same rectangle in viewport coordinates
    #[must_use]
    pub fn to_screen(self, scroll: ScrollState) -> Self {
        Self {
            x: self.x - scroll.scroll_x,
            y: self.y - scroll.scroll_y,
            ..self
        }
    }
}

/// Rectangle covered by a selection: cumulative column widths across the
/// column span, `row_height` per row across the row span.
///
/// `None` when the span covers no visible width (e.g. hidden or missing
/// columns).
pub fn selection_rect(selection: &Selection, columns: &ColumnLayout, row_height: f64) -> Option<SelectionRect> {
    let (min_row, min_col, max_row, max_col) = selection.bounds();
    let (x, w) = columns.span(min_col, max_col);
    if w <= 0.0 {
        return None;
    }
    let rows = (max_row - min_row + 1) as f64;
    Some(SelectionRect {
        x,
        y: min_row as f64 * row_height,
        w,
        h: rows * row_height,
    })
}

/// Full-width band for the hovered row
pub fn hover_rect(row: usize, columns: &ColumnLayout, row_height: f64) -> Option<SelectionRect> {
    let w = columns.total_width();
    if w <= 0.0 {
        return None;
    }
    Some(SelectionRect {
        x: 0.0,
        y: row as f64 * row_height,
        w,
        h: row_height,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn layout() -> ColumnLayout {
        ColumnLayout::new(vec![
            Column::new("a", 80.0),
            Column::new("b", 100.0),
            Column::new("c", 120.0),
        ])
    }

    #[test]
    fn selection_rect_spans_cumulative_widths() {
        let rect = selection_rect(&Selection::cell_range(2, 1, 3, 2), &layout(), 35.0).unwrap();
        assert_eq!(rect, SelectionRect { x: 80.0, y: 70.0, w: 220.0, h: 70.0 });
    }

    #[test]
    fn reversed_selection_is_normalized() {
        let forward = selection_rect(&Selection::cell_range(2, 1, 3, 2), &layout(), 35.0);
        let reversed = selection_rect(&Selection::cell_range(3, 2, 2, 1), &layout(), 35.0);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn selection_past_last_column_is_empty() {
        assert!(selection_rect(&Selection::cell_range(0, 5, 0, 6), &layout(), 35.0).is_none());
    }

    #[test]
    fn screen_rect_subtracts_scroll() {
        let rect = selection_rect(&Selection::cell_range(2, 1, 3, 2), &layout(), 35.0).unwrap();
        let screen = rect.to_screen(ScrollState::new(50.0, 35.0));
        assert_eq!((screen.x, screen.y), (30.0, 35.0));
        assert_eq!(hover_rect(1, &layout(), 35.0).unwrap().w, 300.0);
    }
}
