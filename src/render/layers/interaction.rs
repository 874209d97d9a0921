//! Pointer hit testing for the transparent top layer.

use crate::layout::{row_at_offset, ColumnLayout, ScrollState};
use crate::types::CellPos;

/// Resolve a pointer position (relative to the data area) to a cell.
///
/// Columns are found by accumulating widths left to right and rows by
/// integer division of the content-space `y` by the row height. Points left
/// of the first column, right of the last, above the content or below the
/// last row resolve to `None`.
pub fn hit_test(
    x: f64,
    y: f64,
    scroll: ScrollState,
    columns: &ColumnLayout,
    row_height: f64,
    total_rows: usize,
) -> Option<CellPos> {
    let content_x = x + scroll.scroll_x;
    let content_y = y + scroll.scroll_y;
    if !content_y.is_finite() || content_y < 0.0 {
        return None;
    }
    let col = columns.col_at_x(content_x)?;
    let row = row_at_offset(content_y, row_height);
    (row < total_rows).then_some(CellPos::new(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn columns() -> ColumnLayout {
        ColumnLayout::new(vec![
            Column::new("a", 80.0),
            Column::new("b", 100.0),
            Column::new("c", 120.0),
        ])
    }

    #[test]
    fn resolves_with_scroll_offset() {
        let hit = hit_test(10.0, 10.0, ScrollState::new(80.0, 70.0), &columns(), 35.0, 100);
        assert_eq!(hit, Some(CellPos::new(2, 1)));
    }

    #[test]
    fn outside_content_is_none() {
        assert_eq!(hit_test(300.0, 10.0, ScrollState::ORIGIN, &columns(), 35.0, 100), None);
        assert_eq!(hit_test(-1.0, 10.0, ScrollState::ORIGIN, &columns(), 35.0, 100), None);
        assert_eq!(hit_test(10.0, 35.0 * 3.0, ScrollState::ORIGIN, &columns(), 35.0, 3), None);
        assert_eq!(hit_test(10.0, -5.0, ScrollState::ORIGIN, &columns(), 35.0, 3), None);
    }
}
