//! Pre-computed horizontal layout for the column list.
//!
//! Positions are computed once per column-list replacement so that layers and
//! hit testing can look up offsets without re-summing widths every frame.

use crate::types::Column;

/// Cumulative column geometry
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    /// Column definitions in display order
    pub columns: Vec<Column>,
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge,
    /// last entry = total width)
    pub col_positions: Vec<f64>,
    /// Effective column widths (0 for hidden columns)
    pub col_widths: Vec<f64>,
}

impl ColumnLayout {
    pub fn new(columns: Vec<Column>) -> Self {
        let mut col_positions = Vec::with_capacity(columns.len() + 1);
        let mut col_widths = Vec::with_capacity(columns.len());
        let mut x = 0.0;
        for column in &columns {
            col_positions.push(x);
            let w = column.effective_width();
            col_widths.push(w);
            x += w;
        }
        col_positions.push(x); // Final edge

        Self {
            columns,
            col_positions,
            col_widths,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, col: usize) -> Option<&Column> {
        self.columns.get(col)
    }

    /// Left edge of a column (total width for indices past the end)
    pub fn col_x(&self, col: usize) -> f64 {
        self.col_positions
            .get(col)
            .copied()
            .unwrap_or_else(|| self.total_width())
    }

    pub fn col_width(&self, col: usize) -> f64 {
        self.col_widths.get(col).copied().unwrap_or(0.0)
    }

    /// Total width of all columns
    pub fn total_width(&self) -> f64 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// `(x, width)` covered by the inclusive column span
    pub fn span(&self, start_col: usize, end_col: usize) -> (f64, f64) {
        let x = self.col_x(start_col);
        let right = self.col_x(end_col.saturating_add(1));
        (x, (right - x).max(0.0))
    }

    /// Find the column containing content-space `x`.
    ///
    /// Accumulates widths left to right; points left of the first boundary or
    /// at/after the right edge of the last column resolve to `None`.
    pub fn col_at_x(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || x < 0.0 {
            return None;
        }
        let mut accumulated = 0.0;
        for (i, w) in self.col_widths.iter().enumerate() {
            accumulated += w;
            if x < accumulated {
                return Some(i);
            }
        }
        None
    }

    /// Iterate `(index, column, x, width)` over visible (non-zero width) columns
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Column, f64, f64)> + '_ {
        self.columns
            .iter()
            .zip(self.col_positions.iter().zip(self.col_widths.iter()))
            .enumerate()
            .filter(|(_, (_, (_, w)))| **w > 0.0)
            .map(|(i, (col, (x, w)))| (i, col, *x, *w))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_COL_WIDTH;

    fn layout(widths: &[f64]) -> ColumnLayout {
        ColumnLayout::new(
            widths
                .iter()
                .enumerate()
                .map(|(i, w)| Column::new(&format!("c{i}"), *w))
                .collect(),
        )
    }

    #[test]
    fn test_positions_accumulate() {
        let layout = layout(&[80.0, 100.0, 120.0]);
        assert_eq!(layout.col_positions, vec![0.0, 80.0, 180.0, 300.0]);
        assert_eq!(layout.total_width(), 300.0);
        assert_eq!(layout.span(1, 2), (80.0, 220.0));
    }

    #[test]
    fn test_zero_width_uses_default() {
        let layout = layout(&[0.0, 50.0]);
        assert_eq!(layout.col_width(0), DEFAULT_COL_WIDTH);
        assert_eq!(layout.total_width(), DEFAULT_COL_WIDTH + 50.0);
    }

    #[test]
    fn test_col_at_x() {
        let layout = layout(&[80.0, 100.0, 120.0]);
        assert_eq!(layout.col_at_x(0.0), Some(0));
        assert_eq!(layout.col_at_x(79.9), Some(0));
        assert_eq!(layout.col_at_x(80.0), Some(1));
        assert_eq!(layout.col_at_x(299.0), Some(2));
        assert_eq!(layout.col_at_x(300.0), None);
        assert_eq!(layout.col_at_x(-1.0), None);
    }

    #[test]
    fn test_hidden_column_is_skipped() {
        let mut columns = vec![Column::new("a", 50.0), Column::new("b", 50.0), Column::new("c", 50.0)];
        columns[1].hidden = true;
        let layout = ColumnLayout::new(columns);
        assert_eq!(layout.col_at_x(60.0), Some(2));
        assert_eq!(layout.iter().map(|(i, ..)| i).collect::<Vec<_>>(), vec![0, 2]);
    }
}
