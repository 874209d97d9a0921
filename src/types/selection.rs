use serde::{Deserialize, Serialize};

/// A resolved cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rectangular cell selection, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Selection {
    /// Create a new cell range selection
    pub fn cell_range(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Single-cell selection
    pub fn cell(pos: CellPos) -> Self {
        Self::cell_range(pos.row, pos.col, pos.row, pos.col)
    }

    /// Get normalized bounds `(min_row, min_col, max_row, max_col)`
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        (
            self.start_row.min(self.end_row),
            self.start_col.min(self.end_col),
            self.start_row.max(self.end_row),
            self.start_col.max(self.end_col),
        )
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        let (r0, c0, r1, c1) = self.bounds();
        (r0..=r1).contains(&pos.row) && (c0..=c1).contains(&pos.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_normalized() {
        let sel = Selection::cell_range(5, 3, 2, 1);
        assert_eq!(sel.bounds(), (2, 1, 5, 3));
        assert!(sel.contains(CellPos::new(4, 2)));
        assert!(!sel.contains(CellPos::new(6, 2)));
    }
}
