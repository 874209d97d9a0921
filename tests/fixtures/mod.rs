//! Row and column builders shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use vortex_table::{Column, GridOptions, Row};

/// Rows `start..=end` with a `name` and a `value` field.
pub fn rows(start: usize, end: usize) -> Vec<Row> {
    (start..=end)
        .map(|i| {
            Row::new(i64::try_from(i).unwrap(), i)
                .with("name", format!("row {i}"))
                .with("value", f64::from(u32::try_from(i % 1000).unwrap()))
        })
        .collect()
}

/// Three columns, 80 / 100 / 120 wide (keys `a`, `b`, `c`).
pub fn narrow_columns() -> Vec<Column> {
    vec![Column::new("a", 80.0), Column::new("b", 100.0), Column::new("c", 120.0)]
}

/// `name` and `value` columns, wide enough to need horizontal scrolling in
/// the default 800px viewport.
pub fn wide_columns() -> Vec<Column> {
    vec![
        Column::new("name", 600.0).titled("Name"),
        Column::new("value", 600.0).titled("Value"),
    ]
}

/// Default 800x600 options (row height 35, header 40, page size 100).
pub fn options(total_rows: usize) -> GridOptions {
    GridOptions {
        total_rows,
        columns: wide_columns(),
        ..GridOptions::default()
    }
}
