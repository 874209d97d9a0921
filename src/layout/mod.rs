//! Layout engine: column positions and viewport geometry.
//!
//! This module handles:
//! - Pre-computing column offsets from column widths
//! - Scroll state and clamping against content extents
//! - Visible row/column ranges for a scroll offset

mod column_layout;
mod viewport;

pub use column_layout::ColumnLayout;
pub use viewport::{
    clamp_finite, content_height, row_at_offset, rows_to_cover, RowRange, ScrollState, Viewport,
};
