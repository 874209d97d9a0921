//! Drawing routines for each layer variant.
//!
//! Each `draw` assumes the surface was just cleared and leaves the transform
//! stack balanced.

pub mod background;
pub mod data;
pub mod decoration;
pub mod header;
pub mod interaction;

use super::surface::TextAlign;
use crate::types::Align;

/// Horizontal inset of cell text from the column edge
pub const CELL_PADDING: f64 = 10.0;

/// Anchor x and canvas alignment for text in a column spanning `[x, x + w)`
pub(crate) fn text_anchor(x: f64, w: f64, align: Align) -> (f64, TextAlign) {
    match align {
        Align::Left => (x + CELL_PADDING, TextAlign::Left),
        Align::Center => (x + w / 2.0, TextAlign::Center),
        Align::Right => (x + w - CELL_PADDING, TextAlign::Right),
    }
}

/// Offset that puts a one-pixel line on a pixel boundary
pub(crate) const HAIRLINE: f64 = 0.5;
