//! Selection and hover highlights.

use crate::render::layer::{Decoration, Frame};
use crate::render::selection::{hover_rect, selection_rect};
use crate::render::surface::Surface;

pub fn draw(surface: &mut dyn Surface, frame: &Frame<'_>, state: &Decoration) {
    let row_height = frame.options.row_height;
    let theme = &frame.options.theme;
    let hover = state
        .hover
        .filter(|cell| cell.row < frame.total_rows)
        .and_then(|cell| hover_rect(cell.row, frame.columns, row_height));
    let selection = state
        .selection
        .and_then(|sel| selection_rect(&sel, frame.columns, row_height));
    if hover.is_none() && selection.is_none() {
        return;
    }

    surface.save();
    surface.translate(-frame.scroll.scroll_x, -frame.scroll.scroll_y);
    if let Some(rect) = hover {
        surface.fill_rect(rect.x, rect.y, rect.w, rect.h, &theme.hover_color);
    }
    if let Some(rect) = selection {
        surface.fill_rect(rect.x, rect.y, rect.w, rect.h, &theme.selection_color);
    }
    surface.restore();
}
