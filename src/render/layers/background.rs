use crate::layout::content_height;
use crate::render::layer::Frame;
use crate::render::surface::Surface;

/// Fill the visible part of the scrollable extent with the theme background.
pub fn draw(surface: &mut dyn Surface, frame: &Frame<'_>) {
    let extent = content_height(frame.total_rows, frame.options.row_height);
    let top = frame.scroll.scroll_y;
    let h = (extent - top).min(frame.viewport.height);
    if h <= 0.0 {
        return;
    }
    surface.save();
    surface.translate(0.0, -top);
    surface.fill_rect(0.0, top, frame.viewport.width, h, &frame.options.theme.background_color);
    surface.restore();
}
