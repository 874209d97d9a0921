//! Drawing surface trait for pluggable rendering implementations.
//!
//! Each layer owns one surface. Implementations handle the actual drawing
//! operations (Canvas 2D in the browser, a command recorder natively) so that
//! the layers themselves stay testable without a DOM.

use super::LayerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font and color for a `fill_text` call. Text is vertically centered on `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: String,
    pub color: String,
    pub align: TextAlign,
}

/// Immediate-mode drawing target in logical (CSS pixel) coordinates.
///
/// `resize` takes the logical size plus the device pixel ratio; backing
/// stores are scaled internally so callers never see physical pixels.
pub trait Surface {
    fn resize(&mut self, width: f64, height: f64, dpr: f64);

    /// Clear the whole surface to transparent
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);

    /// Intersect the clip region with a rectangle
    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);

    /// One-pixel line
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);

    fn set_visible(&mut self, visible: bool);
}

/// Creates the surface for each layer at grid construction.
pub trait SurfaceProvider {
    fn create_surface(&self, kind: LayerKind, width: f64, height: f64, dpr: f64) -> Box<dyn Surface>;
}
