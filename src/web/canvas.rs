//! Canvas 2D surfaces: one absolutely positioned `<canvas>` per layer.
//!
//! Backing stores are sized in physical pixels and the context is scaled by
//! the device pixel ratio, so layers draw in logical coordinates.

use std::cell::Cell;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::error::{GridError, Result};
use crate::render::{LayerKind, Surface, SurfaceProvider, TextAlign, TextStyle};

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn physical_px(logical: f64, dpr: f64) -> u32 {
    (logical * dpr).round().clamp(1.0, f64::from(u32::MAX)) as u32
}

fn text_align_name(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    kind: LayerKind,
    /// Top of the data area, shared with the provider so a header toggle
    /// moves the data canvases on their next resize
    data_top: Rc<Cell<f64>>,
    dpr: f64,
}

impl CanvasSurface {
    fn new(document: &Document, kind: LayerKind, data_top: Rc<Cell<f64>>) -> Result<Self> {
        let canvas = document
            .create_element("canvas")
            .map_err(|_| GridError::Render("failed to create canvas".into()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| GridError::Render("element is not a canvas".into()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GridError::Render("failed to get 2d context".into()))?
            .ok_or_else(|| GridError::Render("no 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Render("failed to cast to CanvasRenderingContext2d".into()))?;

        let style = canvas.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", "0px");
        let _ = style.set_property("z-index", &kind.z_index().to_string());
        if kind == LayerKind::Interaction {
            let _ = style.set_property("pointer-events", "none");
        }
        let _ = canvas.set_attribute("data-layer", kind.name());

        Ok(Self {
            canvas,
            ctx,
            kind,
            data_top,
            dpr: 1.0,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.dpr = dpr;
        self.canvas.set_width(physical_px(width, dpr));
        self.canvas.set_height(physical_px(height, dpr));
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
        let top = if self.kind.is_header() {
            0.0
        } else {
            self.data_top.get()
        };
        let _ = style.set_property("top", &format!("{top}px"));

        // Setting the size resets the context; scale for DPR again
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    fn clear(&mut self) {
        self.ctx.save();
        let _ = self.ctx.reset_transform();
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        self.ctx.restore();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let _ = self.ctx.translate(dx, dy);
    }

    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.begin_path();
        self.ctx.rect(x, y, w, h);
        self.ctx.clip();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str) {
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(1.0);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.ctx.set_font(&style.font);
        self.ctx.set_fill_style_str(&style.color);
        self.ctx.set_text_align(text_align_name(style.align));
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn set_visible(&mut self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.canvas.style().set_property("display", display);
    }
}

impl Drop for CanvasSurface {
    fn drop(&mut self) {
        if let Some(parent) = self.canvas.parent_node() {
            let _ = parent.remove_child(&self.canvas);
        }
    }
}

/// Surface that draws nothing; stands in when a canvas cannot be created.
struct DetachedSurface;

impl Surface for DetachedSurface {
    fn resize(&mut self, _width: f64, _height: f64, _dpr: f64) {}
    fn clear(&mut self) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _dx: f64, _dy: f64) {}
    fn clip_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, _color: &str) {}
    fn stroke_line(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, _color: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64, _style: &TextStyle) {}
    fn set_visible(&mut self, _visible: bool) {}
}

/// Appends one canvas per layer to a container element.
pub struct CanvasSurfaceProvider {
    document: Document,
    container: HtmlElement,
    data_top: Rc<Cell<f64>>,
}

impl CanvasSurfaceProvider {
    pub fn new(document: Document, container: HtmlElement, data_top: f64) -> Self {
        Self {
            document,
            container,
            data_top: Rc::new(Cell::new(data_top)),
        }
    }

    /// Move the data canvases below a header of the given height. Takes
    /// effect on their next resize.
    pub fn set_data_top(&self, top: f64) {
        self.data_top.set(top);
    }
}

impl SurfaceProvider for CanvasSurfaceProvider {
    fn create_surface(&self, kind: LayerKind, width: f64, height: f64, dpr: f64) -> Box<dyn Surface> {
        match CanvasSurface::new(&self.document, kind, Rc::clone(&self.data_top)) {
            Ok(mut surface) => {
                surface.resize(width, height, dpr);
                let _ = self.container.append_child(surface.canvas());
                Box::new(surface)
            }
            Err(e) => {
                warn!(layer = kind.name(), error = %e, "canvas unavailable; layer will not draw");
                Box::new(DetachedSurface)
            }
        }
    }
}
