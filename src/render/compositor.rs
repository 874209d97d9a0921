//! Layer compositor: fixed z-order, coalesced paints.
//!
//! Any number of render requests between two display refreshes collapse into
//! one paint. A paint asks every layer to render; clean layers return without
//! touching their surface.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::layer::{Frame, Layer, LayerKind};
use super::surface::SurfaceProvider;
use crate::config::GridOptions;
use crate::layout::{ColumnLayout, ScrollState};

/// Requests a callback on the next display refresh.
pub trait FrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>);
}

/// Frame scheduler driven by hand: callbacks queue until [`run_pending`].
///
/// [`run_pending`]: ManualFrames::run_pending
#[derive(Default, Clone)]
pub struct ManualFrames {
    queue: Rc<RefCell<Vec<Box<dyn FnOnce()>>>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next tick
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run one tick. Callbacks requested while running wait for the next tick.
    pub fn run_pending(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let ran = batch.len();
        for callback in batch {
            callback();
        }
        ran
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push(callback);
    }
}

/// Layers drawn by one paint, bottom to top
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub drawn: Vec<LayerKind>,
}

impl PaintStats {
    pub fn count(&self) -> usize {
        self.drawn.len()
    }

    pub fn drew(&self, kind: LayerKind) -> bool {
        self.drawn.contains(&kind)
    }
}

pub struct Compositor {
    /// Bottom to top
    layers: Vec<Layer>,
    render_scheduled: bool,
}

impl Compositor {
    /// Create every layer with a surface sized for its area.
    pub fn new(provider: &dyn SurfaceProvider, options: &GridOptions) -> Self {
        let dpr = options.device_pixel_ratio;
        let layers = LayerKind::ALL
            .iter()
            .map(|&kind| {
                let area = area_for(kind, options);
                let surface = provider.create_surface(kind, area.width, area.height, dpr);
                Layer::new(kind, surface, area, dpr)
            })
            .collect();
        Self {
            layers,
            render_scheduled: false,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind() == kind)
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.kind() == kind)
    }

    /// Mark a paint as scheduled. Returns `true` when the caller must request a
    /// frame, `false` when a paint is already pending.
    pub fn schedule_render(&mut self) -> bool {
        if self.render_scheduled {
            return false;
        }
        self.render_scheduled = true;
        true
    }

    pub fn is_render_scheduled(&self) -> bool {
        self.render_scheduled
    }

    /// Paint every dirty layer in z-order.
    pub fn render(&mut self, frame: &Frame<'_>) -> PaintStats {
        self.render_scheduled = false;
        let drawn: Vec<LayerKind> = self
            .layers
            .iter_mut()
            .filter_map(|layer| layer.render(frame).then(|| layer.kind()))
            .collect();
        trace!(layers = drawn.len(), scroll_y = frame.scroll.scroll_y, "paint");
        PaintStats { drawn }
    }

    pub fn has_dirty(&self) -> bool {
        self.layers.iter().any(Layer::is_dirty)
    }

    pub fn set_scroll_position(&mut self, scroll: ScrollState) {
        for layer in &mut self.layers {
            layer.set_scroll_position(scroll);
        }
    }

    pub fn set_columns(&mut self, columns: &Rc<ColumnLayout>) {
        for layer in &mut self.layers {
            layer.set_columns(Rc::clone(columns));
        }
    }

    pub fn resize(&mut self, options: &GridOptions) {
        for layer in &mut self.layers {
            let area = area_for(layer.kind(), options);
            layer.resize(area, options.device_pixel_ratio);
        }
    }

    pub fn mark_dirty(&mut self, kind: LayerKind) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.mark_dirty();
        }
    }

    pub fn mark_all_dirty(&mut self) {
        for layer in &mut self.layers {
            layer.mark_dirty();
        }
    }
}

fn area_for(kind: LayerKind, options: &GridOptions) -> crate::layout::Viewport {
    if kind.is_header() {
        options.header_viewport()
    } else {
        options.data_viewport()
    }
}
