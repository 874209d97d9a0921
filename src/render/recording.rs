//! A surface that records draw commands instead of rasterizing them.
//!
//! Used natively (tests, the CLI and benchmarks) to observe exactly what each
//! layer drew in a pass.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::surface::{Surface, SurfaceProvider, TextStyle};
use super::LayerKind;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: f64, height: f64, dpr: f64 },
    Clear,
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Clip { x: f64, y: f64, w: f64, h: f64 },
    FillRect { x: f64, y: f64, w: f64, h: f64, color: String },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, color: String },
    Text { text: String, x: f64, y: f64, style: TextStyle },
    SetVisible(bool),
}

/// Command log shared between a surface and whoever inspects it
pub type CommandLog = Rc<RefCell<Vec<DrawCommand>>>;

/// Records every call into a shared [`CommandLog`].
#[derive(Debug, Default)]
pub struct RecordingSurface {
    log: CommandLog,
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
    pub visible: bool,
}

impl RecordingSurface {
    pub fn new(log: CommandLog) -> Self {
        Self {
            log,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
            visible: true,
        }
    }

    fn push(&self, command: DrawCommand) {
        self.log.borrow_mut().push(command);
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.push(DrawCommand::Resize { width, height, dpr });
    }

    fn clear(&mut self) {
        self.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate { dx, dy });
    }

    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawCommand::Clip { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.push(DrawCommand::FillRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str) {
        self.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style: style.clone(),
        });
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.push(DrawCommand::SetVisible(visible));
    }
}

/// Hands out recording surfaces and keeps each layer's log reachable.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurfaceProvider {
    logs: Rc<RefCell<HashMap<LayerKind, CommandLog>>>,
}

impl RecordingSurfaceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far for a layer (empty if it was never created)
    pub fn commands(&self, kind: LayerKind) -> Vec<DrawCommand> {
        self.logs
            .borrow()
            .get(&kind)
            .map(|log| log.borrow().clone())
            .unwrap_or_default()
    }

    /// Forget all recorded commands, keeping the surfaces attached
    pub fn reset(&self) {
        for log in self.logs.borrow().values() {
            log.borrow_mut().clear();
        }
    }
}

impl SurfaceProvider for RecordingSurfaceProvider {
    fn create_surface(&self, kind: LayerKind, width: f64, height: f64, dpr: f64) -> Box<dyn Surface> {
        let log = CommandLog::default();
        self.logs.borrow_mut().insert(kind, Rc::clone(&log));
        let mut surface = RecordingSurface::new(log);
        surface.resize(width, height, dpr);
        Box::new(surface)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn provider_exposes_per_layer_logs() {
        let provider = RecordingSurfaceProvider::new();
        let mut surface = provider.create_surface(LayerKind::Data, 100.0, 50.0, 2.0);
        surface.fill_rect(0.0, 0.0, 10.0, 10.0, "#000");

        let commands = provider.commands(LayerKind::Data);
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands.first(), Some(DrawCommand::Resize { .. })));
        assert!(provider.commands(LayerKind::Header).is_empty());

        provider.reset();
        assert!(provider.commands(LayerKind::Data).is_empty());
    }
}
