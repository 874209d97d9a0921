//! Layered rendering with pluggable surfaces.
//!
//! This module provides:
//! - The `Surface` trait layers draw through, plus a recording implementation
//! - Render layers with dirty tracking and their drawing routines
//! - The compositor that paints dirty layers once per display refresh
//! - Color parsing utilities and selection geometry

pub mod colors;
pub mod compositor;
pub mod layer;
pub mod layers;
pub mod recording;
pub mod selection;
pub mod surface;

pub use colors::{palette, parse_color, CssColor};
pub use compositor::{Compositor, FrameScheduler, ManualFrames, PaintStats};
pub use layer::{Decoration, Frame, Layer, LayerContent, LayerKind};
pub use recording::{CommandLog, DrawCommand, RecordingSurface, RecordingSurfaceProvider};
pub use selection::{selection_rect, SelectionRect};
pub use surface::{Surface, SurfaceProvider, TextAlign, TextStyle};
