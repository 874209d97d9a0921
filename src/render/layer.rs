//! Render layers: one visual concern per surface, redrawn only when dirty.
//!
//! A [`Layer`] owns its surface, a dirty flag, a visibility flag and a
//! snapshot of the inputs it depends on. Setters never draw; they only update
//! the snapshot and mark the layer dirty when the change affects it.

use std::rc::Rc;

use super::layers::{background, data, decoration, header};
use super::surface::Surface;
use crate::config::GridOptions;
use crate::data::RowSource;
use crate::layout::{ColumnLayout, ScrollState, Viewport};
use crate::types::{CellPos, Selection};

/// Layer identity, in bottom-to-top paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Background,
    Data,
    Header,
    Decoration,
    Interaction,
}

impl LayerKind {
    /// Every layer, bottom to top
    pub const ALL: [Self; 5] = [
        Self::Background,
        Self::Data,
        Self::Header,
        Self::Decoration,
        Self::Interaction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Data => "data",
            Self::Header => "header",
            Self::Decoration => "decoration",
            Self::Interaction => "interaction",
        }
    }

    /// Stacking order (CSS z-index in the browser binding)
    pub fn z_index(self) -> i32 {
        match self {
            Self::Background => 0,
            Self::Data => 1,
            Self::Header => 2,
            Self::Decoration => 3,
            Self::Interaction => 4,
        }
    }

    /// Redraw on horizontal scroll
    fn tracks_x(self) -> bool {
        matches!(self, Self::Data | Self::Header | Self::Decoration)
    }

    /// Redraw on vertical scroll
    fn tracks_y(self) -> bool {
        matches!(self, Self::Background | Self::Data | Self::Decoration)
    }

    /// Redraw when the column list changes
    fn uses_columns(self) -> bool {
        matches!(self, Self::Data | Self::Header | Self::Decoration)
    }

    /// The header sits above the data area; every other layer covers the data area
    pub fn is_header(self) -> bool {
        self == Self::Header
    }
}

/// Decoration state: selection and hover highlight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoration {
    pub selection: Option<Selection>,
    pub hover: Option<CellPos>,
}

/// What a layer draws
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Background,
    Data,
    Header,
    Decoration(Decoration),
    /// Transparent hit-testing surface
    Interaction,
}

impl LayerContent {
    pub fn for_kind(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Background => Self::Background,
            LayerKind::Data => Self::Data,
            LayerKind::Header => Self::Header,
            LayerKind::Decoration => Self::Decoration(Decoration::default()),
            LayerKind::Interaction => Self::Interaction,
        }
    }
}

/// Inputs for one compositor pass.
///
/// `scroll` is the controller's authoritative offset; layers draw against it
/// rather than their own snapshot.
pub struct Frame<'a> {
    pub options: &'a GridOptions,
    /// Data area size (below the header)
    pub viewport: Viewport,
    pub scroll: ScrollState,
    pub columns: &'a ColumnLayout,
    pub rows: &'a dyn RowSource,
    pub total_rows: usize,
}

pub struct Layer {
    kind: LayerKind,
    surface: Box<dyn Surface>,
    viewport: Viewport,
    dpr: f64,
    dirty: bool,
    visible: bool,
    scroll: ScrollState,
    columns: Rc<ColumnLayout>,
    content: LayerContent,
}

impl Layer {
    pub fn new(kind: LayerKind, surface: Box<dyn Surface>, viewport: Viewport, dpr: f64) -> Self {
        Self {
            kind,
            surface,
            viewport,
            dpr,
            dirty: true,
            visible: true,
            scroll: ScrollState::ORIGIN,
            columns: Rc::new(ColumnLayout::default()),
            content: LayerContent::for_kind(kind),
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Scroll offset last pushed by the controller
    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Redraw if dirty. Returns whether anything was drawn.
    ///
    /// Hidden layers stay dirty so they repaint when shown again.
    pub fn render(&mut self, frame: &Frame<'_>) -> bool {
        if !self.dirty || !self.visible {
            return false;
        }
        let surface = self.surface.as_mut();
        surface.clear();
        match &self.content {
            LayerContent::Background => background::draw(surface, frame),
            LayerContent::Data => data::draw(surface, frame),
            LayerContent::Header => header::draw(surface, frame, self.viewport),
            LayerContent::Decoration(state) => decoration::draw(surface, frame, state),
            LayerContent::Interaction => {}
        }
        self.dirty = false;
        true
    }

    pub fn set_scroll_position(&mut self, scroll: ScrollState) {
        let moved_x = (scroll.scroll_x - self.scroll.scroll_x).abs() > f64::EPSILON;
        let moved_y = (scroll.scroll_y - self.scroll.scroll_y).abs() > f64::EPSILON;
        self.scroll = scroll;
        if (moved_x && self.kind.tracks_x()) || (moved_y && self.kind.tracks_y()) {
            self.dirty = true;
        }
    }

    pub fn set_columns(&mut self, columns: Rc<ColumnLayout>) {
        if Rc::ptr_eq(&self.columns, &columns) {
            return;
        }
        self.columns = columns;
        if self.kind.uses_columns() {
            self.dirty = true;
        }
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn resize(&mut self, viewport: Viewport, dpr: f64) {
        if viewport == self.viewport && (dpr - self.dpr).abs() <= f64::EPSILON {
            return;
        }
        self.viewport = viewport;
        self.dpr = dpr;
        self.surface.resize(viewport.width, viewport.height, dpr);
        self.dirty = true;
    }

    pub fn show(&mut self) {
        if !self.visible {
            self.visible = true;
            self.surface.set_visible(true);
        }
    }

    pub fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            self.surface.set_visible(false);
        }
    }

    /// Replace the selection. No-op on layers without decoration.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        if let LayerContent::Decoration(state) = &mut self.content {
            if state.selection != selection {
                state.selection = selection;
                self.dirty = true;
            }
        }
    }

    /// Replace the hovered cell. No-op on layers without decoration.
    pub fn set_hover(&mut self, hover: Option<CellPos>) {
        if let LayerContent::Decoration(state) = &mut self.content {
            if state.hover != hover {
                state.hover = hover;
                self.dirty = true;
            }
        }
    }
}
