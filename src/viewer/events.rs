//! Pointer and selection handlers for `Grid`.
//!
//! Coordinates are relative to the data area (below the header band).
//! Handlers update state under the borrow and publish after releasing it, so
//! subscribers may call back into the grid.

use super::Grid;
use crate::render::layers::interaction::hit_test;
use crate::render::LayerKind;
use crate::types::{CellPos, Selection};

impl Grid {
    /// Cell under a data-area point, using the authoritative scroll offset.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<CellPos> {
        let s = self.inner.state.borrow();
        hit_test(
            x,
            y,
            s.scroll,
            &s.columns,
            s.options.row_height,
            s.options.total_rows,
        )
    }

    /// Click at a data-area point: publishes `cell_click` and selects the cell.
    pub fn pointer_click(&self, x: f64, y: f64) -> Option<CellPos> {
        let cell = self.cell_at(x, y)?;
        self.inner.events.cell_click.publish(&cell);
        self.set_selection(Some(Selection::cell(cell)));
        Some(cell)
    }

    /// Pointer moved over the data area.
    pub fn pointer_move(&self, x: f64, y: f64) {
        let cell = self.cell_at(x, y);
        self.set_hover(cell);
    }

    /// Pointer left the widget.
    pub fn pointer_leave(&self) {
        self.set_hover(None);
    }

    pub fn selection(&self) -> Option<Selection> {
        self.inner.state.borrow().selection
    }

    pub fn hover(&self) -> Option<CellPos> {
        self.inner.state.borrow().hover
    }

    /// Replace the selection and repaint the decoration layer.
    pub fn set_selection(&self, selection: Option<Selection>) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.selection == selection {
                return;
            }
            s.selection = selection;
            if let Some(layer) = s.compositor.layer_mut(LayerKind::Decoration) {
                layer.set_selection(selection);
            }
        }
        self.schedule_render();
        self.inner.events.selection_change.publish(&selection);
    }

    fn set_hover(&self, hover: Option<CellPos>) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.hover == hover {
                return;
            }
            s.hover = hover;
            if let Some(layer) = s.compositor.layer_mut(LayerKind::Decoration) {
                layer.set_hover(hover);
            }
        }
        self.schedule_render();
        self.inner.events.hover_change.publish(&hover);
    }
}
