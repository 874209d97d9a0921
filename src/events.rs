//! Publish/subscribe channels for grid notifications.
//!
//! Buses are created once and live as long as their owner. Handlers are
//! invoked synchronously in subscription order; subscribing or unsubscribing
//! from inside a handler takes effect from the next publish.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::data::PageIndex;
use crate::layout::ScrollState;
use crate::types::{CellPos, Selection};

/// Handle returned by [`EventBus::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Rc<dyn Fn(&T)>;

/// A single-threaded observer list for one event type.
pub struct EventBus<T> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Handler<T>)>>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != id);
        handlers.len() != before
    }

    pub fn publish(&self, event: &T) {
        // Snapshot so handlers may (un)subscribe without a borrow conflict.
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }
}

/// Published by the page cache when a page becomes resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChanged {
    pub page: PageIndex,
    /// First row index stored
    pub start: usize,
    /// Last row index stored (inclusive)
    pub end: usize,
}

/// Notifications exposed by the grid.
#[derive(Default)]
pub struct GridEvents {
    /// A data cell was clicked
    pub cell_click: EventBus<CellPos>,
    /// Selection replaced or cleared
    pub selection_change: EventBus<Option<Selection>>,
    /// Pointer moved onto another cell, or left the grid
    pub hover_change: EventBus<Option<CellPos>>,
    /// Scroll offset changed
    pub scroll: EventBus<ScrollState>,
}
