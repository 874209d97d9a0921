//! vortex-table - virtualized canvas table for the web
//!
//! Renders tables with millions of rows by keeping only the visible window
//! resident:
//! - Paged async row cache with in-flight request dedup
//! - Layered canvas compositor that repaints only dirty layers
//! - One authoritative scroll offset driving every layer
//! - Wheel, scrollbar and programmatic scrolling with preload
//!
//! The core is platform independent; the `web` module binds it to the DOM.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { VortexTable } from 'vortex-table';
//! await init();
//! const table = new VortexTable(container, { totalRows: 1_000_000, columns }, loadRows);
//! await table.scrollToIndex(250_000);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::{GridOptions, PaginationOptions, Theme, VirtualScrollOptions};
pub use data::{InMemoryLoader, PageCache, RowLoader};
pub use error::{GridError, LoadError, Result};
pub use viewer::{Grid, PaginationInfo};

pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use web::VortexTable;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
