//! Row data access: loaders, page arithmetic and the page cache.

mod cache;
mod loader;
mod page;

use std::rc::Rc;

use crate::types::Row;

pub use cache::{PageCache, PageFetch};
pub use loader::{InMemoryLoader, LoadResult, RowLoader};
pub use page::{
    page_bounds, page_of, page_offset, pages_covering, FetchPolicy, PageIndex, PageOutcome, PageStatus,
    PRELOAD_THRESHOLD_ROWS,
};

/// Read access to rows by absolute index, as seen by the render layers.
pub trait RowSource {
    /// `None` when the row is not (yet) available
    fn row(&self, index: usize) -> Option<Rc<Row>>;
}

impl RowSource for Vec<Rc<Row>> {
    fn row(&self, index: usize) -> Option<Rc<Row>> {
        self.get(index).cloned()
    }
}
