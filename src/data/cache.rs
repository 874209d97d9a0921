//! Paged row cache with in-flight request deduplication.
//!
//! Rows are grouped into fixed-size pages. Each page is absent, pending,
//! resident or failed. A page has at most one fetch in flight at a time: every
//! caller asking for a pending page is handed the same shared handle.
//!
//! Completions are matched against the fetch that is currently registered for
//! the page. A completion arriving after [`PageCache::clear`] (or after the
//! page's bounds changed) is discarded instead of repopulating the cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use futures::task::{LocalSpawn, LocalSpawnExt};
use tracing::{debug, warn};

use super::loader::{LoadResult, RowLoader};
use super::page::{page_bounds, page_of, page_offset, pages_covering, FetchPolicy, PageIndex, PageOutcome, PageStatus};
use super::RowSource;
use crate::events::{DataChanged, EventBus, SubscriptionId};
use crate::layout::RowRange;
use crate::types::Row;

/// Awaitable handle on a page fetch. Cloning it attaches another waiter to the
/// same request.
pub type PageFetch = Shared<LocalBoxFuture<'static, PageOutcome>>;

enum PageSlot {
    Pending { fetch_id: u64, handle: PageFetch },
    Resident(Vec<Rc<Row>>),
    Failed,
}

struct CacheState {
    page_size: usize,
    total_rows: usize,
    loader: Rc<dyn RowLoader>,
    pages: HashMap<PageIndex, PageSlot>,
    next_fetch_id: u64,
}

struct CacheShared {
    state: RefCell<CacheState>,
    changed: EventBus<DataChanged>,
}

/// Page-granular row cache backed by a [`RowLoader`].
pub struct PageCache {
    shared: Rc<CacheShared>,
    spawner: Rc<dyn LocalSpawn>,
}

impl PageCache {
    pub fn new(loader: impl RowLoader + 'static, spawner: Rc<dyn LocalSpawn>, page_size: usize) -> Self {
        Self {
            shared: Rc::new(CacheShared {
                state: RefCell::new(CacheState {
                    page_size: page_size.max(1),
                    total_rows: 0,
                    loader: Rc::new(loader),
                    pages: HashMap::new(),
                    next_fetch_id: 0,
                }),
                changed: EventBus::new(),
            }),
            spawner,
        }
    }

    pub fn page_size(&self) -> usize {
        self.shared.state.borrow().page_size
    }

    pub fn total_rows(&self) -> usize {
        self.shared.state.borrow().total_rows
    }

    /// Request a page, joining any fetch already in flight.
    ///
    /// Returns `None` for pages beyond the dataset or when the executor
    /// refuses the fetch. Resident pages yield an already-settled handle.
    pub fn fetch_page(&self, page: PageIndex) -> Option<PageFetch> {
        self.request(page).map(|(handle, _)| handle)
    }

    /// Fetch every page intersecting the inclusive row range.
    ///
    /// Returns the number of fetches started.
    pub fn ensure_range(&self, start_row: usize, end_row: usize) -> usize {
        let total = self.total_rows();
        if total == 0 || start_row >= total {
            return 0;
        }
        let page_size = self.page_size();
        pages_covering(start_row, end_row.min(total - 1), page_size)
            .filter(|page| matches!(self.request(*page), Some((_, true))))
            .count()
    }

    /// Fetch the pages the visible rows and `buffer` rows of overscan need
    /// under `policy`.
    ///
    /// Returns the number of fetches started.
    pub fn ensure_visible(&self, visible: RowRange, buffer: usize, policy: FetchPolicy) -> usize {
        let (page_size, total) = {
            let state = self.shared.state.borrow();
            (state.page_size, state.total_rows)
        };
        policy
            .pages_for(visible, buffer, page_size, total)
            .into_iter()
            .filter(|page| matches!(self.request(*page), Some((_, true))))
            .count()
    }

    /// Cached row, if its page is resident
    pub fn get_row(&self, index: usize) -> Option<Rc<Row>> {
        let state = self.shared.state.borrow();
        if index >= state.total_rows {
            return None;
        }
        match state.pages.get(&page_of(index, state.page_size))? {
            PageSlot::Resident(rows) => rows.get(page_offset(index, state.page_size)).cloned(),
            PageSlot::Pending { .. } | PageSlot::Failed => None,
        }
    }

    pub fn page_state(&self, page: PageIndex) -> PageStatus {
        match self.shared.state.borrow().pages.get(&page) {
            None => PageStatus::Absent,
            Some(PageSlot::Pending { .. }) => PageStatus::Pending,
            Some(PageSlot::Resident(_)) => PageStatus::Resident,
            Some(PageSlot::Failed) => PageStatus::Failed,
        }
    }

    /// Number of rows held by resident pages
    pub fn cached_row_count(&self) -> usize {
        self.shared
            .state
            .borrow()
            .pages
            .values()
            .map(|slot| match slot {
                PageSlot::Resident(rows) => rows.len(),
                PageSlot::Pending { .. } | PageSlot::Failed => 0,
            })
            .sum()
    }

    /// Number of fetches currently in flight
    pub fn pending_count(&self) -> usize {
        self.shared
            .state
            .borrow()
            .pages
            .values()
            .filter(|slot| matches!(slot, PageSlot::Pending { .. }))
            .count()
    }

    /// Drop every page. In-flight fetches settle as discarded.
    pub fn clear(&self) {
        let mut state = self.shared.state.borrow_mut();
        let dropped = state.pages.len();
        state.pages.clear();
        debug!(dropped, "page cache cleared");
    }

    /// Update the dataset size.
    ///
    /// Pages whose row bounds are unchanged under the new total are kept;
    /// the rest (including the previous tail page) are dropped.
    pub fn set_total_rows(&self, total_rows: usize) {
        let mut state = self.shared.state.borrow_mut();
        let old_total = state.total_rows;
        if old_total == total_rows {
            return;
        }
        let page_size = state.page_size;
        state.pages.retain(|page, _| {
            let before = page_bounds(*page, page_size, old_total);
            before.is_some() && before == page_bounds(*page, page_size, total_rows)
        });
        state.total_rows = total_rows;
        debug!(old_total, total_rows, kept = state.pages.len(), "total rows changed");
    }

    /// Change the page size. Every page is dropped because page indices shift.
    pub fn set_page_size(&self, page_size: usize) {
        let mut state = self.shared.state.borrow_mut();
        let page_size = page_size.max(1);
        if state.page_size != page_size {
            state.page_size = page_size;
            state.pages.clear();
        }
    }

    /// Replace the row loader. Cached pages are kept; callers that need fresh
    /// rows clear the cache themselves.
    pub fn set_loader(&self, loader: impl RowLoader + 'static) {
        self.shared.state.borrow_mut().loader = Rc::new(loader);
    }

    /// Observe pages becoming resident
    pub fn subscribe(&self, handler: impl Fn(&DataChanged) + 'static) -> SubscriptionId {
        self.shared.changed.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.changed.unsubscribe(id)
    }

    /// Returns the handle plus whether a new fetch was started.
    fn request(&self, page: PageIndex) -> Option<(PageFetch, bool)> {
        let (fetch_id, start, end, loader) = {
            let mut state = self.shared.state.borrow_mut();
            let (start, end) = page_bounds(page, state.page_size, state.total_rows)?;
            match state.pages.get(&page) {
                Some(PageSlot::Pending { handle, .. }) => return Some((handle.clone(), false)),
                Some(PageSlot::Resident(_)) => {
                    return Some((future::ready(PageOutcome::Loaded).boxed_local().shared(), false))
                }
                Some(PageSlot::Failed) | None => {}
            }
            let fetch_id = state.next_fetch_id;
            state.next_fetch_id = state.next_fetch_id.wrapping_add(1);
            (fetch_id, start, end, Rc::clone(&state.loader))
        };

        debug!(page, start, end, "fetching page");
        // The loader runs outside the borrow so it may read cache state.
        let load = loader.load(start, end);
        let weak = Rc::downgrade(&self.shared);
        let handle = async move {
            let result = load.await;
            settle(&weak, page, fetch_id, (start, end), result)
        }
        .boxed_local()
        .shared();

        self.shared.state.borrow_mut().pages.insert(
            page,
            PageSlot::Pending {
                fetch_id,
                handle: handle.clone(),
            },
        );

        if let Err(err) = self.spawner.spawn_local(handle.clone().map(|_| ())) {
            warn!(page, error = %err, "could not spawn page fetch");
            let mut state = self.shared.state.borrow_mut();
            if matches!(state.pages.get(&page), Some(PageSlot::Pending { fetch_id: id, .. }) if *id == fetch_id) {
                state.pages.remove(&page);
            }
            return None;
        }
        Some((handle, true))
    }
}

fn settle(
    weak: &Weak<CacheShared>,
    page: PageIndex,
    fetch_id: u64,
    (start, end): (usize, usize),
    result: LoadResult,
) -> PageOutcome {
    let Some(shared) = weak.upgrade() else {
        return PageOutcome::Discarded;
    };
    let outcome = {
        let mut state = shared.state.borrow_mut();
        let current = matches!(
            state.pages.get(&page),
            Some(PageSlot::Pending { fetch_id: id, .. }) if *id == fetch_id
        );
        if !current {
            debug!(page, fetch_id, "discarding stale page fetch");
            PageOutcome::Discarded
        } else {
            match result {
                Ok(mut rows) => {
                    rows.truncate(end - start + 1);
                    let rows = rows.into_iter().map(Rc::new).collect();
                    state.pages.insert(page, PageSlot::Resident(rows));
                    PageOutcome::Loaded
                }
                Err(err) => {
                    warn!(page, error = %err, "page fetch failed");
                    state.pages.insert(page, PageSlot::Failed);
                    PageOutcome::Failed
                }
            }
        }
    };
    if outcome == PageOutcome::Loaded {
        shared.changed.publish(&DataChanged { page, start, end });
    }
    outcome
}

impl RowSource for PageCache {
    fn row(&self, index: usize) -> Option<Rc<Row>> {
        self.get_row(index)
    }
}
