//! Test harness: a headless grid with a loader whose requests resolve only
//! when the test says so.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{FutureExt, LocalBoxFuture};
use vortex_table::data::{LoadResult, RowLoader};
use vortex_table::render::{ManualFrames, RecordingSurfaceProvider};
use vortex_table::{Grid, GridOptions, LoadError};

use super::fixtures;

struct PendingLoad {
    start: usize,
    end: usize,
    reply: oneshot::Sender<LoadResult>,
}

/// Records every requested range and parks the reply until released.
#[derive(Clone, Default)]
pub struct ControlledLoader {
    calls: Rc<RefCell<Vec<(usize, usize)>>>,
    pending: Rc<RefCell<Vec<PendingLoad>>>,
}

impl ControlledLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(start, end)` the loader was asked for, in order
    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Requests not yet answered
    pub fn outstanding(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Answer every outstanding request with synthetic rows.
    pub fn resolve_all(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let count = pending.len();
        for load in pending {
            let _ = load.reply.send(Ok(fixtures::rows(load.start, load.end)));
        }
        count
    }

    /// Answer only the outstanding request for `start..=end`, leaving the
    /// rest parked. Returns whether such a request was waiting.
    pub fn resolve_range(&self, start: usize, end: usize) -> bool {
        let position = self
            .pending
            .borrow()
            .iter()
            .position(|load| load.start == start && load.end == end);
        let Some(position) = position else {
            return false;
        };
        let load = self.pending.borrow_mut().remove(position);
        load.reply.send(Ok(fixtures::rows(load.start, load.end))).is_ok()
    }

    /// Reject every outstanding request.
    pub fn reject_all(&self, reason: &str) -> usize {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let count = pending.len();
        for load in pending {
            let _ = load.reply.send(Err(LoadError::new(load.start, load.end, reason)));
        }
        count
    }
}

impl RowLoader for ControlledLoader {
    fn load(&self, start: usize, end: usize) -> LocalBoxFuture<'static, LoadResult> {
        self.calls.borrow_mut().push((start, end));
        let (reply, response) = oneshot::channel();
        self.pending.borrow_mut().push(PendingLoad { start, end, reply });
        async move {
            response
                .await
                .unwrap_or_else(|_| Err(LoadError::new(start, end, "loader dropped")))
        }
        .boxed_local()
    }
}

pub struct Harness {
    pub pool: LocalPool,
    pub frames: ManualFrames,
    pub surfaces: RecordingSurfaceProvider,
    pub loader: ControlledLoader,
    pub grid: Grid,
}

impl Harness {
    pub fn new(options: GridOptions) -> Self {
        let pool = LocalPool::new();
        let frames = ManualFrames::new();
        let surfaces = RecordingSurfaceProvider::new();
        let loader = ControlledLoader::new();
        let grid = Grid::new(
            options,
            loader.clone(),
            &surfaces,
            Rc::new(frames.clone()),
            Rc::new(pool.spawner()),
        );
        Self {
            pool,
            frames,
            surfaces,
            loader,
            grid,
        }
    }

    pub fn with_rows(total_rows: usize) -> Self {
        Self::new(fixtures::options(total_rows))
    }

    /// Poll fetch tasks without answering any loader request.
    pub fn run_tasks(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Answer all outstanding loads and let the cache settle.
    pub fn resolve(&mut self) -> usize {
        let answered = self.loader.resolve_all();
        self.pool.run_until_stalled();
        answered
    }

    /// Run one display refresh.
    pub fn tick(&self) -> usize {
        self.frames.run_pending()
    }

    /// Resolve loads until none are outstanding, then paint.
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
        while self.resolve() > 0 {}
        self.tick();
    }
}
