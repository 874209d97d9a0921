//! `Grid` - the scroll/pagination controller and primary entry point.
//!
//! The grid owns the page cache, the compositor and the single authoritative
//! scroll offset. It handles:
//! - Wheel, thumb-drag, track-click and programmatic scrolling
//! - Deciding which pages to fetch for the visible window
//! - Scrollbar geometry and visibility
//! - Coalescing repaints into one compositor pass per frame
//!
//! Every scroll path funnels through [`Grid::update_scroll_position`]; nothing
//! else writes the scroll offset.

mod events;
mod scroll;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::task::LocalSpawn;
use serde::Serialize;
use tracing::{debug, trace};

pub use scroll::{Axis, DragState, Scrollbars, ThumbDrag, ThumbGeometry, MIN_THUMB_LENGTH};

use crate::config::{GridOptions, Theme};
use crate::data::{page_of, FetchPolicy, PageCache, PageOutcome, RowLoader};
use crate::events::{DataChanged, GridEvents};
use crate::layout::{content_height, ColumnLayout, RowRange, ScrollState};
use crate::render::{Compositor, Frame, FrameScheduler, LayerKind, PaintStats, SurfaceProvider};
use crate::types::{CellPos, Column, Selection};

/// Position within the paged dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    /// 1-based page holding the first visible row
    pub page_num: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// How a scroll was caused; decides the fetch policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollMode {
    /// Wheel and other incremental movement: preload ahead
    Organic,
    /// Track clicks and programmatic jumps: fetch only the landing pages
    Jump,
}

/// State behind the controller's `RefCell`
pub(crate) struct SharedState {
    pub(crate) options: GridOptions,
    pub(crate) columns: Rc<ColumnLayout>,
    pub(crate) scroll: ScrollState,
    pub(crate) compositor: Compositor,
    pub(crate) scrollbars: Scrollbars,
    pub(crate) drag: DragState,
    pub(crate) selection: Option<Selection>,
    pub(crate) hover: Option<CellPos>,
    pub(crate) last_paint: PaintStats,
}

impl SharedState {
    fn content_width(&self) -> f64 {
        self.columns.total_width()
    }

    fn content_height(&self) -> f64 {
        content_height(self.options.total_rows, self.options.row_height)
    }

    fn max_scroll(&self) -> ScrollState {
        let viewport = self.options.data_viewport();
        ScrollState {
            scroll_x: viewport.max_scroll_x(self.content_width()),
            scroll_y: viewport.max_scroll_y(self.options.total_rows, self.options.row_height),
        }
    }

    fn clamp(&self, target: ScrollState) -> ScrollState {
        self.options
            .data_viewport()
            .clamp_scroll(target, self.content_width(), self.content_height())
    }

    fn update_scrollbars(&mut self) {
        let viewport = self.options.data_viewport();
        self.scrollbars = Scrollbars {
            horizontal: ThumbGeometry::compute(viewport.width, self.content_width(), self.scroll.scroll_x),
            vertical: ThumbGeometry::compute(viewport.height, self.content_height(), self.scroll.scroll_y),
        };
    }

    fn visible_rows(&self) -> Option<RowRange> {
        self.options.data_viewport().visible_rows(
            self.scroll.scroll_y,
            self.options.row_height,
            self.options.total_rows,
        )
    }

    /// Rows to make resident for the current offset, and how
    fn fetch_plan(&self, mode: ScrollMode) -> Option<FetchPlan> {
        let total = self.options.total_rows;
        let last = total.checked_sub(1)?;
        if !self.options.virtual_scroll.enabled {
            return Some(FetchPlan {
                visible: RowRange { start: 0, end: last },
                buffer: 0,
                policy: FetchPolicy::DirectJump,
            });
        }
        let policy = match mode {
            ScrollMode::Organic if self.drag.vertical.is_none() => FetchPolicy::Preload {
                threshold: self.options.virtual_scroll.preload_threshold,
            },
            ScrollMode::Organic | ScrollMode::Jump => FetchPolicy::DirectJump,
        };
        Some(FetchPlan {
            visible: self.visible_rows()?,
            buffer: self.options.virtual_scroll.buffer_size,
            policy,
        })
    }
}

/// Visible rows, overscan and policy handed to the cache
#[derive(Debug, Clone, Copy)]
struct FetchPlan {
    visible: RowRange,
    buffer: usize,
    policy: FetchPolicy,
}

impl FetchPlan {
    fn run(self, cache: &PageCache) -> usize {
        cache.ensure_visible(self.visible, self.buffer, self.policy)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

struct Inner {
    state: RefCell<SharedState>,
    cache: PageCache,
    frames: Rc<dyn FrameScheduler>,
    events: GridEvents,
}

/// Virtualized table controller. Cloning yields another handle to the same grid.
#[derive(Clone)]
pub struct Grid {
    inner: Rc<Inner>,
}

/// Non-owning handle for callbacks the grid itself keeps alive
#[derive(Clone)]
pub struct WeakGrid {
    inner: Weak<Inner>,
}

impl WeakGrid {
    pub fn upgrade(&self) -> Option<Grid> {
        self.inner.upgrade().map(|inner| Grid { inner })
    }
}

impl Grid {
    /// Create a grid, its layers and its page cache.
    ///
    /// Options are normalized first. When rows exist the first page is
    /// requested immediately and a paint is scheduled.
    pub fn new(
        options: GridOptions,
        loader: impl RowLoader + 'static,
        surfaces: &dyn SurfaceProvider,
        frames: Rc<dyn FrameScheduler>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        let options = options.normalized();
        let columns = Rc::new(ColumnLayout::new(options.columns.clone()));
        let mut compositor = Compositor::new(surfaces, &options);
        compositor.set_columns(&columns);

        let cache = PageCache::new(loader, spawner, options.page_size());
        cache.set_total_rows(options.total_rows);

        let mut state = SharedState {
            options,
            columns,
            scroll: ScrollState::ORIGIN,
            compositor,
            scrollbars: Scrollbars::default(),
            drag: DragState::default(),
            selection: None,
            hover: None,
            last_paint: PaintStats::default(),
        };
        state.update_scrollbars();

        let inner = Rc::new(Inner {
            state: RefCell::new(state),
            cache,
            frames,
            events: GridEvents::default(),
        });
        let weak = WeakGrid {
            inner: Rc::downgrade(&inner),
        };
        inner.cache.subscribe(move |event| {
            if let Some(grid) = weak.upgrade() {
                grid.on_data_changed(event);
            }
        });

        let grid = Self { inner };
        grid.load_initial_data();
        if let Some(page_num) = grid.starting_page() {
            // Arrival is picked up through data-changed
            drop(grid.go_to_page(page_num));
        }
        grid.schedule_render();
        grid
    }

    /// Configured page to open on when pagination is enabled
    fn starting_page(&self) -> Option<usize> {
        let s = self.inner.state.borrow();
        let pagination = s.options.pagination;
        (pagination.enabled && pagination.page_num > 1).then_some(pagination.page_num)
    }

    pub fn downgrade(&self) -> WeakGrid {
        WeakGrid {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn events(&self) -> &GridEvents {
        &self.inner.events
    }

    pub fn cache(&self) -> &PageCache {
        &self.inner.cache
    }

    /// Current (normalized) options
    pub fn options(&self) -> GridOptions {
        self.inner.state.borrow().options.clone()
    }

    pub fn scroll(&self) -> ScrollState {
        self.inner.state.borrow().scroll
    }

    pub fn max_scroll(&self) -> ScrollState {
        self.inner.state.borrow().max_scroll()
    }

    pub fn scrollbars(&self) -> Scrollbars {
        self.inner.state.borrow().scrollbars
    }

    pub fn total_rows(&self) -> usize {
        self.inner.state.borrow().options.total_rows
    }

    /// Visible row range for the current offset (without overscan)
    pub fn visible_rows(&self) -> Option<RowRange> {
        self.inner.state.borrow().visible_rows()
    }

    pub fn is_layer_dirty(&self, kind: LayerKind) -> bool {
        self.inner
            .state
            .borrow()
            .compositor
            .layer(kind)
            .is_some_and(|l| l.is_dirty())
    }

    /// Scroll snapshot held by each layer, bottom to top
    pub fn layer_scrolls(&self) -> Vec<(LayerKind, ScrollState)> {
        self.inner
            .state
            .borrow()
            .compositor
            .layers()
            .iter()
            .map(|l| (l.kind(), l.scroll()))
            .collect()
    }

    pub fn render_scheduled(&self) -> bool {
        self.inner.state.borrow().compositor.is_render_scheduled()
    }

    /// Stats of the most recent paint
    pub fn last_paint(&self) -> PaintStats {
        self.inner.state.borrow().last_paint.clone()
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    /// Clamp and apply a new offset, then fetch, relayout thumbs and repaint.
    ///
    /// This is the only writer of the scroll offset.
    pub fn update_scroll_position(&self, x: f64, y: f64) -> ScrollState {
        self.apply_scroll(ScrollState::new(x, y), ScrollMode::Organic)
    }

    /// Alias of [`update_scroll_position`](Self::update_scroll_position) for callers.
    pub fn scroll_to(&self, x: f64, y: f64) -> ScrollState {
        self.update_scroll_position(x, y)
    }

    fn apply_scroll(&self, target: ScrollState, mode: ScrollMode) -> ScrollState {
        let (scroll, changed, plan) = {
            let mut s = self.inner.state.borrow_mut();
            let scroll = s.clamp(target);
            let changed = !scroll.approx_eq(&s.scroll);
            s.scroll = scroll;
            s.compositor.set_scroll_position(scroll);
            let plan = s.fetch_plan(mode);
            s.update_scrollbars();
            (scroll, changed, plan)
        };
        if let Some(plan) = plan {
            let started = plan.run(&self.inner.cache);
            if started > 0 {
                trace!(started, start = plan.visible.start, end = plan.visible.end, "fetching for window");
            }
        }
        self.schedule_render();
        if changed {
            self.inner.events.scroll.publish(&scroll);
        }
        scroll
    }

    /// Wheel input. With `shift` the vertical delta scrolls horizontally.
    /// An axis whose content fits the viewport does not move.
    pub fn wheel(&self, delta_x: f64, delta_y: f64, shift: bool) -> ScrollState {
        let (dx, dy) = if shift {
            (finite_or_zero(delta_y), 0.0)
        } else {
            (finite_or_zero(delta_x), finite_or_zero(delta_y))
        };
        let target = {
            let s = self.inner.state.borrow();
            let viewport = s.options.data_viewport();
            let mut target = s.scroll;
            if s.content_height() > viewport.height {
                target.scroll_y += dy;
            }
            if s.content_width() > viewport.width {
                target.scroll_x += dx;
            }
            target
        };
        self.apply_scroll(target, ScrollMode::Organic)
    }

    /// Start dragging a thumb at pointer position `pointer` (track coordinates).
    /// Returns `false` when that scrollbar is hidden.
    pub fn begin_thumb_drag(&self, axis: Axis, pointer: f64) -> bool {
        let mut s = self.inner.state.borrow_mut();
        let thumb = s.scrollbars.get(axis);
        if !thumb.visible {
            return false;
        }
        s.drag.set(
            axis,
            Some(ThumbDrag {
                start_pointer: pointer,
                start_offset: thumb.offset,
            }),
        );
        true
    }

    /// Move an active thumb drag. No-op when that axis is not dragging.
    pub fn drag_thumb(&self, axis: Axis, pointer: f64) {
        let target = {
            let s = self.inner.state.borrow();
            let Some(drag) = s.drag.get(axis) else {
                return;
            };
            let thumb = s.scrollbars.get(axis);
            let max = s.max_scroll();
            let offset = finite_or_zero(drag.offset_at(pointer));
            let mut target = s.scroll;
            match axis {
                Axis::Horizontal => target.scroll_x = thumb.scroll_for_offset(offset, max.scroll_x),
                Axis::Vertical => target.scroll_y = thumb.scroll_for_offset(offset, max.scroll_y),
            }
            target
        };
        self.apply_scroll(target, ScrollMode::Organic);
    }

    /// Finish a thumb drag. Releasing the vertical thumb runs a preload check
    /// for the landing position.
    pub fn end_thumb_drag(&self, axis: Axis) {
        let plan = {
            let mut s = self.inner.state.borrow_mut();
            if s.drag.get(axis).is_none() {
                return;
            }
            s.drag.set(axis, None);
            match axis {
                Axis::Vertical => s.fetch_plan(ScrollMode::Organic),
                Axis::Horizontal => None,
            }
        };
        if let Some(plan) = plan {
            plan.run(&self.inner.cache);
        }
    }

    pub fn is_dragging(&self, axis: Axis) -> bool {
        self.inner.state.borrow().drag.get(axis).is_some()
    }

    /// Click on a scrollbar track at `pos` (track coordinates): the thumb
    /// center jumps to the click point.
    pub fn click_track(&self, axis: Axis, pos: f64) {
        let target = {
            let s = self.inner.state.borrow();
            let thumb = s.scrollbars.get(axis);
            if !thumb.visible {
                return;
            }
            let max = s.max_scroll();
            let mut target = s.scroll;
            match axis {
                Axis::Horizontal => target.scroll_x = thumb.scroll_for_track_click(pos, max.scroll_x),
                Axis::Vertical => target.scroll_y = thumb.scroll_for_track_click(pos, max.scroll_y),
            }
            target
        };
        self.apply_scroll(target, ScrollMode::Jump);
    }

    /// Scroll so `row` is at the top (clamped), and resolve once the page
    /// covering `row` has settled.
    pub fn scroll_to_index(&self, row: usize) -> LocalBoxFuture<'static, PageOutcome> {
        let (target, row) = {
            let s = self.inner.state.borrow();
            let Some(last) = s.options.total_rows.checked_sub(1) else {
                return future::ready(PageOutcome::Discarded).boxed_local();
            };
            let row = row.min(last);
            let mut target = s.scroll;
            target.scroll_y = row as f64 * s.options.row_height;
            (target, row)
        };
        self.apply_scroll(target, ScrollMode::Jump);
        let page = page_of(row, self.inner.cache.page_size());
        match self.inner.cache.fetch_page(page) {
            Some(handle) => handle.boxed_local(),
            None => future::ready(PageOutcome::Failed).boxed_local(),
        }
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    pub fn pagination_info(&self) -> PaginationInfo {
        let s = self.inner.state.borrow();
        let page_size = s.options.page_size();
        let total = s.options.total_rows;
        let first = s.visible_rows().map_or(0, |r| r.start);
        PaginationInfo {
            page_num: if total == 0 { 1 } else { page_of(first, page_size) + 1 },
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        }
    }

    /// Jump to the first row of a 1-based page
    pub fn go_to_page(&self, page_num: usize) -> LocalBoxFuture<'static, PageOutcome> {
        let row = {
            let mut s = self.inner.state.borrow_mut();
            let page_size = s.options.page_size();
            let pages = s.options.total_rows.div_ceil(page_size).max(1);
            let page_num = page_num.clamp(1, pages);
            s.options.pagination.page_num = page_num;
            (page_num - 1) * page_size
        };
        self.scroll_to_index(row)
    }

    // ------------------------------------------------------------------
    // Data and configuration
    // ------------------------------------------------------------------

    /// Change the dataset size. Extents, scrollbars and the affected layers
    /// are refreshed; the offset is re-clamped only when it no longer fits.
    pub fn set_total_rows(&self, total_rows: usize) {
        let reclamp = {
            let mut s = self.inner.state.borrow_mut();
            if s.options.total_rows == total_rows {
                return;
            }
            debug!(old = s.options.total_rows, new = total_rows, "set total rows");
            s.options.total_rows = total_rows;
            for kind in [LayerKind::Background, LayerKind::Data, LayerKind::Decoration] {
                s.compositor.mark_dirty(kind);
            }
            s.update_scrollbars();
            let clamped = s.clamp(s.scroll);
            (!clamped.approx_eq(&s.scroll)).then_some(clamped)
        };
        self.inner.cache.set_total_rows(total_rows);
        self.load_initial_data();
        match reclamp {
            Some(clamped) => {
                self.apply_scroll(clamped, ScrollMode::Organic);
            }
            // Pages at the old tail may have been dropped
            None => self.refresh_window(),
        }
        self.schedule_render();
    }

    /// Fetch whatever the current window lacks, without preloading.
    fn refresh_window(&self) {
        let plan = self.inner.state.borrow().fetch_plan(ScrollMode::Jump);
        if let Some(plan) = plan {
            plan.run(&self.inner.cache);
        }
    }

    /// Replace the column list
    pub fn set_columns(&self, columns: Vec<Column>) {
        let reclamp = {
            let mut s = self.inner.state.borrow_mut();
            let layout = Rc::new(ColumnLayout::new(columns.clone()));
            s.compositor.set_columns(&layout);
            s.columns = layout;
            s.options.columns = columns;
            s.update_scrollbars();
            let clamped = s.clamp(s.scroll);
            (!clamped.approx_eq(&s.scroll)).then_some(clamped)
        };
        match reclamp {
            Some(clamped) => {
                self.apply_scroll(clamped, ScrollMode::Organic);
            }
            None => self.schedule_render(),
        }
    }

    /// Resize the widget (logical pixels) and device pixel ratio.
    pub fn resize(&self, width: f64, height: f64, dpr: f64) {
        let current = {
            let mut s = self.inner.state.borrow_mut();
            s.options.set_size(width, height, dpr);
            let options = s.options.clone();
            s.compositor.resize(&options);
            debug!(width = options.width, height = options.height, dpr = options.device_pixel_ratio, "resize");
            s.scroll
        };
        // Visible window changed: re-clamp and re-check data
        self.apply_scroll(current, ScrollMode::Organic);
    }

    pub fn set_theme(&self, theme: Theme) {
        {
            let mut s = self.inner.state.borrow_mut();
            s.options.theme = theme.normalized();
            s.compositor.mark_all_dirty();
        }
        self.schedule_render();
    }

    pub fn set_show_grid(&self, show: bool) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.options.show_grid == show {
                return;
            }
            s.options.show_grid = show;
            s.compositor.mark_dirty(LayerKind::Data);
        }
        self.schedule_render();
    }

    /// Toggling the header changes the data area height.
    pub fn set_show_header(&self, show: bool) {
        let (width, height, dpr) = {
            let mut s = self.inner.state.borrow_mut();
            if s.options.show_header == show {
                return;
            }
            s.options.show_header = show;
            s.compositor.mark_dirty(LayerKind::Header);
            (s.options.width, s.options.height, s.options.device_pixel_ratio)
        };
        self.resize(width, height, dpr);
    }

    /// Replace the row loader. Cached pages are kept; call
    /// [`clear_cache`](Self::clear_cache) to refetch through the new loader.
    pub fn set_loader(&self, loader: impl RowLoader + 'static) {
        self.inner.cache.set_loader(loader);
        self.load_initial_data();
    }

    /// Drop every cached page, then reload the first page and the current
    /// window.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
        self.inner
            .state
            .borrow_mut()
            .compositor
            .mark_dirty(LayerKind::Data);
        self.load_initial_data();
        self.refresh_window();
        self.schedule_render();
    }

    /// Change the rows per page. Page indices shift, so every cached page is
    /// dropped and the current window refetched.
    pub fn set_page_size(&self, page_size: usize) {
        let page_size = page_size.max(1);
        {
            let mut s = self.inner.state.borrow_mut();
            if s.options.pagination.page_size == page_size {
                return;
            }
            debug!(old = s.options.pagination.page_size, new = page_size, "set page size");
            s.options.pagination.page_size = page_size;
            s.compositor.mark_dirty(LayerKind::Data);
        }
        self.inner.cache.set_page_size(page_size);
        self.load_initial_data();
        self.refresh_window();
        self.schedule_render();
    }

    /// Fetch the first page when nothing is cached and rows exist. With
    /// virtual scrolling disabled every row is fetched instead.
    fn load_initial_data(&self) {
        let (total, virtual_scroll) = {
            let s = self.inner.state.borrow();
            (s.options.total_rows, s.options.virtual_scroll.enabled)
        };
        let cache = &self.inner.cache;
        if total == 0 || cache.cached_row_count() > 0 {
            return;
        }
        if virtual_scroll {
            cache.fetch_page(0);
        } else {
            cache.ensure_range(0, total - 1);
        }
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    /// Request a compositor pass on the next frame. Calls made while a pass
    /// is pending are coalesced into it.
    pub fn schedule_render(&self) {
        let request = self.inner.state.borrow_mut().compositor.schedule_render();
        if !request {
            return;
        }
        let weak = self.downgrade();
        self.inner.frames.request_frame(Box::new(move || {
            if let Some(grid) = weak.upgrade() {
                grid.paint();
            }
        }));
    }

    /// Run a compositor pass now against the authoritative scroll offset.
    pub fn paint(&self) -> PaintStats {
        let mut guard = self.inner.state.borrow_mut();
        let s = &mut *guard;
        let frame = Frame {
            options: &s.options,
            viewport: s.options.data_viewport(),
            scroll: s.scroll,
            columns: &s.columns,
            rows: &self.inner.cache,
            total_rows: s.options.total_rows,
        };
        let stats = s.compositor.render(&frame);
        s.last_paint = stats.clone();
        stats
    }

    fn on_data_changed(&self, event: &DataChanged) {
        let visible = {
            let mut s = self.inner.state.borrow_mut();
            let hit = s
                .visible_rows()
                .is_some_and(|r| event.start <= r.end && event.end >= r.start);
            if hit {
                s.compositor.mark_dirty(LayerKind::Data);
            }
            hit
        };
        if visible {
            self.schedule_render();
        }
    }
}
