//! WebAssembly binding: `VortexTable` mounts a grid into a DOM container.
//!
//! The container receives one canvas per layer plus two DOM scrollbars.
//! Wheel, pointer and scrollbar input is forwarded to the [`Grid`]; paints
//! run on `requestAnimationFrame` and page fetches on the microtask queue.

mod canvas;
mod runtime;

use std::collections::HashMap;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Event, EventTarget, HtmlElement, MouseEvent, WheelEvent};

pub use canvas::{CanvasSurface, CanvasSurfaceProvider};
pub use runtime::{BrowserSpawner, JsRowLoader, RafFrames};

use crate::config::{GridOptions, Theme};
use crate::data::{InMemoryLoader, PageOutcome};
use crate::events::SubscriptionId;
use crate::layout::ScrollState;
use crate::types::{CellPos, Column, Selection};
use crate::viewer::{Axis, Grid, WeakGrid};

/// Scrollbar thickness in CSS pixels
const SCROLLBAR_SIZE: f64 = 10.0;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A DOM listener removed from its target on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        );
        Self {
            target: target.clone(),
            kind,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Track and thumb elements of one scrollbar
#[derive(Clone)]
struct ScrollbarElements {
    axis: Axis,
    track: HtmlElement,
    thumb: HtmlElement,
}

impl ScrollbarElements {
    fn create(document: &Document, container: &HtmlElement, axis: Axis) -> Result<Self, JsValue> {
        let track: HtmlElement = document.create_element("div")?.dyn_into()?;
        let thumb: HtmlElement = document.create_element("div")?.dyn_into()?;
        let style = track.style();
        style.set_property("position", "absolute")?;
        style.set_property("z-index", "10")?;
        style.set_property("background", "transparent")?;
        let style = thumb.style();
        style.set_property("position", "absolute")?;
        style.set_property("border-radius", "5px")?;
        style.set_property("background", crate::render::palette::SCROLLBAR_THUMB)?;
        style.set_property("cursor", "pointer")?;
        match axis {
            Axis::Vertical => {
                style.set_property("left", "0px")?;
                style.set_property("width", &format!("{SCROLLBAR_SIZE}px"))?;
            }
            Axis::Horizontal => {
                style.set_property("top", "0px")?;
                style.set_property("height", &format!("{SCROLLBAR_SIZE}px"))?;
            }
        }
        track.append_child(&thumb)?;
        container.append_child(&track)?;
        Ok(Self { axis, track, thumb })
    }

    /// Place the track along the data area and the thumb per the grid.
    fn sync(&self, grid: &Grid) {
        let options = grid.options();
        let top = options.effective_header_height();
        let data = options.data_viewport();
        let geometry = grid.scrollbars().get(self.axis);
        let track = self.track.style();
        let thumb = self.thumb.style();
        let (track_css, thumb_css): ([(&str, String); 4], [(&str, String); 2]) = match self.axis {
            Axis::Vertical => (
                [
                    ("left", format!("{}px", data.width - SCROLLBAR_SIZE)),
                    ("top", format!("{top}px")),
                    ("width", format!("{SCROLLBAR_SIZE}px")),
                    ("height", format!("{}px", data.height)),
                ],
                [
                    ("top", format!("{}px", geometry.offset)),
                    ("height", format!("{}px", geometry.length)),
                ],
            ),
            Axis::Horizontal => (
                [
                    ("left", "0px".to_string()),
                    ("top", format!("{}px", options.height - SCROLLBAR_SIZE)),
                    ("width", format!("{}px", data.width)),
                    ("height", format!("{SCROLLBAR_SIZE}px")),
                ],
                [
                    ("left", format!("{}px", geometry.offset)),
                    ("width", format!("{}px", geometry.length)),
                ],
            ),
        };
        for (name, value) in &track_css {
            let _ = track.set_property(name, value);
        }
        for (name, value) in &thumb_css {
            let _ = thumb.set_property(name, value);
        }
        let _ = track.set_property("opacity", &geometry.opacity().to_string());
        let pointer = if geometry.visible { "auto" } else { "none" };
        let _ = track.set_property("pointer-events", pointer);
    }

    /// Pointer coordinate along this scrollbar's axis, relative to the track
    fn local(&self, event: &MouseEvent) -> f64 {
        let rect = self.track.get_bounding_client_rect();
        match self.axis {
            Axis::Vertical => f64::from(event.client_y()) - rect.top(),
            Axis::Horizontal => f64::from(event.client_x()) - rect.left(),
        }
    }

    fn client(&self, event: &MouseEvent) -> f64 {
        match self.axis {
            Axis::Vertical => f64::from(event.client_y()),
            Axis::Horizontal => f64::from(event.client_x()),
        }
    }
}

#[derive(Clone, Copy)]
enum GridEvent {
    CellClick,
    SelectionChange,
    HoverChange,
    Scroll,
}

impl GridEvent {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "cell-click" => Some(Self::CellClick),
            "selection-change" => Some(Self::SelectionChange),
            "hover-change" => Some(Self::HoverChange),
            "scroll" => Some(Self::Scroll),
            _ => None,
        }
    }
}

fn forward<T: serde::Serialize + 'static>(callback: Function) -> impl Fn(&T) + 'static {
    move |event: &T| {
        if let Ok(value) = serde_wasm_bindgen::to_value(event) {
            let _ = callback.call1(&JsValue::NULL, &value);
        }
    }
}

fn outcome_name(outcome: PageOutcome) -> &'static str {
    match outcome {
        PageOutcome::Loaded => "loaded",
        PageOutcome::Failed => "failed",
        PageOutcome::Discarded => "discarded",
    }
}

/// Virtualized canvas table for the browser.
#[wasm_bindgen]
pub struct VortexTable {
    grid: Grid,
    provider: Rc<CanvasSurfaceProvider>,
    scrollbars: [ScrollbarElements; 2],
    listeners: Vec<Listener>,
    subscriptions: HashMap<u32, (GridEvent, SubscriptionId)>,
    next_subscription: u32,
    scroll_sync: Option<SubscriptionId>,
}

impl VortexTable {
    fn wire_events(grid: &WeakGrid, container: &HtmlElement, bars: &[ScrollbarElements; 2]) -> Vec<Listener> {
        let mut listeners = Vec::new();

        {
            let grid = grid.clone();
            listeners.push(Listener::attach(container, "wheel", move |event: Event| {
                let (Some(grid), Some(wheel)) = (grid.upgrade(), event.dyn_ref::<WheelEvent>()) else {
                    return;
                };
                wheel.prevent_default();
                grid.wheel(wheel.delta_x(), wheel.delta_y(), wheel.shift_key());
            }));
        }

        // Data-area coordinates for pointer events on the container
        let local = {
            let container = container.clone();
            move |grid: &Grid, event: &MouseEvent| {
                let rect = container.get_bounding_client_rect();
                let top = grid.options().effective_header_height();
                (
                    f64::from(event.client_x()) - rect.left(),
                    f64::from(event.client_y()) - rect.top() - top,
                )
            }
        };

        {
            let grid = grid.clone();
            let local = local.clone();
            listeners.push(Listener::attach(container, "mousemove", move |event: Event| {
                let (Some(grid), Some(mouse)) = (grid.upgrade(), event.dyn_ref::<MouseEvent>()) else {
                    return;
                };
                if grid.is_dragging(Axis::Vertical) || grid.is_dragging(Axis::Horizontal) {
                    return;
                }
                let (x, y) = local(&grid, mouse);
                if y < 0.0 {
                    grid.pointer_leave();
                } else {
                    grid.pointer_move(x, y);
                }
            }));
        }

        {
            let grid = grid.clone();
            listeners.push(Listener::attach(container, "mouseleave", move |_event: Event| {
                if let Some(grid) = grid.upgrade() {
                    grid.pointer_leave();
                }
            }));
        }

        {
            let grid = grid.clone();
            let tracks: Vec<EventTarget> = bars.iter().map(|b| b.track.clone().into()).collect();
            let thumbs: Vec<EventTarget> = bars.iter().map(|b| b.thumb.clone().into()).collect();
            listeners.push(Listener::attach(container, "click", move |event: Event| {
                let (Some(grid), Some(mouse)) = (grid.upgrade(), event.dyn_ref::<MouseEvent>()) else {
                    return;
                };
                let on_scrollbar = event
                    .target()
                    .is_some_and(|t| tracks.contains(&t) || thumbs.contains(&t));
                if on_scrollbar {
                    return;
                }
                let (x, y) = local(&grid, mouse);
                if y >= 0.0 {
                    grid.pointer_click(x, y);
                }
            }));
        }

        for bar in bars {
            {
                let grid = grid.clone();
                let bar_for_thumb = bar.clone();
                listeners.push(Listener::attach(&bar.thumb, "mousedown", move |event: Event| {
                    let (Some(grid), Some(mouse)) = (grid.upgrade(), event.dyn_ref::<MouseEvent>()) else {
                        return;
                    };
                    mouse.prevent_default();
                    mouse.stop_propagation();
                    grid.begin_thumb_drag(bar_for_thumb.axis, bar_for_thumb.client(mouse));
                }));
            }
            {
                let grid = grid.clone();
                let bar_for_track = bar.clone();
                listeners.push(Listener::attach(&bar.track, "mousedown", move |event: Event| {
                    let (Some(grid), Some(mouse)) = (grid.upgrade(), event.dyn_ref::<MouseEvent>()) else {
                        return;
                    };
                    let track: EventTarget = bar_for_track.track.clone().into();
                    if event.target().as_ref() != Some(&track) {
                        return;
                    }
                    mouse.prevent_default();
                    grid.click_track(bar_for_track.axis, bar_for_track.local(mouse));
                }));
            }
        }

        // Drags continue outside the container
        if let Some(window) = web_sys::window() {
            let window: EventTarget = window.into();
            {
                let grid = grid.clone();
                let bars = bars.clone();
                listeners.push(Listener::attach(&window, "mousemove", move |event: Event| {
                    let (Some(grid), Some(mouse)) = (grid.upgrade(), event.dyn_ref::<MouseEvent>()) else {
                        return;
                    };
                    for bar in &bars {
                        if grid.is_dragging(bar.axis) {
                            grid.drag_thumb(bar.axis, bar.client(mouse));
                        }
                    }
                }));
            }
            {
                let grid = grid.clone();
                listeners.push(Listener::attach(&window, "mouseup", move |_event: Event| {
                    if let Some(grid) = grid.upgrade() {
                        grid.end_thumb_drag(Axis::Vertical);
                        grid.end_thumb_drag(Axis::Horizontal);
                    }
                }));
            }
        }

        listeners
    }

    fn sync_scrollbars(&self) {
        for bar in &self.scrollbars {
            bar.sync(&self.grid);
        }
    }
}

#[wasm_bindgen]
impl VortexTable {
    /// Mount a table into `container`.
    ///
    /// `options` follows the `GridOptions` JSON shape. `loader`, when given,
    /// is called as `loader(start, end)` and returns rows or a promise of
    /// rows; otherwise `options.data` is served from memory.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, options: JsValue, loader: Option<Function>) -> Result<VortexTable, JsValue> {
        console_error_panic_hook::set_once();

        let options: GridOptions = if options.is_undefined() || options.is_null() {
            GridOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(js_err)?
        };
        let options = options.normalized();
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;

        let style = container.style();
        style.set_property("position", "relative")?;
        style.set_property("overflow", "hidden")?;
        style.set_property("width", &format!("{}px", options.width))?;
        style.set_property("height", &format!("{}px", options.height))?;

        let provider = Rc::new(CanvasSurfaceProvider::new(
            document.clone(),
            container.clone(),
            options.effective_header_height(),
        ));
        let frames = Rc::new(RafFrames);
        let spawner = Rc::new(BrowserSpawner);
        let grid = match loader {
            Some(function) => Grid::new(options, JsRowLoader::new(function), provider.as_ref(), frames, spawner),
            None => {
                let rows = InMemoryLoader::new(options.data.clone());
                Grid::new(options, rows, provider.as_ref(), frames, spawner)
            }
        };

        let scrollbars = [
            ScrollbarElements::create(&document, &container, Axis::Vertical)?,
            ScrollbarElements::create(&document, &container, Axis::Horizontal)?,
        ];
        for bar in &scrollbars {
            bar.sync(&grid);
        }

        let scroll_sync = {
            let weak = grid.downgrade();
            let bars = scrollbars.clone();
            grid.events().scroll.subscribe(move |_| {
                if let Some(grid) = weak.upgrade() {
                    for bar in &bars {
                        bar.sync(&grid);
                    }
                }
            })
        };

        let listeners = Self::wire_events(&grid.downgrade(), &container, &scrollbars);

        Ok(VortexTable {
            grid,
            provider,
            scrollbars,
            listeners,
            subscriptions: HashMap::new(),
            next_subscription: 1,
            scroll_sync: Some(scroll_sync),
        })
    }

    /// Scroll so `index` is the first visible row. Resolves to `"loaded"`,
    /// `"failed"` or `"discarded"` once its page settles.
    #[wasm_bindgen(js_name = scrollToIndex)]
    pub fn scroll_to_index(&self, index: usize) -> js_sys::Promise {
        let pending = self.grid.scroll_to_index(index);
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(JsValue::from_str(outcome_name(pending.await)))
        })
    }

    /// Jump to a 1-based page
    #[wasm_bindgen(js_name = goToPage)]
    pub fn go_to_page(&self, page_num: usize) -> js_sys::Promise {
        let pending = self.grid.go_to_page(page_num);
        wasm_bindgen_futures::future_to_promise(async move {
            Ok(JsValue::from_str(outcome_name(pending.await)))
        })
    }

    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&self, x: f64, y: f64) {
        self.grid.scroll_to(x, y);
    }

    #[wasm_bindgen(js_name = getScroll)]
    pub fn get_scroll(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.grid.scroll()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setTotalRows)]
    pub fn set_total_rows(&self, total_rows: usize) {
        self.grid.set_total_rows(total_rows);
        self.sync_scrollbars();
    }

    #[wasm_bindgen(js_name = setColumns)]
    pub fn set_columns(&self, columns: JsValue) -> Result<(), JsValue> {
        let columns: Vec<Column> = serde_wasm_bindgen::from_value(columns).map_err(js_err)?;
        self.grid.set_columns(columns);
        self.sync_scrollbars();
        Ok(())
    }

    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, theme: JsValue) -> Result<(), JsValue> {
        let theme: Theme = serde_wasm_bindgen::from_value(theme).map_err(js_err)?;
        self.grid.set_theme(theme);
        Ok(())
    }

    #[wasm_bindgen(js_name = setShowGrid)]
    pub fn set_show_grid(&self, show: bool) {
        self.grid.set_show_grid(show);
    }

    #[wasm_bindgen(js_name = setShowHeader)]
    pub fn set_show_header(&self, show: bool) {
        let mut options = self.grid.options();
        options.show_header = show;
        self.provider.set_data_top(options.effective_header_height());
        self.grid.set_show_header(show);
        self.sync_scrollbars();
    }

    /// Replace the row loader; cached pages are kept
    #[wasm_bindgen(js_name = setLoader)]
    pub fn set_loader(&self, loader: Function) {
        self.grid.set_loader(JsRowLoader::new(loader));
    }

    #[wasm_bindgen(js_name = clearCache)]
    pub fn clear_cache(&self) {
        self.grid.clear_cache();
    }

    #[wasm_bindgen(js_name = setPageSize)]
    pub fn set_page_size(&self, page_size: usize) {
        self.grid.set_page_size(page_size);
    }

    pub fn resize(&self, width: f64, height: f64, dpr: f64) {
        let mut options = self.grid.options();
        options.width = width;
        options.height = height;
        let options = options.normalized();
        let style = self
            .scrollbars
            .first()
            .and_then(|bar| bar.track.parent_element())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(|el| el.style());
        if let Some(style) = style {
            let _ = style.set_property("width", &format!("{}px", options.width));
            let _ = style.set_property("height", &format!("{}px", options.height));
        }
        self.provider.set_data_top(options.effective_header_height());
        self.grid.resize(width, height, dpr);
        self.sync_scrollbars();
    }

    #[wasm_bindgen(js_name = getPaginationInfo)]
    pub fn get_pagination_info(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.grid.pagination_info()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.grid.selection()).map_err(js_err)
    }

    /// Set (`{startRow, startCol, endRow, endCol}`) or clear (`null`) the selection
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&self, selection: JsValue) -> Result<(), JsValue> {
        let selection: Option<Selection> = serde_wasm_bindgen::from_value(selection).map_err(js_err)?;
        self.grid.set_selection(selection);
        Ok(())
    }

    /// Paint now instead of on the next animation frame
    pub fn render(&self) {
        self.grid.paint();
    }

    /// Subscribe to `cell-click`, `selection-change`, `hover-change` or
    /// `scroll`. Returns an id for [`off`](Self::off).
    pub fn on(&mut self, event: &str, callback: Function) -> Result<u32, JsValue> {
        let kind = GridEvent::parse(event).ok_or_else(|| JsValue::from_str(&format!("unknown event: {event}")))?;
        let events = self.grid.events();
        let id = match kind {
            GridEvent::CellClick => events.cell_click.subscribe(forward::<CellPos>(callback)),
            GridEvent::SelectionChange => events.selection_change.subscribe(forward::<Option<Selection>>(callback)),
            GridEvent::HoverChange => events.hover_change.subscribe(forward::<Option<CellPos>>(callback)),
            GridEvent::Scroll => events.scroll.subscribe(forward::<ScrollState>(callback)),
        };
        let handle = self.next_subscription;
        self.next_subscription += 1;
        self.subscriptions.insert(handle, (kind, id));
        Ok(handle)
    }

    pub fn off(&mut self, handle: u32) -> bool {
        let Some((kind, id)) = self.subscriptions.remove(&handle) else {
            return false;
        };
        let events = self.grid.events();
        match kind {
            GridEvent::CellClick => events.cell_click.unsubscribe(id),
            GridEvent::SelectionChange => events.selection_change.unsubscribe(id),
            GridEvent::HoverChange => events.hover_change.unsubscribe(id),
            GridEvent::Scroll => events.scroll.unsubscribe(id),
        }
    }

    /// Detach DOM listeners and subscriptions. Canvases are removed when the
    /// table is freed.
    pub fn destroy(&mut self) {
        self.listeners.clear();
        let handles: Vec<u32> = self.subscriptions.keys().copied().collect();
        for handle in handles {
            self.off(handle);
        }
        if let Some(id) = self.scroll_sync.take() {
            self.grid.events().scroll.unsubscribe(id);
        }
        for bar in &self.scrollbars {
            if let Some(parent) = bar.track.parent_node() {
                let _ = parent.remove_child(&bar.track);
            }
        }
    }
}
