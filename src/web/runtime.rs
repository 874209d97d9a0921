//! Browser plumbing for the core seams: frame scheduling, task spawning and
//! a row loader backed by a JavaScript function.

use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use js_sys::{Function, Promise};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::data::{LoadResult, RowLoader};
use crate::error::LoadError;
use crate::render::FrameScheduler;
use crate::types::Row;

/// Schedules paints with `requestAnimationFrame`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RafFrames;

impl FrameScheduler for RafFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let js = Closure::once_into_js(move || callback());
        let _ = window.request_animation_frame(js.unchecked_ref());
    }
}

/// Runs futures on the browser microtask queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

/// Row loader calling `fn(start, end)` in JavaScript.
///
/// The function may return the rows directly or a promise of them. Rows are
/// `{ id, index?, data }` objects.
pub struct JsRowLoader {
    function: Function,
}

impl JsRowLoader {
    pub fn new(function: Function) -> Self {
        Self { function }
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

#[allow(clippy::cast_precision_loss)]
fn index_to_js(index: usize) -> JsValue {
    JsValue::from_f64(index as f64)
}

impl RowLoader for JsRowLoader {
    fn load(&self, start: usize, end: usize) -> LocalBoxFuture<'static, LoadResult> {
        let called = self
            .function
            .call2(&JsValue::NULL, &index_to_js(start), &index_to_js(end));
        async move {
            let value = called.map_err(|e| LoadError::new(start, end, describe(&e)))?;
            let value = match value.dyn_into::<Promise>() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .map_err(|e| LoadError::new(start, end, describe(&e)))?,
                Err(value) => value,
            };
            let mut rows: Vec<Row> = serde_wasm_bindgen::from_value(value)
                .map_err(|e| LoadError::new(start, end, e.to_string()))?;
            for (offset, row) in rows.iter_mut().enumerate() {
                row.index = start + offset;
            }
            Ok(rows)
        }
        .boxed_local()
    }
}
