//! Browser implementations of the core's host seams.

use dirsift_core::markers::{FavoriteSet, FavoriteStore};
use dirsift_core::model::{ItemId, Organization};
use dirsift_core::schedule::{EventLoop, Presenter, RenderBatch, Task, TaskId};
use dirsift_core::traits::Searchable;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IdleRequestOptions, Storage, Window};

/* --------------------------------------------------------------------------
   Event loop
-------------------------------------------------------------------------- */

/// [`EventLoop`] over `setTimeout`, `requestAnimationFrame` and
/// `requestIdleCallback`.
///
/// Each pending task keeps its browser handle and its JS callback. Cancelling
/// clears the browser handle and drops the callback, so a debounced keystroke
/// leaves nothing armed behind it.
#[derive(Clone)]
pub struct BrowserLoop {
    inner: Rc<LoopInner>,
}

struct LoopInner {
    window: Window,
    pending: RefCell<HashMap<u64, Pending>>,
    next_id: Cell<u64>,
    idle: bool,
}

struct Pending {
    task: Task,
    handle: Handle,
    _callback: Closure<dyn FnMut()>,
}

#[derive(Debug, Clone, Copy)]
enum Handle {
    Timeout(i32),
    Frame(i32),
    Idle(u32),
}

impl Handle {
    fn clear(self, window: &Window) {
        match self {
            Handle::Timeout(h) => window.clear_timeout_with_handle(h),
            Handle::Frame(h) => {
                if let Err(err) = window.cancel_animation_frame(h) {
                    web_sys::console::warn_2(&"dirsift: could not cancel frame".into(), &err);
                }
            }
            Handle::Idle(h) => window.cancel_idle_callback(h),
        }
    }
}

impl Drop for LoopInner {
    fn drop(&mut self) {
        for (_, pending) in self.pending.get_mut().drain() {
            pending.handle.clear(&self.window);
        }
    }
}

impl BrowserLoop {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let idle = js_sys::Reflect::has(&window, &JsValue::from_str("requestIdleCallback"))
            .unwrap_or(false);

        Ok(Self {
            inner: Rc::new(LoopInner {
                window,
                pending: RefCell::new(HashMap::new()),
                next_id: Cell::new(0),
                idle,
            }),
        })
    }

    /// Tasks scheduled but neither run nor cancelled.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Arms `task` with `arm`, which hands the callback to the browser and
    /// returns its handle.
    fn schedule(
        &self,
        task: Task,
        arm: impl FnOnce(&Window, &js_sys::Function) -> Result<Handle, JsValue>,
    ) -> TaskId {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);

        let weak: Weak<LoopInner> = Rc::downgrade(&self.inner);
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // Released before the task runs; the task may schedule more work.
            let pending = inner.pending.borrow_mut().remove(&id);
            if let Some(Pending { task, .. }) = pending {
                task();
            }
        });

        match arm(&self.inner.window, callback.as_ref().unchecked_ref()) {
            Ok(handle) => {
                self.inner.pending.borrow_mut().insert(
                    id,
                    Pending {
                        task,
                        handle,
                        _callback: callback,
                    },
                );
            }
            Err(err) => {
                web_sys::console::warn_2(&"dirsift: could not schedule task".into(), &err);
            }
        }
        TaskId(id)
    }
}

impl EventLoop for BrowserLoop {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TaskId {
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        self.schedule(task, |window, callback| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback, delay)
                .map(Handle::Timeout)
        })
    }

    fn request_frame(&self, task: Task) -> TaskId {
        self.schedule(task, |window, callback| {
            window.request_animation_frame(callback).map(Handle::Frame)
        })
    }

    fn request_idle(&self, timeout_ms: u32, task: Task) -> TaskId {
        self.schedule(task, |window, callback| {
            let options = IdleRequestOptions::new();
            options.set_timeout(timeout_ms);
            window
                .request_idle_callback_with_options(callback, &options)
                .map(Handle::Idle)
        })
    }

    fn supports_idle(&self) -> bool {
        self.inner.idle
    }

    fn cancel(&self, id: TaskId) {
        let pending = self.inner.pending.borrow_mut().remove(&id.0);
        if let Some(pending) = pending {
            pending.handle.clear(&self.inner.window);
        }
    }
}

/* --------------------------------------------------------------------------
   Presenter
-------------------------------------------------------------------------- */

/// JSON shape of one item handed to the page.
#[derive(Serialize)]
pub struct ItemView<'a> {
    pub id: ItemId,
    pub name: &'a str,
    pub summary: Option<&'a str>,
    pub tags: &'a [String],
    pub contact_name: &'a str,
    pub email: &'a str,
}

impl<'a> ItemView<'a> {
    pub fn new(id: ItemId, org: &'a Organization) -> Self {
        Self {
            id,
            name: org.name(),
            summary: org.summary(),
            tags: org.tags(),
            contact_name: &org.contact_name,
            email: &org.email,
        }
    }
}

#[derive(Serialize)]
struct BatchView<'a> {
    start: usize,
    total: usize,
    replace: bool,
    stagger_ms: u32,
    items: Vec<ItemView<'a>>,
}

/// Forwards batches to two JS callbacks: `mount(batch)` and `announce(count)`.
///
/// Holds its own snapshot of the records so it never reaches back into the
/// explorer while a batch is being mounted.
pub struct JsPresenter {
    mount: js_sys::Function,
    announce: js_sys::Function,
    records: Rc<RefCell<Rc<[Organization]>>>,
}

impl JsPresenter {
    pub fn new(
        mount: js_sys::Function,
        announce: js_sys::Function,
        records: Rc<RefCell<Rc<[Organization]>>>,
    ) -> Self {
        Self {
            mount,
            announce,
            records,
        }
    }
}

impl Presenter for JsPresenter {
    fn mount(&mut self, batch: RenderBatch) {
        let records = Rc::clone(&self.records.borrow());
        let view = BatchView {
            start: batch.start(),
            total: batch.total(),
            replace: batch.replaces_previous(),
            stagger_ms: batch.stagger_ms(),
            items: batch
                .items()
                .iter()
                .filter_map(|&id| records.get(id as usize).map(|org| ItemView::new(id, org)))
                .collect(),
        };

        let result = serde_wasm_bindgen::to_value(&view)
            .map_err(JsValue::from)
            .and_then(|value| self.mount.call1(&JsValue::NULL, &value));
        if let Err(err) = result {
            web_sys::console::error_2(&"dirsift: mount callback failed".into(), &err);
        }
    }

    fn announce(&mut self, count: usize) {
        let count = JsValue::from_f64(count as f64);
        if let Err(err) = self.announce.call1(&JsValue::NULL, &count) {
            web_sys::console::error_2(&"dirsift: announce callback failed".into(), &err);
        }
    }
}

/* --------------------------------------------------------------------------
   Favorites
-------------------------------------------------------------------------- */

/// Favorites persisted to `localStorage` as a JSON array under one key.
///
/// Falls back to memory only when storage is unavailable (private mode,
/// sandboxed frames); a corrupt stored value reads as no favorites.
pub struct StoredFavorites {
    key: String,
    set: FavoriteSet,
    storage: Option<Storage>,
}

impl StoredFavorites {
    pub fn open(key: &str) -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        let set = storage
            .as_ref()
            .and_then(|s| s.get_item(key).ok().flatten())
            .and_then(|json| serde_json::from_str::<FavoriteSet>(&json).ok())
            .unwrap_or_default();

        Self {
            key: key.to_owned(),
            set,
            storage,
        }
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let saved = serde_json::to_string(&self.set)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|json| storage.set_item(&self.key, &json));
        if let Err(err) = saved {
            web_sys::console::warn_2(&"dirsift: could not persist favorites".into(), &err);
        }
    }
}

impl FavoriteStore for StoredFavorites {
    fn contains(&self, name: &str) -> bool {
        self.set.contains(name)
    }

    fn toggle(&mut self, name: &str) -> bool {
        let now = self.set.toggle(name);
        self.persist();
        now
    }

    fn len(&self) -> usize {
        self.set.len()
    }

    fn names(&self) -> Vec<&str> {
        self.set.names()
    }
}
