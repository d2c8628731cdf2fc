//! dirsift-wasm: WebAssembly bindings for dirsift-core
//!
//! This crate exposes the incremental directory explorer to JavaScript. The
//! page supplies two callbacks; the explorer schedules its work on the
//! browser's own event loop (`requestAnimationFrame`, `requestIdleCallback`,
//! `setTimeout`) and hands results back a batch at a time.
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { DirectoryExplorer } from 'dirsift-wasm';
//!
//! async function main() {
//!   await init();
//!   const explorer = new DirectoryExplorer(
//!     batch => render(batch),            // { start, total, replace, stagger_ms, items }
//!     count => status(`${count} found`),
//!   );
//!
//!   const [companies, popular] = await Promise.all([
//!     fetch('data/companies.json').then(r => r.json()),
//!     fetch('data/popular.json').then(r => (r.ok ? r.json() : [])),
//!   ]);
//!   explorer.load(companies, popular);
//!
//!   search.addEventListener('input', e => showSuggestions(explorer.input_search(e.target.value)));
//!   window.addEventListener('unload', () => explorer.dispose());
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - Favorites persist in `localStorage` under [`FAVORITES_KEY`].
//! - Every query method returns plain values or JSON-serializable `JsValue`s.
//! - Presenter callbacks must not call back into the explorer synchronously.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use dirsift_core::loader::{read_records, records_from_value};
use dirsift_core::{Explorer, Organization, PipelineConfig};
use serde_wasm_bindgen::{from_value, to_value};

pub mod host;

pub use host::{BrowserLoop, ItemView, JsPresenter, StoredFavorites};

/// `localStorage` key holding the favorites array.
pub const FAVORITES_KEY: &str = "dirsiftFavorites";

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"Initializing dirsift WASM module...".into());
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> JsValue {
    to_value(value).unwrap_or(JsValue::NULL)
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/* --------------------------------------------------------------------------
   Explorer
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub struct DirectoryExplorer {
    explorer: Explorer<Organization>,
    records: Rc<RefCell<Rc<[Organization]>>>,
}

#[wasm_bindgen]
impl DirectoryExplorer {
    /// `config` is an optional partial configuration object; missing keys
    /// take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        mount: js_sys::Function,
        announce: js_sys::Function,
        config: Option<JsValue>,
    ) -> Result<DirectoryExplorer, JsValue> {
        let config: PipelineConfig = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => from_value(value)?,
            _ => PipelineConfig::default(),
        };

        let records: Rc<RefCell<Rc<[Organization]>>> = Rc::new(RefCell::new(Rc::from(Vec::new())));
        let presenter = JsPresenter::new(mount, announce, Rc::clone(&records));
        let explorer = Explorer::new(
            config,
            Rc::new(BrowserLoop::new()?),
            Rc::new(RefCell::new(presenter)),
            Box::new(StoredFavorites::open(FAVORITES_KEY)),
        )
        .map_err(js_err)?;

        Ok(Self { explorer, records })
    }

    /// Loads records from JS values. Non-object entries are skipped.
    pub fn load(&self, companies: JsValue, popular: JsValue) -> Result<u32, JsValue> {
        let doc: serde_json::Value = from_value(companies)?;
        let popular: Vec<String> = if popular.is_undefined() || popular.is_null() {
            Vec::new()
        } else {
            from_value(popular).unwrap_or_default()
        };
        Ok(self.replace(records_from_value(doc), popular))
    }

    /// Loads records from fetched JSON text.
    pub fn load_json(&self, companies: &str, popular: &str) -> Result<u32, JsValue> {
        let items: Vec<Organization> = read_records(companies.as_bytes()).map_err(js_err)?;
        let popular: Vec<String> = serde_json::from_str(popular).unwrap_or_default();
        Ok(self.replace(items, popular))
    }

    /// Records search-box input and returns suggestions right away; results
    /// follow once typing pauses.
    pub fn input_search(&self, raw: &str) -> JsValue {
        to_js(&self.explorer.input_search(raw))
    }

    pub fn commit_search(&self, raw: &str) {
        self.explorer.commit_search(raw);
    }

    pub fn suggest(&self, raw: &str) -> JsValue {
        to_js(&self.explorer.suggest(raw))
    }

    pub fn toggle_tag(&self, tag: &str) -> bool {
        self.explorer.toggle_tag(tag)
    }

    pub fn set_favorites_only(&self, on: bool) {
        self.explorer.set_favorites_only(on);
    }

    pub fn toggle_favorites_only(&self) -> bool {
        self.explorer.toggle_favorites_only()
    }

    pub fn toggle_favorite(&self, name: &str) -> bool {
        self.explorer.toggle_favorite(name)
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.explorer.is_favorite(name)
    }

    pub fn is_popular(&self, name: &str) -> bool {
        self.explorer.is_popular(name)
    }

    pub fn clear_filters(&self) {
        self.explorer.clear_filters();
    }

    pub fn has_active_filters(&self) -> bool {
        self.explorer.has_active_filters()
    }

    pub fn selected_tags(&self) -> JsValue {
        to_js(&self.explorer.filter_state().tags)
    }

    pub fn tag_catalog(&self) -> JsValue {
        to_js(&self.explorer.tag_catalog())
    }

    pub fn favorites(&self) -> JsValue {
        to_js(&self.explorer.favorite_names())
    }

    /// IDs of the current results, in display order.
    pub fn result_ids(&self) -> Vec<u32> {
        self.explorer.results().to_vec()
    }

    pub fn item(&self, id: u32) -> JsValue {
        self.explorer
            .with_item(id, |org| to_js(&ItemView::new(id, org)))
            .unwrap_or(JsValue::UNDEFINED)
    }

    pub fn stats(&self) -> JsValue {
        to_js(&self.explorer.stats())
    }

    pub fn cache_stats(&self) -> JsValue {
        to_js(&self.explorer.cache_stats())
    }

    /// Cancels pending timers and the delivery in flight. Call on unload.
    pub fn dispose(&self) {
        self.explorer.dispose();
    }
}

impl DirectoryExplorer {
    fn replace(&self, items: Vec<Organization>, popular: Vec<String>) -> u32 {
        let count = items.len() as u32;
        self.explorer.load(items, popular.into_iter().collect());
        *self.records.borrow_mut() = self.explorer.records();
        web_sys::console::log_1(&format!("dirsift: loaded {count} records").into());
        count
    }
}

/* --------------------------------------------------------------------------
   Helpers
-------------------------------------------------------------------------- */

/// The default configuration as a plain object.
#[wasm_bindgen]
pub fn default_config() -> JsValue {
    to_js(&PipelineConfig::default())
}

/// Fills in defaults for a partial configuration object and validates it.
#[wasm_bindgen]
pub fn resolve_config(config: JsValue) -> Result<JsValue, JsValue> {
    let config: PipelineConfig = from_value(config)?;
    config.validate().map_err(js_err)?;
    Ok(to_js(&config))
}
