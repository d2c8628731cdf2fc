// crates/dirsift-core/src/explorer.rs

//! # Explorer
//!
//! The context object that owns one browsing session: dataset, index, result
//! cache, filter state, marker stores, timers and the render scheduler.
//! UI actions come in through its methods; results leave through the
//! [`Presenter`] it was built with.
//!
//! ```rust
//! use dirsift_core::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct Names(Vec<Vec<u32>>);
//! impl Presenter for Names {
//!     fn mount(&mut self, batch: RenderBatch) { self.0.push(batch.items().to_vec()); }
//!     fn announce(&mut self, _count: usize) {}
//! }
//!
//! let ev = VirtualLoop::new();
//! let view = Rc::new(RefCell::new(Names::default()));
//! let explorer = Explorer::new(
//!     PipelineConfig::default(),
//!     Rc::new(ev.clone()),
//!     view.clone(),
//!     Box::new(FavoriteSet::new()),
//! )?;
//!
//! explorer.load(
//!     vec![Organization::new("Beta", &["ev"]), Organization::new("Acme", &["ev"])],
//!     PopularitySet::new(),
//! );
//! ev.run_until_stalled();
//! assert_eq!(view.borrow().0, vec![vec![1, 0]]);
//! # Ok::<(), dirsift_core::DirError>(())
//! ```

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::markers::{FavoriteStore, PopularitySet};
use crate::model::{Dataset, DatasetStats, ItemId};
use crate::schedule::{EventLoop, Presenter, RenderScheduler, TimerRegistry};
use crate::search::{suggest, CacheStats, FilterPipeline, FilterState, ResultCache, Results, SearchIndex, Suggestion};
use crate::traits::Searchable;
use std::cell::RefCell;
use std::rc::Rc;

/// Timer name used for the search-box debounce.
pub const SEARCH_TIMER: &str = "search";

pub struct Explorer<T: Searchable + 'static> {
    session: Rc<RefCell<Session<T>>>,
    timers: TimerRegistry,
    renderer: RenderScheduler,
}

struct Session<T> {
    config: PipelineConfig,
    dataset: Dataset<T>,
    index: SearchIndex,
    cache: ResultCache,
    state: FilterState,
    /// Raw search-box text, applied to `state` when the debounce fires.
    pending_term: String,
    favorites: Box<dyn FavoriteStore>,
    popularity: PopularitySet,
}

impl<T: Searchable> Session<T> {
    fn load(&mut self, items: Vec<T>, popularity: PopularitySet) {
        self.dataset = Dataset::new(items);
        self.index.build(self.dataset.items());
        self.popularity = popularity;
        self.cache.invalidate();
    }

    /// Cached results for the current state, computing and storing on a miss.
    fn compute(&mut self) -> Results {
        if let Some(hit) = self.cache.get(&self.state) {
            log::debug!("result cache hit: {} items", hit.len());
            return hit;
        }

        let pipeline = FilterPipeline::new(
            self.dataset.items(),
            &self.index,
            self.favorites.as_ref(),
            &self.popularity,
        );
        let filtered = pipeline.filter_all(&self.state);
        let sorted: Results = pipeline.sort(&filtered).into();
        log::debug!(
            "result cache miss: {} of {} items match",
            sorted.len(),
            self.dataset.len()
        );

        self.cache.set(&self.state, Rc::clone(&sorted));
        sorted
    }
}

impl<T: Searchable + 'static> Explorer<T> {
    /// Builds an empty session. Fails only if `config` does not validate.
    pub fn new(
        config: PipelineConfig,
        event_loop: Rc<dyn EventLoop>,
        presenter: Rc<RefCell<dyn Presenter>>,
        favorites: Box<dyn FavoriteStore>,
    ) -> Result<Self> {
        config.validate()?;

        let renderer = RenderScheduler::new(
            Rc::clone(&event_loop),
            presenter,
            config.rendering.clone(),
        );
        let timers = TimerRegistry::new(event_loop);
        let session = Session {
            index: SearchIndex::new(config.search.min_len),
            cache: ResultCache::new(config.cache.capacity),
            dataset: Dataset::default(),
            state: FilterState::default(),
            pending_term: String::new(),
            favorites,
            popularity: PopularitySet::new(),
            config,
        };

        Ok(Self {
            session: Rc::new(RefCell::new(session)),
            timers,
            renderer,
        })
    }

    /// Replaces the dataset and popularity markers, rebuilds the index and
    /// delivers results for the current filter state.
    pub fn load(&self, items: Vec<T>, popularity: PopularitySet) -> u64 {
        self.session.borrow_mut().load(items, popularity);
        self.refresh()
    }

    /// Records search-box input and (re)starts the debounce.
    ///
    /// Returns suggestions for the input right away; the results only follow
    /// once the input has been quiet for `search.debounce_ms`.
    pub fn input_search(&self, raw: &str) -> Vec<Suggestion> {
        let delay = {
            let mut session = self.session.borrow_mut();
            session.pending_term = raw.to_owned();
            session.config.search.debounce_ms
        };

        let session = Rc::downgrade(&self.session);
        let renderer = self.renderer.clone();
        self.timers.set(
            SEARCH_TIMER,
            move || {
                let Some(session) = session.upgrade() else {
                    return;
                };
                let results = {
                    let mut session = session.borrow_mut();
                    let term = session.pending_term.clone();
                    session.state.set_search_term(&term);
                    session.compute()
                };
                renderer.deliver(results);
            },
            delay,
        );

        self.suggest(raw)
    }

    /// Applies `raw` as the search term immediately, dropping any pending debounce.
    pub fn commit_search(&self, raw: &str) -> u64 {
        self.timers.clear(SEARCH_TIMER);
        {
            let mut session = self.session.borrow_mut();
            session.pending_term = raw.to_owned();
            session.state.set_search_term(raw);
        }
        self.refresh()
    }

    /// Selects or deselects `tag`, then refreshes. Returns whether it is now selected.
    pub fn toggle_tag(&self, tag: &str) -> bool {
        let selected = self.session.borrow_mut().state.toggle_tag(tag);
        self.refresh();
        selected
    }

    pub fn set_favorites_only(&self, on: bool) {
        self.session.borrow_mut().state.favorites_only = on;
        self.refresh();
    }

    pub fn toggle_favorites_only(&self) -> bool {
        let on = !self.session.borrow().state.favorites_only;
        self.set_favorites_only(on);
        on
    }

    /// Flips the favorite marker for `name` and returns the new state.
    ///
    /// Cached results may now be wrong for any favorites-only state, so the
    /// cache is always dropped; results are re-delivered only when the
    /// current view is favorites-only.
    pub fn toggle_favorite(&self, name: &str) -> bool {
        let (now_favorite, visible_change) = {
            let mut session = self.session.borrow_mut();
            let now_favorite = session.favorites.toggle(name);
            session.cache.invalidate();
            (now_favorite, session.state.favorites_only)
        };
        if visible_change {
            self.refresh();
        }
        now_favorite
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.session.borrow().favorites.contains(name)
    }

    pub fn favorite_names(&self) -> Vec<String> {
        self.session
            .borrow()
            .favorites
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    pub fn is_popular(&self, name: &str) -> bool {
        self.session.borrow().popularity.is_popular(name)
    }

    /// Resets search, tags and the favorites toggle, then refreshes.
    pub fn clear_filters(&self) -> u64 {
        self.timers.clear(SEARCH_TIMER);
        {
            let mut session = self.session.borrow_mut();
            session.state.clear();
            session.pending_term.clear();
        }
        self.refresh()
    }

    /// True when any filter is set, counting search text still waiting on the debounce.
    pub fn has_active_filters(&self) -> bool {
        let session = self.session.borrow();
        session.state.is_active() || !session.pending_term.trim().is_empty()
    }

    /// Computes (or fetches) results for the current state and delivers them.
    ///
    /// Returns the delivery generation.
    pub fn refresh(&self) -> u64 {
        let results = self.session.borrow_mut().compute();
        self.renderer.deliver(results)
    }

    /// Results for the current state without delivering them.
    pub fn results(&self) -> Results {
        self.session.borrow_mut().compute()
    }

    pub fn filter_state(&self) -> FilterState {
        self.session.borrow().state.clone()
    }

    pub fn tag_catalog(&self) -> Vec<String> {
        self.session
            .borrow()
            .dataset
            .tag_catalog()
            .iter()
            .cloned()
            .collect()
    }

    pub fn suggest(&self, raw: &str) -> Vec<Suggestion> {
        let session = self.session.borrow();
        let search = &session.config.search;
        suggest(&session.dataset, raw, search.min_len, search.max_suggestions)
    }

    /// The loaded items, shared with the session rather than copied.
    pub fn records(&self) -> Rc<[T]> {
        self.session.borrow().dataset.shared_items()
    }

    /// Runs `f` against item `id`, if it exists.
    pub fn with_item<R>(&self, id: ItemId, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.session.borrow().dataset.get(id).map(f)
    }

    pub fn stats(&self) -> DatasetStats {
        self.session.borrow().dataset.stats()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.session.borrow().cache.stats()
    }

    pub fn config(&self) -> PipelineConfig {
        self.session.borrow().config.clone()
    }

    /// The session's timer registry, for cosmetic deferred work that should
    /// die with the session.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Cancels every timer and the delivery in flight.
    pub fn dispose(&self) {
        self.timers.clear_all();
        self.renderer.cancel();
    }
}

impl<T: Searchable + 'static> Drop for Explorer<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
