// crates/dirsift-core/src/search/cache.rs
use super::filter::FilterState;
use crate::model::ItemId;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Shared, immutable result list. Cheap to hand to the render scheduler.
pub type Results = Rc<[ItemId]>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Filtered + sorted results keyed by [`FilterState::signature`].
///
/// Bounded, with strict FIFO eviction: reads never refresh an entry's
/// position, and overwriting a key keeps its original slot. The cache cannot
/// see changes to item attributes, so anything that alters membership (a
/// favorite toggle, a dataset reload) must call [`ResultCache::invalidate`].
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    entries: HashMap<String, Results>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn signature(state: &FilterState) -> String {
        state.signature()
    }

    pub fn get(&mut self, state: &FilterState) -> Option<Results> {
        let found = self.entries.get(&state.signature()).cloned();
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub fn set(&mut self, state: &FilterState, results: Results) {
        if self.capacity == 0 {
            return;
        }

        let key = state.signature();
        if self.entries.insert(key.clone(), results).is_none() {
            self.order.push_back(key);
        }

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                log::debug!("result cache evicted {oldest}");
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
        }
    }
}
