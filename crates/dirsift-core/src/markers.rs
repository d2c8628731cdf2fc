// crates/dirsift-core/src/markers.rs

//! Per-item flags supplied from outside the dataset: favorites and popularity.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The favorites collaborator.
///
/// The pipeline only asks "is this name a favorite?" and flips membership;
/// where the set is persisted is the implementor's business.
pub trait FavoriteStore {
    fn contains(&self, name: &str) -> bool;

    /// Flips membership of `name` and returns the new state.
    fn toggle(&mut self, name: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every favorite name, sorted.
    fn names(&self) -> Vec<&str>;
}

/// In-memory favorites keyed by exact item name.
///
/// Serializes as a plain JSON array of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    names: HashSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FavoriteStore for FavoriteSet {
    fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_owned());
            true
        }
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.names.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

/// Names flagged as popular. Matching is exact after trim + lower-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularitySet {
    names: HashSet<String>,
}

impl PopularitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_popular(&self, name: &str) -> bool {
        let key = normalize_name(name);
        !key.is_empty() && self.names.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PopularitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|s| normalize_name(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
