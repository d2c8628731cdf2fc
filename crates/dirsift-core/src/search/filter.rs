// crates/dirsift-core/src/search/filter.rs
use super::index::SearchIndex;
use crate::markers::{FavoriteStore, PopularitySet};
use crate::model::ItemId;
use crate::text::{collation_key, normalize, normalize_term};
use crate::traits::Searchable;
use serde::Serialize;
use std::collections::BTreeSet;

/// What the user has narrowed the directory down to.
///
/// Tags live in a `BTreeSet`, so iteration (and therefore the signature) is
/// sorted regardless of the order tags were selected in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub tags: BTreeSet<String>,
    pub favorites_only: bool,
    search_term: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_favorites_only(mut self, on: bool) -> Self {
        self.favorites_only = on;
        self
    }

    pub fn with_search_term(mut self, raw: &str) -> Self {
        self.set_search_term(raw);
        self
    }

    /// Stores the trimmed, lower-cased form of `raw`.
    pub fn set_search_term(&mut self, raw: &str) {
        self.search_term = normalize_term(raw);
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Adds `tag` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_owned());
            true
        }
    }

    pub fn is_active(&self) -> bool {
        !self.tags.is_empty() || self.favorites_only || !self.search_term.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Canonical cache key. Semantically equal states always produce equal signatures.
    ///
    /// Tags are length-prefixed in sorted order and the term comes last, so
    /// no tag or term content can make two different states collide.
    pub fn signature(&self) -> String {
        let tags: String = self
            .tags
            .iter()
            .map(|tag| format!("{}:{tag}", tag.len()))
            .collect();
        format!(
            "tags={tags}|favorites={}|search={}",
            self.favorites_only, self.search_term
        )
    }
}

/// The predicate chain plus sorting, borrowed over one dataset snapshot.
pub struct FilterPipeline<'a, T> {
    items: &'a [T],
    index: &'a SearchIndex,
    favorites: &'a dyn FavoriteStore,
    popularity: &'a PopularitySet,
}

impl<'a, T: Searchable> FilterPipeline<'a, T> {
    pub fn new(
        items: &'a [T],
        index: &'a SearchIndex,
        favorites: &'a dyn FavoriteStore,
        popularity: &'a PopularitySet,
    ) -> Self {
        Self {
            items,
            index,
            favorites,
            popularity,
        }
    }

    /// Full predicate chain for one item, always via linear text scan.
    pub fn matches(&self, id: ItemId, state: &FilterState) -> bool {
        match self.items.get(id as usize) {
            Some(item) => {
                self.matches_tags(item, state)
                    && self.matches_favorites(item, state)
                    && matches_search(item, state.search_term())
            }
            None => false,
        }
    }

    /// Narrows `candidates` to the items matching `state`.
    ///
    /// Terms long enough for the index take the index bucket (already
    /// search-matched) restricted to `candidates`, in dataset order; shorter
    /// terms scan `candidates` in their given order. IDs outside the dataset
    /// are dropped.
    pub fn filter(&self, candidates: &[ItemId], state: &FilterState) -> Vec<ItemId> {
        let term = state.search_term();

        if self.index.is_queryable(term) {
            let bucket = self.index.query(term);
            let keep = |id: &ItemId| {
                self.items.get(*id as usize).is_some_and(|item| {
                    self.matches_tags(item, state) && self.matches_favorites(item, state)
                })
            };

            if candidates.len() == self.items.len() && is_identity(candidates) {
                return bucket.iter().copied().filter(keep).collect();
            }

            let mut allowed = vec![false; self.items.len()];
            for &id in candidates {
                if let Some(slot) = allowed.get_mut(id as usize) {
                    *slot = true;
                }
            }
            return bucket
                .iter()
                .copied()
                .filter(|&id| allowed[id as usize])
                .filter(keep)
                .collect();
        }

        candidates
            .iter()
            .copied()
            .filter(|&id| self.matches(id, state))
            .collect()
    }

    /// [`FilterPipeline::filter`] over the whole dataset.
    pub fn filter_all(&self, state: &FilterState) -> Vec<ItemId> {
        let all: Vec<ItemId> = (0..self.items.len() as ItemId).collect();
        self.filter(&all, state)
    }

    /// Sorted copy of `ids`: popular first, then by name.
    ///
    /// Names compare by [`collation_key`]: Latin names ignore case and
    /// accents, and Latin sorts before kana, which sorts before kanji. The
    /// sort is stable, so items with identical keys keep their input order.
    pub fn sort(&self, ids: &[ItemId]) -> Vec<ItemId> {
        let mut out: Vec<ItemId> = ids
            .iter()
            .copied()
            .filter(|&id| (id as usize) < self.items.len())
            .collect();
        out.sort_by_cached_key(|&id| {
            let name = self.items[id as usize].name();
            (!self.popularity.is_popular(name), collation_key(name), normalize(name))
        });
        out
    }

    pub fn is_popular(&self, id: ItemId) -> bool {
        self.items
            .get(id as usize)
            .is_some_and(|item| self.popularity.is_popular(item.name()))
    }

    fn matches_tags(&self, item: &T, state: &FilterState) -> bool {
        state.tags.iter().all(|tag| item.has_tag(tag))
    }

    fn matches_favorites(&self, item: &T, state: &FilterState) -> bool {
        !state.favorites_only || self.favorites.contains(item.name())
    }
}

fn matches_search<T: Searchable>(item: &T, term: &str) -> bool {
    term.is_empty() || item.haystack().contains(term)
}

fn is_identity(ids: &[ItemId]) -> bool {
    ids.iter().enumerate().all(|(i, &id)| i as ItemId == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::FavoriteSet;
    use crate::model::Organization;

    struct Fixture {
        items: Vec<Organization>,
        index: SearchIndex,
        favorites: FavoriteSet,
        popularity: PopularitySet,
    }

    impl Fixture {
        fn new(items: Vec<Organization>) -> Self {
            let mut index = SearchIndex::new(2);
            index.build(&items);
            Self {
                items,
                index,
                favorites: FavoriteSet::new(),
                popularity: PopularitySet::new(),
            }
        }

        fn pipeline(&self) -> FilterPipeline<'_, Organization> {
            FilterPipeline::new(&self.items, &self.index, &self.favorites, &self.popularity)
        }
    }

    fn fixture() -> Fixture {
        let mut acme = Organization::new("Acme", &["ev"]);
        acme.email = "hello@acme.test".into();
        Fixture::new(vec![
            acme,
            Organization::new("Beta", &["ev", "fast"]),
            Organization::new("Gamma", &["fast"]),
        ])
    }

    #[test]
    fn tags_are_conjunctive() {
        let fx = fixture();
        let state = FilterState::new().with_tags(["ev", "fast"]);
        assert_eq!(fx.pipeline().filter_all(&state), vec![1]);
    }

    #[test]
    fn tags_match_case_sensitively() {
        let fx = fixture();
        let state = FilterState::new().with_tags(["EV"]);
        assert!(fx.pipeline().filter_all(&state).is_empty());
    }

    #[test]
    fn favorites_only_uses_store() {
        let mut fx = fixture();
        fx.favorites.toggle("Gamma");
        let state = FilterState::new().with_favorites_only(true);
        assert_eq!(fx.pipeline().filter_all(&state), vec![2]);
    }

    #[test]
    fn short_term_scans_every_field() {
        let fx = fixture();
        // One character: below the index minimum, so the e-mail field is scanned.
        let state = FilterState::new().with_search_term("@");
        assert_eq!(fx.pipeline().filter_all(&state), vec![0]);
    }

    #[test]
    fn long_term_uses_index_prefixes_only() {
        let fx = fixture();
        let state = FilterState::new().with_search_term("  GAM ");
        assert_eq!(fx.pipeline().filter_all(&state), vec![2]);

        // Present in the e-mail haystack but not a name/tag prefix.
        let state = FilterState::new().with_search_term("hello");
        assert!(fx.pipeline().filter_all(&state).is_empty());
    }

    #[test]
    fn index_path_respects_candidates() {
        let fx = fixture();
        let state = FilterState::new().with_search_term("fa");
        assert_eq!(fx.pipeline().filter(&[2], &state), vec![2]);
        assert_eq!(fx.pipeline().filter(&[0], &state), Vec::<ItemId>::new());
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let fx = fixture();
        let state = FilterState::new();
        assert_eq!(fx.pipeline().filter(&[7, 1], &state), vec![1]);
        assert!(!fx.pipeline().matches(7, &state));
        assert_eq!(fx.pipeline().sort(&[9, 0]), vec![0]);
    }

    #[test]
    fn signature_ignores_tag_order() {
        let a = FilterState::new().with_tags(["b", "a"]).with_search_term("X");
        let b = FilterState::new().with_tags(["a", "b"]).with_search_term(" x");
        assert_eq!(a.signature(), b.signature());
        assert_ne!(a.signature(), a.clone().with_favorites_only(true).signature());
    }

    #[test]
    fn signature_separates_tag_boundaries() {
        let joined = FilterState::new().with_tags(["a1:b"]);
        let split = FilterState::new().with_tags(["a", "b"]);
        assert_ne!(joined.signature(), split.signature());

        let state = FilterState::new().with_tags(["ev"]).with_search_term("Acme");
        assert_eq!(state.signature(), "tags=2:ev|favorites=false|search=acme");
    }

    #[test]
    fn toggling_and_clearing() {
        let mut state = FilterState::new();
        assert!(!state.is_active());
        assert!(state.toggle_tag("ev"));
        assert!(state.is_active());
        assert!(!state.toggle_tag("ev"));
        state.set_search_term("x");
        state.clear();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn sort_is_case_insensitive_and_stable() {
        let fx = Fixture::new(vec![
            Organization::new("beta", &[]),
            Organization::new("Alpha", &[]),
            Organization::new("BETA", &[]),
            Organization::new("Émile", &[]),
        ]);
        // Latin folds to beta, alpha, beta, emile. The two "beta" also tie on
        // the lower-cased name, so input order is kept.
        assert_eq!(fx.pipeline().sort(&[0, 1, 2, 3]), vec![1, 0, 2, 3]);
    }

    #[test]
    fn sort_puts_latin_before_kana_before_kanji() {
        let mut fx = Fixture::new(vec![
            Organization::new("トヨタ", &[]),
            Organization::new("日産", &[]),
            Organization::new("Zeta", &[]),
            Organization::new("アイシン", &[]),
        ]);
        assert_eq!(fx.pipeline().sort(&[0, 1, 2, 3]), vec![2, 3, 0, 1]);

        fx.popularity = ["日産"].into_iter().collect();
        assert_eq!(fx.pipeline().sort(&[0, 1, 2, 3]), vec![1, 2, 3, 0]);
    }
}
