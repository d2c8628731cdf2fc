// crates/dirsift-core/src/search/index.rs
use crate::model::ItemId;
use crate::text::{char_len, normalize, prefixes};
use crate::traits::Searchable;
use std::collections::{BTreeSet, HashMap};

/// Prefix → items lookup over lower-cased names and tags.
///
/// For every token (the item's whole name, and each whole tag) the item is
/// filed under each prefix from `min_len` characters up to the full token.
/// Build cost is quadratic in token length, which is fine for
/// directory-sized data; lookups are a single hash probe.
///
/// Note that only whole-token prefixes are indexed: `"corp"` does not find
/// `"Acme Corp"` through the index, only through a linear scan.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    min_len: usize,
    buckets: HashMap<String, Vec<ItemId>>,
}

impl SearchIndex {
    pub fn new(min_len: usize) -> Self {
        Self {
            min_len: min_len.max(1),
            buckets: HashMap::new(),
        }
    }

    /// Clears the index and files every item under its token prefixes.
    ///
    /// Buckets list items in dataset order and never contain duplicates.
    pub fn build<T: Searchable>(&mut self, items: &[T]) {
        self.buckets.clear();

        for (id, item) in items.iter().enumerate() {
            let id = id as ItemId;

            let mut tokens = BTreeSet::new();
            tokens.insert(normalize(item.name()));
            tokens.extend(item.tags().iter().map(|t| normalize(t)));

            for token in &tokens {
                for prefix in prefixes(token, self.min_len) {
                    let bucket = self.buckets.entry(prefix.to_owned()).or_default();
                    // Items are visited in order, so a repeat can only be the last entry.
                    if bucket.last() != Some(&id) {
                        bucket.push(id);
                    }
                }
            }
        }

        log::debug!(
            "search index built: {} items, {} prefixes",
            items.len(),
            self.buckets.len()
        );
    }

    /// The bucket for `term`, looked up verbatim.
    ///
    /// `term` must already be normalized. Terms shorter than
    /// [`SearchIndex::min_len`] are not indexed and return an empty slice;
    /// callers scan linearly for those.
    pub fn query(&self, term: &str) -> &[ItemId] {
        if !self.is_queryable(term) {
            return &[];
        }
        self.buckets.get(term).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_queryable(&self, term: &str) -> bool {
        char_len(term) >= self.min_len
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn prefix_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Organization;

    fn orgs() -> Vec<Organization> {
        vec![
            Organization::new("Acme", &["EV", "Fleet"]),
            Organization::new("Acorn", &["acme"]),
            Organization::new("Beta", &["ev"]),
        ]
    }

    #[test]
    fn query_before_build_is_empty() {
        let index = SearchIndex::new(2);
        assert!(index.query("ac").is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn short_terms_are_not_queryable() {
        let mut index = SearchIndex::new(2);
        index.build(&orgs());
        assert!(index.query("a").is_empty());
        assert!(!index.is_queryable("a"));
    }

    #[test]
    fn bucket_has_no_duplicates() {
        let mut index = SearchIndex::new(2);
        index.build(&orgs());
        // Acorn hits "ac" via its name and its "acme" tag.
        assert_eq!(index.query("ac"), &[0, 1]);
        assert_eq!(index.query("acme"), &[0, 1]);
        assert_eq!(index.query("ev"), &[0, 2]);
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut index = SearchIndex::new(2);
        index.build(&orgs());
        index.build(&[Organization::new("Zed", &[])]);
        assert!(index.query("ac").is_empty());
        assert_eq!(index.query("ze"), &[0]);
    }

    #[test]
    fn tokens_are_whole_names() {
        let mut index = SearchIndex::new(2);
        index.build(&[Organization::new("Acme Corp", &[])]);
        assert_eq!(index.query("acme c"), &[0]);
        assert!(index.query("corp").is_empty());
    }
}
