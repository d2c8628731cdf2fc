// crates/dirsift-core/src/search/suggest.rs
use crate::model::Dataset;
use crate::text::{char_len, normalize, normalize_term};
use crate::traits::Searchable;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Name,
    Tag,
}

/// A completion offered under the search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub value: String,
}

/// Completions for `raw`: matching names first, then catalog tags, `max` in total.
///
/// Nothing is suggested until the trimmed term reaches `min_len` characters.
/// Matching is a case-insensitive substring test; names come in dataset
/// order and tags in catalog order.
pub fn suggest<T: Searchable>(
    dataset: &Dataset<T>,
    raw: &str,
    min_len: usize,
    max: usize,
) -> Vec<Suggestion> {
    let term = normalize_term(raw);
    if char_len(&term) < min_len || max == 0 {
        return Vec::new();
    }

    let mut out: Vec<Suggestion> = dataset
        .items()
        .iter()
        .map(Searchable::name)
        .filter(|name| !name.is_empty() && normalize(name).contains(&term))
        .take(max)
        .map(|name| Suggestion {
            kind: SuggestionKind::Name,
            value: name.to_owned(),
        })
        .collect();

    let remaining = max - out.len();
    out.extend(
        dataset
            .tag_catalog()
            .iter()
            .filter(|tag| normalize(tag).contains(&term))
            .take(remaining)
            .map(|tag| Suggestion {
                kind: SuggestionKind::Tag,
                value: tag.clone(),
            }),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Organization;

    fn dataset() -> Dataset<Organization> {
        Dataset::new(vec![
            Organization::new("Evolve", &["EV charging"]),
            Organization::new("Bevel", &["tools"]),
            Organization::new("Nova", &["ev"]),
        ])
    }

    #[test]
    fn names_before_tags() {
        let got = suggest(&dataset(), "EV", 2, 5);
        let values: Vec<_> = got.iter().map(|s| (s.kind, s.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                (SuggestionKind::Name, "Evolve"),
                (SuggestionKind::Name, "Bevel"),
                (SuggestionKind::Tag, "EV charging"),
                (SuggestionKind::Tag, "ev"),
            ]
        );
    }

    #[test]
    fn capped_at_max() {
        assert_eq!(suggest(&dataset(), "ev", 2, 3).len(), 3);
        let only_names = suggest(&dataset(), "ev", 2, 2);
        assert!(only_names.iter().all(|s| s.kind == SuggestionKind::Name));
    }

    #[test]
    fn short_terms_suggest_nothing() {
        assert!(suggest(&dataset(), " e ", 2, 5).is_empty());
    }
}
