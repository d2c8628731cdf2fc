// crates/dirsift-core/src/traits.rs
use crate::text::normalize;
use std::borrow::Cow;

/// Read-only view the pipeline needs from a dataset record.
///
/// Implementors expose a display name, their tags, and the ordered list of
/// fields that free-text search looks at. Every accessor must be total: a
/// sparse record reports empty strings and an empty tag list rather than
/// failing.
///
/// # Examples
/// ```rust
/// use dirsift_core::traits::Searchable;
///
/// struct Shop { name: &'static str, tags: Vec<String> }
/// impl Searchable for Shop {
///     fn name(&self) -> &str { self.name }
///     fn tags(&self) -> &[String] { &self.tags }
/// }
///
/// let shop = Shop { name: "Corner Café", tags: vec!["Coffee".into()] };
/// assert!(shop.haystack().contains("café coffee"));
/// ```
pub trait Searchable {
    fn name(&self) -> &str;

    fn tags(&self) -> &[String];

    /// Fields scanned by the substring search, in order.
    ///
    /// The default covers the name and the space-joined tags.
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name()), Cow::Owned(self.tags().join(" "))]
    }

    /// Lower-cased, space-joined concatenation of [`Searchable::search_fields`].
    fn haystack(&self) -> String {
        normalize(&self.search_fields().join(" "))
    }

    /// Exact (case-sensitive) tag membership.
    #[inline]
    fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }
}
