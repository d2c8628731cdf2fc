// crates/dirsift-core/src/search/mod.rs

//! # Search
//!
//! The synchronous half of the pipeline: prefix index, predicate chain and
//! sorting, the result cache, and search-box suggestions. Everything here
//! runs to completion within one turn and never fails.

pub mod cache;
pub mod filter;
pub mod index;
pub mod suggest;

pub use cache::{CacheStats, ResultCache, Results};
pub use filter::{FilterPipeline, FilterState};
pub use index::SearchIndex;
pub use suggest::{suggest, Suggestion, SuggestionKind};
