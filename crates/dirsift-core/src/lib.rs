// crates/dirsift-core/src/lib.rs

//! # dirsift-core
//!
//! Incremental search over directory-sized datasets: a prefix index, a
//! conjunctive filter chain, popularity-first sorting, a bounded result
//! cache, and cooperative batch delivery to a presentation layer.
//!
//! The [`Explorer`] ties these together for one browsing session. Hosts
//! plug in an [`schedule::EventLoop`] and a [`schedule::Presenter`];
//! everything else is plain data.

pub mod config;
pub mod error;
pub mod explorer;
pub mod loader;
pub mod markers;
pub mod model;
pub mod prelude;
pub mod schedule;
pub mod search;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::config::PipelineConfig;
pub use crate::error::{DirError, Result};
pub use crate::explorer::Explorer;
pub use crate::loader::{load_dataset, load_favorites, load_popularity, load_records, save_favorites};
pub use crate::markers::{FavoriteSet, FavoriteStore, PopularitySet};
pub use crate::model::{Dataset, DatasetStats, ItemId, Organization};
pub use crate::search::{Results, Suggestion, SuggestionKind};
// Export the Search Trait (crucial for custom record types)
pub use crate::traits::Searchable;
// Export Text Utils
pub use crate::text::{collation_key, normalize_term};
