//! dirsift prelude: bring common types and traits into scope for hosts and demos.

pub use crate::config::{CacheSettings, PipelineConfig, RenderSettings, SearchSettings};
pub use crate::error::{DirError, Result};
pub use crate::explorer::Explorer;
pub use crate::markers::{FavoriteSet, FavoriteStore, PopularitySet};
pub use crate::model::{Dataset, DatasetStats, ItemId, Organization};
pub use crate::schedule::{EventLoop, Presenter, RenderBatch, RenderScheduler, TimerRegistry, VirtualLoop};
pub use crate::search::{FilterPipeline, FilterState, ResultCache, Results, SearchIndex, Suggestion, SuggestionKind};
pub use crate::traits::Searchable;
