// crates/dirsift-core/src/config.rs

//! Tunables for the pipeline.
//!
//! Every knob can be overridden from JSON; missing keys fall back to the
//! defaults below, so `{}` is a valid configuration.
//!
//! ```rust
//! use dirsift_core::PipelineConfig;
//!
//! let cfg = PipelineConfig::from_json_str(r#"{ "rendering": { "batch_size": 50 } }"#).unwrap();
//! assert_eq!(cfg.rendering.batch_size, 50);
//! assert_eq!(cfg.search.min_len, 2);
//! ```

use crate::error::{DirError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub search: SearchSettings,
    pub rendering: RenderSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Shortest term (in characters) that is answered from the prefix index.
    pub min_len: usize,
    /// Quiet period before a typed search term is applied.
    pub debounce_ms: u32,
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub batch_size: usize,
    /// Interval between batches when idle scheduling is unavailable.
    pub frame_ms: u32,
    /// Upper bound the host may wait before running an idle callback.
    pub idle_timeout_ms: u32,
    pub stagger_step_ms: u32,
    pub max_stagger_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Number of filter-state results kept. `0` disables caching.
    pub capacity: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_len: 2,
            debounce_ms: 150,
            max_suggestions: 5,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            batch_size: 20,
            frame_ms: 16,
            idle_timeout_ms: 100,
            stagger_step_ms: 20,
            max_stagger_ms: 500,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

impl PipelineConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.search.min_len == 0 {
            return Err(DirError::InvalidConfig(
                "search.min_len must be at least 1".into(),
            ));
        }
        if self.rendering.batch_size == 0 {
            return Err(DirError::InvalidConfig(
                "rendering.batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
