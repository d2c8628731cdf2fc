// crates/dirsift-core/src/error.rs
use thiserror::Error;

/// Errors raised at the edges of the pipeline (file loading, configuration).
///
/// The pipeline itself (index build, filter, sort, cache, delivery) is total
/// and never produces these.
#[derive(Debug, Error)]
pub enum DirError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DirError>;
