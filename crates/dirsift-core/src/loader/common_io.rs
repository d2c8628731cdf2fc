// crates/dirsift-core/src/loader/common_io.rs
use crate::error::{DirError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// True when `path` names a gzip file.
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens a file, buffers it and, for `.gz` paths, wraps it in a Gzip decoder.
///
/// Callers get a plain reader and never care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)
        .map_err(|e| DirError::NotFound(format!("{}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);

    if !is_gzip(path) {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(DirError::InvalidData(format!(
            "{} is gzip-compressed; rebuild with the `compact` feature",
            path.display()
        )))
    }
}
