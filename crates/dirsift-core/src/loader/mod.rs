// crates/dirsift-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (I/O, decompression) and turns the three
//! input files into pipeline types:
//!
//! * the dataset, a JSON array of organization records,
//! * the popularity list, a JSON array of names,
//! * the favorites list, a JSON array of names.
//!
//! Record-level problems are logged and skipped; only file-level problems
//! (unreadable file, malformed JSON) become errors.

use crate::config::PipelineConfig;
use crate::error::{DirError, Result};
use crate::markers::{FavoriteSet, PopularitySet};
use crate::model::{Dataset, Organization};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

mod common_io;

pub use common_io::{is_gzip, open_stream};

/// Reads a dataset file (`.json` or `.json.gz`).
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset<Organization>> {
    Ok(Dataset::new(load_records(path)?))
}

/// Reads the records of a dataset file without building a [`Dataset`].
pub fn load_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let items = read_records(open_stream(path)?)?;
    log::info!("loaded {} records from {}", items.len(), path.display());
    Ok(items)
}

/// Parses a JSON array of records from `reader`.
///
/// Entries that are not objects, or that do not decode as `T`, are skipped
/// with a warning. A document that is not an array yields no records.
pub fn read_records<T: DeserializeOwned>(reader: impl Read) -> Result<Vec<T>> {
    let doc: Value = serde_json::from_reader(reader)?;
    Ok(records_from_value(doc))
}

pub fn records_from_value<T: DeserializeOwned>(doc: Value) -> Vec<T> {
    let Value::Array(entries) = doc else {
        log::warn!("dataset document is not an array; treating as empty");
        return Vec::new();
    };

    let total = entries.len();
    let items: Vec<T> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(pos, entry)| {
            if !entry.is_object() {
                log::warn!("skipping entry {pos}: not an object");
                return None;
            }
            match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("skipping entry {pos}: {e}");
                    None
                }
            }
        })
        .collect();

    if items.len() < total {
        log::warn!("kept {} of {} dataset entries", items.len(), total);
    }
    items
}

/// Reads the popularity list. A missing file or a non-array document
/// yields an empty set.
pub fn load_popularity(path: impl AsRef<Path>) -> Result<PopularitySet> {
    Ok(load_name_list(path.as_ref())?.into_iter().collect())
}

/// Reads persisted favorites. A missing file yields an empty set.
pub fn load_favorites(path: impl AsRef<Path>) -> Result<FavoriteSet> {
    Ok(load_name_list(path.as_ref())?.into_iter().collect())
}

/// Writes favorites as a plain JSON array of names.
pub fn save_favorites(path: impl AsRef<Path>, favorites: &FavoriteSet) -> Result<()> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(writer, favorites)?;
    Ok(())
}

fn load_name_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        log::debug!("{} does not exist; using an empty list", path.display());
        return Ok(Vec::new());
    }

    let doc: Value = serde_json::from_reader(open_stream(path)?)?;
    let Value::Array(entries) = doc else {
        log::warn!("{} is not a JSON array; using an empty list", path.display());
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

impl PipelineConfig {
    /// Reads and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut text = String::new();
        open_stream(path)?.read_to_string(&mut text)?;
        Self::from_json_str(&text).map_err(|e| match e {
            DirError::Json(e) => {
                DirError::InvalidConfig(format!("{}: {}", path.display(), e))
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn scratch(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "dirsift-loader-{}-{name}",
            std::process::id()
        ));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn non_objects_are_skipped() {
        let items: Vec<Organization> = records_from_value(json!([
            { "company_name": "Acme", "tags": ["ev"] },
            42,
            "nope",
            null,
            { "company_name": "Beta" }
        ]));
        let names: Vec<&str> = items.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta"]);
    }

    #[test]
    fn odd_optional_fields_keep_the_record() {
        let items: Vec<Organization> = records_from_value(json!([
            { "company_name": "Acme", "ev_prime_plan": "text plan" },
            { "company_name": "Beta", "company_wide_plan": { "summary": 5 } },
            { "company_name": "Gamma", "tags": 3, "email": false }
        ]));
        let names: Vec<&str> = items.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta", "Gamma"]);
        assert!(items.iter().all(|o| o.summary().is_none()));
    }

    #[test]
    fn non_array_document_is_empty() {
        let items: Vec<Organization> = records_from_value(json!({ "company_name": "Acme" }));
        assert!(items.is_empty());
    }

    #[test]
    fn dataset_file_round_trip() {
        let path = scratch(
            "companies.json",
            r#"[{"company_name":"Beta","tags":["b","a"]},{"company_name":"Acme","tags":["a"]}]"#,
        );
        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.tag_catalog().iter().collect::<Vec<_>>(), vec!["a", "b"]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_dataset_is_not_found() {
        let err = load_dataset("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DirError::NotFound(_)));
    }

    #[test]
    fn malformed_dataset_is_a_json_error() {
        let path = scratch("broken.json", "[{");
        assert!(matches!(load_dataset(&path), Err(DirError::Json(_))));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_popularity_file_is_empty() {
        let popular = load_popularity("/definitely/not/popular.json").unwrap();
        assert!(popular.is_empty());
    }

    #[test]
    fn popularity_ignores_non_strings() {
        let path = scratch("popular.json", r#"[" ACME ", 7, "Beta"]"#);
        let popular = load_popularity(&path).unwrap();
        assert_eq!(popular.len(), 2);
        assert!(popular.is_popular("acme"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn favorites_persist() {
        use crate::markers::FavoriteStore;

        let path = scratch("favorites.json", "[]");
        let favs: FavoriteSet = ["Acme"].into_iter().collect();
        save_favorites(&path, &favs).unwrap();
        let back = load_favorites(&path).unwrap();
        assert!(back.contains("Acme"));
        assert_eq!(back.len(), 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn config_file_is_validated() {
        let path = scratch("config.json", r#"{"cache":{"capacity":3}}"#);
        assert_eq!(PipelineConfig::from_path(&path).unwrap().cache.capacity, 3);
        std::fs::remove_file(&path).ok();

        let bad = scratch("bad-config.json", r#"{"search":{"min_len":0}}"#);
        assert!(matches!(
            PipelineConfig::from_path(&bad),
            Err(DirError::InvalidConfig(_))
        ));
        std::fs::remove_file(bad).ok();
    }

    #[cfg(feature = "compact")]
    #[test]
    fn gzip_dataset_is_decoded() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let path = std::env::temp_dir().join(format!(
            "dirsift-loader-{}-companies.json.gz",
            std::process::id()
        ));
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(br#"[{"company_name":"Acme"}]"#).unwrap();
        enc.finish().unwrap();

        assert!(is_gzip(&path));
        assert_eq!(load_dataset(&path).unwrap().len(), 1);
        std::fs::remove_file(path).ok();
    }
}
