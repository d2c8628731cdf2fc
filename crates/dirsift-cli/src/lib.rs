//! dirsift-cli
//! ===========
//!
//! Command-line interface for the `dirsift-core` search pipeline.
//!
//! This crate primarily provides a binary (`dirsift`). We include a small
//! library target so that docs.rs renders a documentation page and shows this
//! overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cargo install dirsift-cli
//! dirsift --help
//! dirsift --input data/companies.json stats
//! dirsift --input data/companies.json search --tag ev acme
//! ```
//!
//! For programmatic access, use the [`dirsift-core`] crate directly.
//!
//! Links
//! -----
//! - Repository: <https://github.com/holg/dirsift-rs>
//! - Core crate: <https://docs.rs/dirsift-core>
//!
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable.
