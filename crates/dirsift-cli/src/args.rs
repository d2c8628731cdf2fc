use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for dirsift
#[derive(Debug, Parser)]
#[command(
    name = "dirsift",
    version,
    about = "Search, filter and inspect a directory dataset"
)]
pub struct CliArgs {
    /// Path to the dataset (JSON array, optionally .json.gz)
    #[arg(short = 'i', long = "input", global = true, default_value = "data/companies.json")]
    pub input: PathBuf,

    /// JSON array of popular names; a missing file means none are popular
    #[arg(short = 'p', long = "popular", global = true)]
    pub popular: Option<PathBuf>,

    /// JSON array of favorite names, read and (for `favorite`) written back
    #[arg(short = 'f', long = "favorites", global = true)]
    pub favorites: Option<PathBuf>,

    /// Pipeline configuration file (JSON); missing keys take defaults
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the dataset
    Stats,

    /// List every tag, sorted
    Tags,

    /// Filter and sort the directory
    Search {
        /// Only entries carrying this tag (repeat for several; all must match)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Only favorites
        #[arg(long = "favorites-only")]
        favorites_only: bool,

        /// Stop printing after this many entries
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,

        /// Search term (case-insensitive)
        term: Option<String>,
    },

    /// Show search-box suggestions for a partial term
    Suggest {
        term: String,
    },

    /// Toggle a favorite and save the favorites file
    Favorite {
        /// Exact entry name
        name: String,
    },
}
