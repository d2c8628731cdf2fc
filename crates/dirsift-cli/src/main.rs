//! dirsift: Command-line interface for dirsift-core
//!
//! Loads a directory dataset, runs the same search pipeline a browser page
//! would, and prints the results. Scheduling runs on a virtual clock, so
//! debounce and batching cost no wall time here.
//!
//! Usage examples
//! --------------
//!
//! - Show overall stats
//!   $ dirsift stats
//!
//! - List the tag catalog
//!   $ dirsift tags
//!
//! - Filter by tags and a search term, popular entries first
//!   $ dirsift --popular data/popular.json search --tag ev --tag fleet acme
//!
//! - Suggestions for a partial term
//!   $ dirsift suggest ion
//!
//! - Toggle a favorite, then list favorites only
//!   $ dirsift --favorites favs.json favorite "Acme Corp"
//!   $ dirsift --favorites favs.json search --favorites-only
//!
//! Set `RUST_LOG=debug` to watch index builds, cache hits and batch delivery.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use dirsift_core::prelude::{
    Explorer, FavoriteSet, ItemId, Organization, PipelineConfig, PopularitySet, Presenter,
    RenderBatch, Searchable, SuggestionKind, VirtualLoop,
};
use dirsift_core::{load_favorites, load_popularity, load_records, save_favorites};
use std::cell::RefCell;
use std::rc::Rc;

/// Keeps the most recent delivery.
#[derive(Default)]
struct Collector {
    ids: Vec<ItemId>,
    batches: usize,
    announced: Option<usize>,
}

impl Presenter for Collector {
    fn mount(&mut self, batch: RenderBatch) {
        if batch.replaces_previous() {
            self.ids.clear();
            self.batches = 0;
            self.announced = None;
        }
        log::debug!(
            "batch at {}: {} of {} items",
            batch.start(),
            batch.len(),
            batch.total()
        );
        self.ids.extend_from_slice(batch.items());
        self.batches += 1;
    }

    fn announce(&mut self, count: usize) {
        self.announced = Some(count);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let items: Vec<Organization> = load_records(&args.input)
        .with_context(|| format!("loading dataset {}", args.input.display()))?;
    let popular = match &args.popular {
        Some(path) => load_popularity(path)?,
        None => PopularitySet::new(),
    };
    let favorites = match &args.favorites {
        Some(path) => load_favorites(path)?,
        None => FavoriteSet::new(),
    };

    let ev = VirtualLoop::new();
    let view = Rc::new(RefCell::new(Collector::default()));
    let explorer = Explorer::new(config, Rc::new(ev.clone()), view.clone(), Box::new(favorites))?;
    explorer.load(items, popular);

    match args.command {
        Commands::Stats => {
            let stats = explorer.stats();
            println!("Dataset statistics:");
            println!("  Entries:   {}", stats.items);
            println!("  Tags:      {}", stats.tags);
            println!("  Favorites: {}", explorer.favorite_names().len());
        }

        Commands::Tags => {
            for tag in explorer.tag_catalog() {
                println!("{tag}");
            }
        }

        Commands::Search {
            tags,
            favorites_only,
            limit,
            term,
        } => {
            for tag in &tags {
                explorer.toggle_tag(tag);
            }
            if favorites_only {
                explorer.set_favorites_only(true);
            }
            if let Some(term) = &term {
                explorer.commit_search(term);
            }
            ev.run_until_stalled();

            let view = view.borrow();
            let shown = limit.unwrap_or(usize::MAX);
            for &id in view.ids.iter().take(shown) {
                explorer.with_item(id, |org| print_entry(&explorer, org));
            }
            let count = view.announced.unwrap_or(view.ids.len());
            if count == 0 {
                println!("No entries match.");
            } else {
                println!("-- {count} entries ({} batches)", view.batches);
            }
        }

        Commands::Suggest { term } => {
            let suggestions = explorer.suggest(&term);
            if suggestions.is_empty() {
                println!("No suggestions for: {term}");
            }
            for s in suggestions {
                let kind = match s.kind {
                    SuggestionKind::Name => "name",
                    SuggestionKind::Tag => "tag",
                };
                println!("{kind:>4}  {}", s.value);
            }
        }

        Commands::Favorite { name } => {
            let Some(path) = &args.favorites else {
                bail!("`favorite` needs --favorites <FILE> to save to");
            };
            let now = explorer.toggle_favorite(&name);
            let saved: FavoriteSet = explorer.favorite_names().into_iter().collect();
            save_favorites(path, &saved)
                .with_context(|| format!("saving favorites to {}", path.display()))?;
            println!(
                "{name}: {}",
                if now { "added to favorites" } else { "removed from favorites" }
            );
        }
    }

    explorer.dispose();
    Ok(())
}

fn print_entry(explorer: &Explorer<Organization>, org: &Organization) {
    let mut marks = String::new();
    if explorer.is_popular(org.name()) {
        marks.push('*');
    }
    if explorer.is_favorite(org.name()) {
        marks.push('+');
    }
    println!("{marks:<2} {}  [{}]", org.name(), org.tags().join(", "));
    if let Some(summary) = org.summary() {
        println!("     {summary}");
    }
}
