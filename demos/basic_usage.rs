//! Basic usage example for dirsift
//!
//! This example demonstrates how to:
//! - Build the prefix index over a handful of records
//! - Filter by tags, favorites and a search term
//! - Sort popular entries first
//! - Reuse results through the result cache
//! - Ask for search-box suggestions

use dirsift_core::prelude::*;
use dirsift_core::search::suggest;

fn directory() -> Vec<Organization> {
    let mut ionity = Organization::new("Ionity", &["charging", "ev"]);
    ionity.contact_name = "Dana Corp".into();
    vec![
        Organization::new("Acme Corp", &["ev", "fleet"]),
        Organization::new("Beta Motors", &["ev", "fast"]),
        ionity,
        Organization::new("Émile Logistics", &["fleet"]),
        Organization::new("Zeta Grid", &["charging"]),
    ]
}

fn print(items: &[Organization], ids: &[ItemId]) {
    for &id in ids {
        let org = &items[id as usize];
        println!("  {:<16} [{}]", org.name(), org.tags().join(", "));
    }
    println!();
}

fn main() -> Result<()> {
    println!("=== dirsift Basic Usage Example ===\n");

    let dataset = Dataset::new(directory());
    let config = PipelineConfig::default();
    println!("Loaded {} entries, tags: {:?}\n", dataset.len(), dataset.tag_catalog());

    let mut index = SearchIndex::new(config.search.min_len);
    index.build(dataset.items());

    let favorites: FavoriteSet = ["Zeta Grid"].into_iter().collect();
    let popular: PopularitySet = ["beta motors"].into_iter().collect();
    let pipeline = FilterPipeline::new(dataset.items(), &index, &favorites, &popular);

    // Example 1: Tag filter (all selected tags must match)
    println!("--- Example 1: entries tagged `ev` ---");
    let state = FilterState::new().with_tags(["ev"]);
    print(dataset.items(), &pipeline.sort(&pipeline.filter_all(&state)));

    // Example 2: Index-backed search term
    println!("--- Example 2: search `acm` (prefix index) ---");
    let state = FilterState::new().with_search_term("acm");
    print(dataset.items(), &pipeline.filter_all(&state));

    // Example 3: Single-character terms scan every field
    println!("--- Example 3: search `d` (linear scan, reaches contact names) ---");
    let state = FilterState::new().with_search_term("d");
    print(dataset.items(), &pipeline.sort(&pipeline.filter_all(&state)));

    // Example 4: Favorites only
    println!("--- Example 4: favorites only ---");
    let state = FilterState::new().with_favorites_only(true);
    print(dataset.items(), &pipeline.filter_all(&state));

    // Example 5: Cache
    println!("--- Example 5: result cache ---");
    let mut cache = ResultCache::new(config.cache.capacity);
    let state = FilterState::new().with_tags(["fleet"]);
    let sorted: Results = pipeline.sort(&pipeline.filter_all(&state)).into();
    cache.set(&state, sorted);
    let again = FilterState::new().with_tags(["fleet"]);
    println!("signature: {}", again.signature());
    println!("cached: {:?}", cache.get(&again).as_deref());
    println!("stats:  {:?}\n", cache.stats());

    // Example 6: Suggestions
    println!("--- Example 6: suggestions for `ch` ---");
    for s in suggest(&dataset, "ch", config.search.min_len, config.search.max_suggestions) {
        println!("  {:?}: {}", s.kind, s.value);
    }

    Ok(())
}
