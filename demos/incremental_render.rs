//! Incremental rendering example for dirsift
//!
//! Drives an `Explorer` on a virtual clock to show:
//! - Results arriving in batches (first on a frame, the rest on idle callbacks)
//! - Search-box debouncing: only the last keystroke's term is applied
//! - A newer delivery silencing an older one still in flight

use dirsift_core::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

struct Printer {
    label: &'static str,
}

impl Presenter for Printer {
    fn mount(&mut self, batch: RenderBatch) {
        println!(
            "  [{}] mount {:>3}..{:<3} of {:<3} stagger {:>3}ms{}",
            self.label,
            batch.start(),
            batch.start() + batch.len(),
            batch.total(),
            batch.stagger_ms(),
            if batch.replaces_previous() { "  (replace)" } else { "" }
        );
    }

    fn announce(&mut self, count: usize) {
        println!("  [{}] {count} entries found", self.label);
    }
}

fn directory(n: usize) -> Vec<Organization> {
    (0..n)
        .map(|i| {
            let tag = if i % 3 == 0 { "charging" } else { "fleet" };
            Organization::new(format!("Company {i:03}"), &["ev", tag])
        })
        .collect()
}

fn main() -> Result<()> {
    println!("=== dirsift Incremental Render Example ===\n");

    let ev = VirtualLoop::new();
    let view = Rc::new(RefCell::new(Printer { label: "view" }));
    let explorer = Explorer::new(
        PipelineConfig::default(),
        Rc::new(ev.clone()),
        view,
        Box::new(FavoriteSet::new()),
    )?;

    println!("--- Initial load: 45 entries, batches of 20 ---");
    explorer.load(directory(45), PopularitySet::new());
    ev.run_frame();
    while ev.run_idle() {}
    println!();

    println!("--- Typing `c`, `co`, `company 01` 40ms apart ---");
    for (t, text) in ["c", "co", "company 01"].into_iter().enumerate() {
        if t > 0 {
            ev.advance(40);
        }
        let suggestions = explorer.input_search(text);
        println!("  t={:>3}ms  {text:<11} -> {} suggestions", ev.now_ms(), suggestions.len());
    }
    let fired_at = ev.now_ms() + u64::from(explorer.config().search.debounce_ms);
    ev.run_until_stalled();
    println!("  debounce fired once at t={fired_at}ms\n");

    println!("--- A new filter while batches are in flight ---");
    explorer.clear_filters();
    ev.run_frame();
    explorer.toggle_tag("charging");
    ev.run_until_stalled();
    println!();

    println!("--- Cache ---");
    explorer.clear_filters();
    explorer.toggle_tag("charging");
    ev.run_until_stalled();
    println!("  {:?}", explorer.cache_stats());

    explorer.dispose();
    Ok(())
}
