//! Selector maintenance helper: replays the probe list against a saved
//! page dump (by default the `page_content.html` postmortem artifact) and
//! reports what each selector would have extracted.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::fs;

use cenacolo_fetcher::scrapers::{extract_candidates, CalendarSite, VivaTicket};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "page_content.html".to_string());
    println!("Analyzing {path}...");

    let html = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {path} (run a fetch first, or pass a path)"))?;
    let document = Html::parse_document(&html);

    let site = VivaTicket;
    for selector_str in site.probe_selectors() {
        if let Ok(selector) = Selector::parse(selector_str) {
            let count = document.select(&selector).count();
            if count > 0 {
                println!("Selector '{selector_str}' matched {count} elements");
            }
        }
    }

    let candidates = extract_candidates(&html, &site);
    let available = candidates.iter().filter(|c| c.available).count();
    println!(
        "\nWould extract {} candidate(s), {} available",
        candidates.len(),
        available
    );
    for candidate in candidates.iter().take(20) {
        println!("- {candidate:?}");
    }
    if candidates.len() > 20 {
        println!("... and {} more", candidates.len() - 20);
    }

    Ok(())
}
