//! Discover commands.

use console::style;

use rulecrawl::{ContinuationCache, RuleService};

use crate::cli::helpers::print_json;

/// Print a rule's discover tabs.
pub async fn cmd_discover_map(service: &RuleService, rule_id: &str) -> anyhow::Result<()> {
    let tabs = service.discover_map(rule_id).await?;

    for tab in &tabs {
        eprintln!(
            "{} {} ({} listings)",
            style("•").dim(),
            style(&tab.name).bold(),
            tab.pairs.len()
        );
    }
    print_json(&tabs)
}

/// Browse `pages` pages of a discover listing, stopping at the first empty page.
pub async fn cmd_discover(
    service: &RuleService,
    rule_id: &str,
    origin: &str,
    pages: u32,
) -> anyhow::Result<()> {
    let mut cache = ContinuationCache::new();
    let mut items = Vec::new();

    for page in 1..=pages.max(1) {
        let found = service.discover(rule_id, origin, page, &mut cache).await?;
        if found.is_empty() {
            eprintln!("{} Page {} is empty, stopping", style("!").yellow(), page);
            break;
        }
        eprintln!("{} Page {}: {} items", style("✓").green(), page, found.len());
        items.extend(found);
    }

    print_json(&items)
}
