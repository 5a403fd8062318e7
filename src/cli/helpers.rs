//! Shared helper functions for CLI commands.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use rulecrawl::{Capabilities, Config, HtmlSelector, HttpFetcher, NoScripts, RuleService, RuleStore};

/// Build the service from configuration and the resolved rules file.
pub fn build_service(config: &Config, rules_override: Option<&Path>) -> anyhow::Result<RuleService> {
    let Some(rules_path) = config.rules_path(rules_override) else {
        anyhow::bail!("No rules file configured. Pass --rules or set rules_path in rulecrawl.toml.");
    };
    let rules = RuleStore::load(&rules_path)
        .map_err(|e| anyhow::anyhow!("Failed to load rules from {}: {}", rules_path.display(), e))?;

    let scripts = Arc::new(NoScripts);
    let selector = Arc::new(HtmlSelector::new().with_scripts(scripts.clone()));
    let fetcher = Arc::new(HttpFetcher::new(
        config.timeout(),
        config.user_agent.as_deref(),
        scripts.clone(),
    )?);

    let caps = Capabilities::new(scripts, selector, fetcher);
    Ok(RuleService::new(rules, caps).with_options(config.engine_options()))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string for display, appending "..." when shortened.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer rule name", 10), "a longe...");
        assert_eq!(truncate("正文正文正文", 5), "正文...");
    }
}
