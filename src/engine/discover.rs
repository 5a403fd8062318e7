//! Discover map parsing and discover page resolution.
//!
//! A rule's discover URL is a small clause language. Clauses are separated
//! by newlines or `&&`, and each one is `tab::value`, `tab::class::value`
//! or a bare `value`:
//!
//! ```text
//! Fiction::Romance::https://site/romance?p=$page
//! Fiction::SciFi::https://site/scifi?p=$page && Latest::https://site/new
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use super::continuation::ContinuationCache;
use super::pagination::PageStrategy;
use super::RuleEngine;
use crate::error::Result;
use crate::models::{parse_tags, DiscoverItem, DiscoverList, DiscoverMapBuilder};
use crate::rules::{value_to_text, DiscoverSource, RuleValue};

/// Tab and class name used when a clause does not name one.
pub const ALL_LABEL: &str = "all";

const EXAMPLE_LABEL: &str = "example";
const EXAMPLE_URL: &str = "http://example.com/";

static CLAUSE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*|&&").unwrap());

/// One parsed discover clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverClause<'a> {
    pub tab: &'a str,
    pub class_name: &'a str,
    pub value: &'a str,
}

/// Split a clause string on newlines or `&&`.
pub fn split_clauses(raw: &str) -> Vec<String> {
    CLAUSE_SEPARATOR.split(raw).map(str::to_string).collect()
}

/// Parse a clause, returning None for blank clauses.
///
/// Segment counts other than 2 or 3 keep only the last segment as the value.
pub fn parse_clause(clause: &str) -> Option<DiscoverClause<'_>> {
    if clause.trim().is_empty() {
        return None;
    }

    let segments: Vec<&str> = clause.split("::").collect();
    let value = segments.last().copied().map(str::trim).unwrap_or_default();

    let (tab, class_name) = match *segments.as_slice() {
        [tab, _] => (tab.trim(), ALL_LABEL),
        [tab, class_name, _] => (tab.trim(), class_name.trim()),
        _ => (ALL_LABEL, ALL_LABEL),
    };

    Some(DiscoverClause {
        tab,
        class_name,
        value,
    })
}

/// Normalize a script result into clause strings.
fn clauses_from_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().map(value_to_text).collect(),
        Value::String(s) => split_clauses(&s),
        _ => Vec::new(),
    }
}

impl RuleEngine {
    /// Parse the rule's discover tabs.
    ///
    /// Always returns at least one tab: when nothing parses, a fallback tab
    /// points at the host (or a placeholder when the host is not a URL).
    pub async fn discover_map(&self) -> Result<Vec<DiscoverList>> {
        let rule = &self.rule;
        let clauses = self.discover_clauses().await?;

        let mut builder = DiscoverMapBuilder::new();
        for clause in clauses.iter().filter_map(|c| parse_clause(c)) {
            builder.push(clause.tab, clause.class_name, clause.value);
        }

        if builder.is_empty() {
            debug!("No discover clauses for {}, using fallback tab", rule.id);
            if rule.host_is_url() {
                builder.push(ALL_LABEL, ALL_LABEL, &rule.host);
            } else {
                builder.push(EXAMPLE_LABEL, EXAMPLE_LABEL, EXAMPLE_URL);
            }
        }

        Ok(builder.build())
    }

    async fn discover_clauses(&self) -> Result<Vec<String>> {
        match &self.rule.discover_url {
            DiscoverSource::None => Ok(Vec::new()),
            DiscoverSource::Many(items) => Ok(items.clone()),
            DiscoverSource::Single(raw) => match RuleValue::parse(raw.trim_start()) {
                RuleValue::Literal(literal) => Ok(split_clauses(literal)),
                RuleValue::Script(script) => {
                    let ctx = self
                        .context()
                        .with_page(1)
                        .with_base_url(&self.rule.host);
                    let value = self.caps.scripts.evaluate(script, &ctx).await?;
                    Ok(clauses_from_value(value))
                }
            },
        }
    }

    /// Resolve page `page` (1-based) of the listing at `origin`.
    ///
    /// Pages past the first follow `cache` when the rule declares a
    /// next-page expression, or re-fetch `origin` when it carries a page
    /// token. When no URL is determinable the result is empty.
    pub async fn discover_page(
        &self,
        origin: &str,
        page: u32,
        cache: &mut ContinuationCache,
    ) -> Result<Vec<DiscoverItem>> {
        let rule = &self.rule;
        let selector = &self.caps.selector;
        let page = page.max(1);

        let url = if page == 1 {
            Some(origin.to_string())
        } else {
            match PageStrategy::detect(rule.has_discover_next_url(), origin) {
                PageStrategy::NextUrl => cache.next_url(origin).map(str::to_string),
                PageStrategy::PageToken => Some(origin.to_string()),
                PageStrategy::SinglePage => None,
            }
        };

        let Some(url) = url else {
            debug!("No URL for page {} of {}", page, origin);
            return Ok(Vec::new());
        };

        let ctx = self.context().with_result(origin).with_page(page);
        let response = self.fetch(&url, "", "", &ctx).await?;
        let ctx = ctx
            .with_last_result(origin)
            .with_result(&response.body)
            .with_base_url(&rule.host);

        if rule.has_discover_next_url() {
            let next = selector
                .get_string(&rule.discover_next_url, &response.body, &ctx)
                .await?;
            debug!("Next discover page for {}: {:?}", origin, next);
            cache.store(origin, next);
        } else {
            cache.forget(origin);
        }

        let rows = self.get_list(&response.body, &rule.discover_list, &ctx).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let tags = parse_tags(&selector.get_string(&rule.discover_tags, row, &ctx).await?);
            items.push(DiscoverItem {
                cover: selector.get_string(&rule.discover_cover, row, &ctx).await?,
                name: selector.get_string(&rule.discover_name, row, &ctx).await?,
                author: selector.get_string(&rule.discover_author, row, &ctx).await?,
                chapter: selector.get_string(&rule.discover_chapter, row, &ctx).await?,
                description: selector
                    .get_string(&rule.discover_description, row, &ctx)
                    .await?,
                url: selector.get_string(&rule.discover_result, row, &ctx).await?,
                tags,
            });
        }

        info!("Discover page {} of {} has {} items", page, origin, items.len());
        Ok(items)
    }
}
