//! Rule resolution engine.
//!
//! Drives the fetch-and-extract cycles for each operation a rule supports:
//! search, chapter list, paginated content, discover map and discover
//! pages. Every step awaits its fetch, script or selector call in order;
//! nothing is fanned out, so output ordering follows call ordering.

mod capabilities;
mod chapter;
mod content;
mod context;
mod continuation;
mod discover;
mod pagination;
mod search;

pub use capabilities::{
    Capabilities, FetchRequest, FetchResponse, Fetcher, NoScripts, RequestParams,
    ScriptEvaluator, Selector,
};
pub use content::normalize_lines;
pub use context::{keys, ExecutionContext, DEFAULT_PAGE_SIZE};
pub use continuation::ContinuationCache;
pub use discover::{parse_clause, split_clauses, DiscoverClause, ALL_LABEL};
pub use pagination::{has_page_token, PageState, PageStrategy, Paginator};

use tracing::debug;

use crate::error::Result;
use crate::rules::{value_to_text, Rule, RuleValue};

/// Resolved URL meaning "do not fetch; the body is empty".
pub const NULL_URL: &str = "null";

/// Marker reversing the order of a list selection.
pub const REVERSE_MARKER: char = '-';

/// Tunables that do not belong to any single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Exported to scripts as `$pageSize`.
    pub page_size: u32,
    /// Optional ceiling on content pages. None keeps pagination unbounded.
    pub max_content_pages: Option<u32>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_content_pages: None,
        }
    }
}

/// Resolves one rule's operations against live documents.
///
/// The engine holds no per-operation state: each call seeds its own
/// context, and discover continuation state is owned by the caller.
#[derive(Clone)]
pub struct RuleEngine {
    rule: Rule,
    caps: Capabilities,
    options: EngineOptions,
}

impl RuleEngine {
    pub fn new(rule: Rule, caps: Capabilities) -> Self {
        Self {
            rule,
            caps,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Fresh context seeded from the rule.
    pub fn context(&self) -> ExecutionContext {
        ExecutionContext::seed(&self.rule, self.options.page_size)
    }

    /// Resolve a rule value that may be a script directive.
    pub async fn resolve_value(&self, raw: &str, ctx: &ExecutionContext) -> Result<String> {
        match RuleValue::parse(raw) {
            RuleValue::Literal(literal) => Ok(literal.to_string()),
            RuleValue::Script(script) => {
                let value = self.caps.scripts.evaluate(script, ctx).await?;
                Ok(value_to_text(value))
            }
        }
    }

    /// Resolve `template` and fetch it, honouring the `null` URL.
    async fn fetch(
        &self,
        template: &str,
        keyword: &str,
        last_result: &str,
        ctx: &ExecutionContext,
    ) -> Result<FetchResponse> {
        let url = self.resolve_value(template, ctx).await?;
        if url == NULL_URL {
            debug!("Skipping fetch for null URL");
            return Ok(FetchResponse::default());
        }

        let request = FetchRequest {
            url: &url,
            keyword,
            last_result,
            rule: &self.rule,
        };
        let response = self.caps.fetcher.fetch(request, ctx).await?;
        debug!(
            "Fetched {} ({} bytes)",
            response.params.url,
            response.body.len()
        );
        Ok(response)
    }

    /// Select row documents, reversing them when `expr` carries the marker.
    pub async fn get_list(
        &self,
        doc: &str,
        expr: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<String>> {
        let (expr, reversed) = split_reversal(expr);
        let mut rows = self.caps.selector.get_elements(expr, doc, ctx).await?;
        if reversed {
            rows.reverse();
        }
        Ok(rows)
    }

    /// Select strings, reversing them when `expr` carries the marker.
    pub async fn get_string_list(
        &self,
        doc: &str,
        expr: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<String>> {
        let (expr, reversed) = split_reversal(expr);
        let mut items = self.caps.selector.get_string_list(expr, doc, ctx).await?;
        if reversed {
            items.reverse();
        }
        Ok(items)
    }
}

/// Strip a leading reversal marker, reporting whether it was present.
fn split_reversal(expr: &str) -> (&str, bool) {
    match expr.strip_prefix(REVERSE_MARKER) {
        Some(rest) => (rest, true),
        None => (expr, false),
    }
}
