//! Test doubles for the engine's capabilities.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use rulecrawl::engine::{
    Capabilities, ExecutionContext, FetchRequest, FetchResponse, Fetcher, RequestParams,
    ScriptEvaluator,
};
use rulecrawl::{EngineError, HtmlSelector, Result, Rule};

pub const HOST: &str = "https://books.example";

/// Serves canned bodies keyed by URL template, with `$page` replaced by
/// the context page. Unknown URLs fail.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(
        &self,
        request: FetchRequest<'_>,
        ctx: &ExecutionContext,
    ) -> Result<FetchResponse> {
        let url = request.url.replace("$page", &ctx.page().to_string());
        self.calls.lock().unwrap().push(url.clone());

        let body = self
            .pages
            .get(&url)
            .cloned()
            .ok_or_else(|| EngineError::Fetch(format!("no page for {}", url)))?;

        Ok(FetchResponse {
            body,
            params: RequestParams {
                url,
                method: "GET".to_string(),
                ..Default::default()
            },
        })
    }
}

/// Returns canned values per script source and records each context seen.
#[derive(Default)]
pub struct MockScripts {
    results: HashMap<String, Value>,
    seen: Mutex<Vec<ExecutionContext>>,
}

impl MockScripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, script: &str, value: Value) -> Self {
        self.results.insert(script.to_string(), value);
        self
    }

    pub fn seen(&self) -> Vec<ExecutionContext> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptEvaluator for MockScripts {
    async fn evaluate(&self, script: &str, ctx: &ExecutionContext) -> Result<Value> {
        self.seen.lock().unwrap().push(ctx.clone());
        self.results
            .get(script)
            .cloned()
            .ok_or_else(|| EngineError::Script(format!("unexpected script {}", script)))
    }
}

/// Capabilities using the real HTML selector over mock scripts and fetcher.
pub fn capabilities(scripts: Arc<MockScripts>, fetcher: Arc<MockFetcher>) -> Capabilities {
    let selector = HtmlSelector::new().with_scripts(scripts.clone());
    Capabilities::new(scripts, Arc::new(selector), fetcher)
}

/// A rule with the host set and everything else empty.
pub fn base_rule() -> Rule {
    Rule {
        id: "books".to_string(),
        name: "Books".to_string(),
        host: HOST.to_string(),
        ..Default::default()
    }
}
