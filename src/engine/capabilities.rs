//! External capabilities the engine drives.
//!
//! Script evaluation, document selection and HTTP transport live behind
//! these traits so the engine only orchestrates them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::ExecutionContext;
use crate::error::{EngineError, Result};
use crate::rules::Rule;

/// Evaluates script directives against a context.
#[async_trait]
pub trait ScriptEvaluator: Send + Sync {
    /// Evaluate `script` (prefix already stripped).
    ///
    /// Strings, string arrays and scalars are all valid results.
    async fn evaluate(&self, script: &str, ctx: &ExecutionContext) -> Result<Value>;
}

/// Pulls strings and row documents out of a document.
#[async_trait]
pub trait Selector: Send + Sync {
    async fn get_string(&self, expr: &str, doc: &str, ctx: &ExecutionContext) -> Result<String>;

    async fn get_string_list(
        &self,
        expr: &str,
        doc: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<String>>;

    /// Row documents, each usable as `doc` for further selection.
    async fn get_elements(
        &self,
        expr: &str,
        doc: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<String>>;

    /// Like `get_string`, resolved to an absolute URL against `host`.
    async fn get_url(
        &self,
        expr: &str,
        host: &str,
        doc: &str,
        ctx: &ExecutionContext,
    ) -> Result<String>;
}

/// What the engine asks the fetcher for.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// URL template, with any `@js:` directive already resolved.
    pub url: &'a str,
    pub keyword: &'a str,
    pub last_result: &'a str,
    pub rule: &'a Rule,
}

/// Request parameters after template expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub body: String,
    pub params: RequestParams,
}

/// Expands a URL template and performs the request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest<'_>, ctx: &ExecutionContext)
        -> Result<FetchResponse>;
}

/// Script evaluator for deployments without an interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScripts;

#[async_trait]
impl ScriptEvaluator for NoScripts {
    async fn evaluate(&self, _script: &str, _ctx: &ExecutionContext) -> Result<Value> {
        Err(EngineError::ScriptUnavailable)
    }
}

/// The capability set an engine runs with.
#[derive(Clone)]
pub struct Capabilities {
    pub scripts: Arc<dyn ScriptEvaluator>,
    pub selector: Arc<dyn Selector>,
    pub fetcher: Arc<dyn Fetcher>,
}

impl Capabilities {
    pub fn new(
        scripts: Arc<dyn ScriptEvaluator>,
        selector: Arc<dyn Selector>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            scripts,
            selector,
            fetcher,
        }
    }
}
