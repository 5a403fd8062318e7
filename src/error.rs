//! Error types for rule resolution.

use thiserror::Error;

/// Errors that can occur while resolving a rule against a site.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rule not found: {0}")]
    RuleNotFound(String),

    #[error("failed to load rules: {0}")]
    RuleLoad(String),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("no script evaluator is configured")]
    ScriptUnavailable,

    #[error("invalid selector expression: {0}")]
    Selector(String),

    #[error("invalid request template: {0}")]
    InvalidRequest(String),

    /// The engine ran to completion but produced no content.
    #[error("content extraction failed")]
    ContentEmpty,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
