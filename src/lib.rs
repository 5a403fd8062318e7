//! rulecrawl - rule-driven extraction from third-party sites.
//!
//! A rule describes how to search a site, list a work's chapters, read a
//! chapter's (possibly paginated) content and browse its discover
//! listings. The engine resolves those rules against live documents
//! through pluggable script, selector and fetch capabilities.

pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod models;
pub mod rules;
pub mod select;
pub mod services;

pub use config::Config;
pub use engine::{
    Capabilities, ContinuationCache, EngineOptions, ExecutionContext, NoScripts, RuleEngine,
};
pub use error::{EngineError, Result};
pub use fetch::HttpFetcher;
pub use rules::{ContentType, Rule, RuleStore};
pub use select::HtmlSelector;
pub use services::RuleService;
