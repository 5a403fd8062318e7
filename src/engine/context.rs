//! Execution context visible to script evaluation.
//!
//! The context is a value: every update consumes it and returns the next
//! one, so each resolution step receives exactly the state it was handed.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::rules::Rule;

/// Well-known context keys.
pub mod keys {
    pub const HOST: &str = "host";
    pub const HOST_VAR: &str = "$host";
    pub const COOKIE: &str = "cookie";
    pub const RULE: &str = "rule";
    pub const PAGE: &str = "page";
    pub const PAGE_VAR: &str = "$page";
    pub const PAGE_SIZE_VAR: &str = "$pageSize";
    pub const SEARCH_PAGE: &str = "searchPage";
    pub const KEYWORD: &str = "keyword";
    pub const KEYWORD_VAR: &str = "$keyword";
    pub const SEARCH_KEY: &str = "searchKey";
    pub const RESULT: &str = "result";
    pub const LAST_RESULT: &str = "lastResult";
    pub const BASE_URL: &str = "baseUrl";
}

/// Default `$pageSize` exported to scripts.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Key/value environment threaded through one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    vars: BTreeMap<String, Value>,
}

impl ExecutionContext {
    /// Initial context for a rule.
    pub fn seed(rule: &Rule, page_size: u32) -> Self {
        let rule_json = serde_json::to_value(rule).unwrap_or(Value::Null);

        Self::default()
            .with(keys::HOST, rule.host.as_str())
            .with(keys::HOST_VAR, rule.host.as_str())
            .with(keys::COOKIE, rule.cookies.as_str())
            .with(keys::RULE, rule_json)
            .with(keys::PAGE_SIZE_VAR, page_size)
            .with(keys::SEARCH_PAGE, 1)
            .with_page(1)
    }

    /// Set a single key, replacing any previous value.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Set the keyword under all the names rules use for it.
    pub fn with_keyword(self, keyword: &str) -> Self {
        self.with(keys::KEYWORD_VAR, keyword)
            .with(keys::KEYWORD, keyword)
            .with(keys::SEARCH_KEY, keyword)
    }

    pub fn with_page(self, page: u32) -> Self {
        self.with(keys::PAGE, page).with(keys::PAGE_VAR, page)
    }

    pub fn with_result(self, result: &str) -> Self {
        self.with(keys::RESULT, result)
    }

    pub fn with_last_result(self, last_result: &str) -> Self {
        self.with(keys::LAST_RESULT, last_result)
    }

    pub fn with_base_url(self, base_url: &str) -> Self {
        self.with(keys::BASE_URL, base_url)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.vars.get(key).and_then(Value::as_str)
    }

    /// Current page number, 1 if unset.
    pub fn page(&self) -> u32 {
        self.vars
            .get(keys::PAGE)
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.vars
            .get(keys::PAGE_SIZE_VAR)
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn keyword(&self) -> &str {
        self.get_str(keys::KEYWORD).unwrap_or("")
    }

    pub fn vars(&self) -> &BTreeMap<String, Value> {
        &self.vars
    }

    /// The whole context as a JSON object, for handing to interpreters.
    pub fn to_json(&self) -> Value {
        Value::Object(self.vars.clone().into_iter().collect())
    }
}
