//! URL template expansion.
//!
//! Templates may reference the keyword, page and host through `$`-variables,
//! embed `{{ expr }}` directives, and may be a JSON request object instead
//! of a plain URL:
//!
//! ```text
//! /search?q=$keyword&p=$page
//! /list/{{page * 2}}
//! {"url": "/api/search", "method": "POST", "body": "q=$keyword"}
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::engine::RequestParams;
use crate::error::{EngineError, Result};
use crate::rules::value_to_text;
use crate::select::resolve_url;

/// `{{ expr }}` directives, non-greedy so adjacent directives stay apart.
pub(super) static INLINE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.+?)\}\}").unwrap());

/// Values substituted for `$`-variables.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub keyword: &'a str,
    pub last_result: &'a str,
    pub page: u32,
    pub page_size: u32,
    pub host: &'a str,
}

/// `$`-variables and their bare aliases. `$pageSize` precedes `$page` so
/// the longer name wins.
static TEMPLATE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$pageSize|\$keyword|searchKey|\$page|searchPage|\$host|\$result").unwrap()
});

/// Substitute `$`-variables in a single pass. The keyword is URL-encoded.
///
/// Substituted values are never rescanned, so a keyword or result that
/// itself contains a variable name is inserted verbatim.
pub fn expand_variables(template: &str, vars: &TemplateVars<'_>) -> String {
    let keyword = urlencoding::encode(vars.keyword);
    let page = vars.page.to_string();
    let page_size = vars.page_size.to_string();

    TEMPLATE_VARIABLE
        .replace_all(template, |caps: &Captures<'_>| match &caps[0] {
            "$pageSize" => page_size.clone(),
            "$keyword" | "searchKey" => keyword.to_string(),
            "$page" | "searchPage" => page.clone(),
            "$host" => vars.host.to_string(),
            _ => vars.last_result.to_string(),
        })
        .into_owned()
}

#[derive(Debug, Deserialize)]
struct RequestSpec {
    url: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: HashMap<String, serde_json::Value>,
    #[serde(default)]
    body: Option<serde_json::Value>,
}

/// Turn an expanded template into request parameters.
pub fn parse_request(expanded: &str, host: &str) -> Result<RequestParams> {
    let trimmed = expanded.trim();

    if !trimmed.starts_with('{') {
        return Ok(RequestParams {
            url: resolve_url(host, trimmed),
            method: "GET".to_string(),
            ..Default::default()
        });
    }

    let spec: RequestSpec = serde_json::from_str(trimmed)
        .map_err(|e| EngineError::InvalidRequest(format!("{}: {}", trimmed, e)))?;

    let method = spec
        .method
        .map(|m| m.to_uppercase())
        .unwrap_or_else(|| "GET".to_string());

    Ok(RequestParams {
        url: resolve_url(host, spec.url.trim()),
        method,
        headers: spec
            .headers
            .into_iter()
            .map(|(name, value)| (name, value_to_text(value)))
            .collect(),
        body: spec.body.map(value_to_text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars<'static> {
        TemplateVars {
            keyword: "dune messiah",
            last_result: "/book/7",
            page: 3,
            page_size: 20,
            host: "https://site.example",
        }
    }

    #[test]
    fn test_expand_variables() {
        let expanded = expand_variables("/s?q=$keyword&p=$page&n=$pageSize", &vars());
        assert_eq!(expanded, "/s?q=dune%20messiah&p=3&n=20");

        let aliases = expand_variables("$host/s?q=searchKey&p=searchPage", &vars());
        assert_eq!(aliases, "https://site.example/s?q=dune%20messiah&p=3");

        assert_eq!(expand_variables("$result/next", &vars()), "/book/7/next");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let vars = TemplateVars {
            keyword: "searchPage",
            last_result: "/book/$page",
            ..vars()
        };
        assert_eq!(expand_variables("/s?q=$keyword", &vars), "/s?q=searchPage");
        assert_eq!(expand_variables("$result/next", &vars), "/book/$page/next");
        assert_eq!(expand_variables("$pageSize-$page", &vars), "20-3");
    }

    #[test]
    fn test_parse_plain_url() {
        let params = parse_request(" /list?p=1 ", "https://site.example").unwrap();
        assert_eq!(params.url, "https://site.example/list?p=1");
        assert_eq!(params.method, "GET");
        assert!(params.body.is_none());
    }

    #[test]
    fn test_parse_request_object() {
        let params = parse_request(
            r#"{"url": "/api", "method": "post", "body": {"q": "x"}, "headers": {"X-Page": 2}}"#,
            "https://site.example",
        )
        .unwrap();

        assert_eq!(params.url, "https://site.example/api");
        assert_eq!(params.method, "POST");
        assert_eq!(params.body.as_deref(), Some(r#"{"q":"x"}"#));
        assert_eq!(params.headers.get("X-Page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_parse_malformed_object() {
        let err = parse_request("{not json", "https://site.example").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[test]
    fn test_inline_directive_pattern() {
        let found: Vec<_> = INLINE_DIRECTIVE
            .captures_iter("/a/{{page}}/{{ keyword }}")
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(found, vec!["page", " keyword "]);
    }
}
