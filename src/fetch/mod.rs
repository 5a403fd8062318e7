//! HTTP fetcher for rule URL templates.

mod template;

pub use template::{expand_variables, parse_request, TemplateVars};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{COOKIE, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Method};
use tracing::debug;

use crate::engine::{
    ExecutionContext, FetchRequest, FetchResponse, Fetcher, RequestParams, ScriptEvaluator,
};
use crate::error::{EngineError, Result};
use crate::rules::value_to_text;
use template::INLINE_DIRECTIVE;

pub const USER_AGENT: &str = concat!("rulecrawl/", env!("CARGO_PKG_VERSION"));

/// Real browser user agents for impersonate mode.
const IMPERSONATE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Mobile Safari/537.36",
];

/// Resolve the configured user agent.
/// - None => crate user agent
/// - "impersonate" => a real browser user agent
/// - other => used verbatim
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config {
        None => USER_AGENT.to_string(),
        Some("impersonate") => {
            let nanos = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.subsec_nanos() as usize)
                .unwrap_or(0);
            IMPERSONATE_USER_AGENTS[nanos % IMPERSONATE_USER_AGENTS.len()].to_string()
        }
        Some(custom) => custom.to_string(),
    }
}

/// `Fetcher` backed by `reqwest`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    scripts: Arc<dyn ScriptEvaluator>,
}

impl HttpFetcher {
    pub fn new(
        timeout: Duration,
        user_agent: Option<&str>,
        scripts: Arc<dyn ScriptEvaluator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(resolve_user_agent(user_agent))
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| EngineError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, scripts })
    }

    /// Replace each `{{ expr }}` with its value.
    ///
    /// Bare context keys resolve directly; anything else goes to the
    /// script evaluator.
    async fn expand_directives(&self, template: &str, ctx: &ExecutionContext) -> Result<String> {
        let directives: Vec<(usize, usize, String)> = INLINE_DIRECTIVE
            .captures_iter(template)
            .filter_map(|c| {
                let whole = c.get(0)?;
                let expr = c.get(1)?;
                Some((whole.start(), whole.end(), expr.as_str().trim().to_string()))
            })
            .collect();

        let mut expanded = String::with_capacity(template.len());
        let mut last = 0;
        for (start, end, expr) in directives {
            expanded.push_str(&template[last..start]);
            let value = match ctx.get(&expr) {
                Some(value) => value_to_text(value.clone()),
                None => value_to_text(self.scripts.evaluate(&expr, ctx).await?),
            };
            expanded.push_str(&value);
            last = end;
        }

        expanded.push_str(&template[last..]);
        Ok(expanded)
    }

    /// Expand a template into the request that will be sent.
    pub async fn prepare(
        &self,
        request: FetchRequest<'_>,
        ctx: &ExecutionContext,
    ) -> Result<RequestParams> {
        let rule = request.rule;
        let expanded = self.expand_directives(request.url, ctx).await?;
        let expanded = expand_variables(
            &expanded,
            &TemplateVars {
                keyword: request.keyword,
                last_result: request.last_result,
                page: ctx.page(),
                page_size: ctx.page_size(),
                host: &rule.host,
            },
        );

        let mut params = parse_request(&expanded, &rule.host)?;
        if !rule.cookies.is_empty() && !has_header(&params, COOKIE.as_str()) {
            params
                .headers
                .insert(COOKIE.as_str().to_string(), rule.cookies.clone());
        }
        if !rule.user_agent.is_empty() && !has_header(&params, USER_AGENT_HEADER.as_str()) {
            params
                .headers
                .insert(USER_AGENT_HEADER.as_str().to_string(), rule.user_agent.clone());
        }
        Ok(params)
    }
}

fn has_header(params: &RequestParams, name: &str) -> bool {
    params.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        request: FetchRequest<'_>,
        ctx: &ExecutionContext,
    ) -> Result<FetchResponse> {
        let params = self.prepare(request, ctx).await?;

        let method = Method::from_bytes(params.method.as_bytes())
            .map_err(|_| EngineError::InvalidRequest(format!("method {}", params.method)))?;
        let mut builder = self.client.request(method, &params.url);
        for (name, value) in &params.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &params.body {
            builder = builder.body(body.clone());
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|source| EngineError::Request {
            url: params.url.clone(),
            source,
        })?;

        let status = response.status();
        debug!(
            "{} {} -> {} in {:?}",
            params.method,
            params.url,
            status.as_u16(),
            start.elapsed()
        );
        if !status.is_success() {
            return Err(EngineError::Status {
                url: params.url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| EngineError::Request {
            url: params.url.clone(),
            source,
        })?;

        Ok(FetchResponse { body, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NoScripts;
    use crate::rules::Rule;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5), None, Arc::new(NoScripts)).unwrap()
    }

    fn rule() -> Rule {
        Rule {
            host: "https://site.example".into(),
            cookies: "sid=abc".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_user_agent() {
        assert!(resolve_user_agent(None).starts_with("rulecrawl/"));
        assert!(resolve_user_agent(Some("impersonate")).contains("Mozilla"));
        assert_eq!(resolve_user_agent(Some("MyBot/1.0")), "MyBot/1.0");
    }

    #[tokio::test]
    async fn test_prepare_expands_context_directives() {
        let rule = rule();
        let ctx = ExecutionContext::seed(&rule, 20).with_page(4);
        let request = FetchRequest {
            url: "/list/{{page}}?q=$keyword",
            keyword: "a b",
            last_result: "",
            rule: &rule,
        };

        let params = fetcher().prepare(request, &ctx).await.unwrap();
        assert_eq!(params.url, "https://site.example/list/4?q=a%20b");
        assert_eq!(params.method, "GET");
        assert_eq!(params.headers.get("cookie").map(String::as_str), Some("sid=abc"));
    }

    #[tokio::test]
    async fn test_prepare_page_variable_follows_context() {
        let rule = rule();
        let ctx = ExecutionContext::seed(&rule, 20).with_page(2);
        let request = FetchRequest {
            url: "https://site.example/c/1?p=$page",
            keyword: "",
            last_result: "",
            rule: &rule,
        };

        let params = fetcher().prepare(request, &ctx).await.unwrap();
        assert_eq!(params.url, "https://site.example/c/1?p=2");
    }

    #[tokio::test]
    async fn test_prepare_script_directive_without_evaluator() {
        let rule = rule();
        let ctx = ExecutionContext::seed(&rule, 20);
        let request = FetchRequest {
            url: "/list/{{page + 1}}",
            keyword: "",
            last_result: "",
            rule: &rule,
        };

        let err = fetcher().prepare(request, &ctx).await.unwrap_err();
        assert!(matches!(err, EngineError::ScriptUnavailable));
    }

    #[tokio::test]
    async fn test_explicit_cookie_header_wins() {
        let rule = rule();
        let ctx = ExecutionContext::seed(&rule, 20);
        let request = FetchRequest {
            url: r#"{"url": "/api", "headers": {"Cookie": "sid=override"}}"#,
            keyword: "",
            last_result: "",
            rule: &rule,
        };

        let params = fetcher().prepare(request, &ctx).await.unwrap();
        assert_eq!(params.headers.len(), 1);
        assert_eq!(params.headers.get("Cookie").map(String::as_str), Some("sid=override"));
    }
}
