//! Default selector over HTML and JSON documents.
//!
//! Expression forms:
//! - `@json:path` selects from a JSON document (see [`extract_path`]).
//! - `@js:script` evaluates a script with `result` bound to the document.
//! - `[@css:]selector[@attr]` selects from HTML. `attr` is `text`, `html`
//!   (inner), `outerHtml` or any attribute name. An empty selector before
//!   `@attr` addresses the document's top-level elements.
//!
//! Row documents returned by `get_elements` are the outer HTML of each
//! match (or the JSON text of each array item), so they can be selected
//! from again.

mod json;

pub use json::extract_path;

use std::sync::Arc;

use async_trait::async_trait;
use scraper::{ElementRef, Html};
use serde_json::Value;
use url::Url;

use crate::engine::{ExecutionContext, ScriptEvaluator, Selector};
use crate::error::{EngineError, Result};
use crate::rules::{value_to_text, SCRIPT_PREFIX};

const JSON_PREFIX: &str = "@json:";
const CSS_PREFIX: &str = "@css:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attr<'a> {
    Text,
    InnerHtml,
    OuterHtml,
    Named(&'a str),
}

impl<'a> Attr<'a> {
    fn parse(name: &'a str) -> Self {
        match name {
            "text" => Attr::Text,
            "html" => Attr::InnerHtml,
            "outerHtml" => Attr::OuterHtml,
            other => Attr::Named(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expr<'a> {
    Empty,
    Script(&'a str),
    Json(&'a str),
    Css {
        selector: &'a str,
        attr: Option<Attr<'a>>,
    },
}

fn parse_expr(expr: &str) -> Expr<'_> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Expr::Empty;
    }
    if let Some(script) = expr.strip_prefix(SCRIPT_PREFIX) {
        return Expr::Script(script);
    }
    if let Some(path) = expr.strip_prefix(JSON_PREFIX) {
        return Expr::Json(path);
    }

    let css = expr.strip_prefix(CSS_PREFIX).unwrap_or(expr);
    match css.rsplit_once('@') {
        Some((selector, attr)) if is_attr_name(attr.trim()) => Expr::Css {
            selector: selector.trim(),
            attr: Some(Attr::parse(attr.trim())),
        },
        _ => Expr::Css {
            selector: css,
            attr: None,
        },
    }
}

/// Whether an `@` tail names an attribute rather than continuing the
/// selector, as in `a[href^='mailto:x@y']`.
fn is_attr_name(tail: &str) -> bool {
    !tail.is_empty()
        && tail
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
}

fn element_value(element: ElementRef<'_>, attr: Attr<'_>) -> Option<String> {
    match attr {
        Attr::Text => Some(element.text().collect()),
        Attr::InnerHtml => Some(element.inner_html()),
        Attr::OuterHtml => Some(element.html()),
        Attr::Named(name) => element.value().attr(name).map(str::to_string),
    }
}

fn select_css(selector: &str, attr: Attr<'_>, doc: &str) -> Result<Vec<String>> {
    let selector = if selector.is_empty() {
        "body > *"
    } else {
        selector
    };
    let parsed = scraper::Selector::parse(selector)
        .map_err(|e| EngineError::Selector(format!("{}: {:?}", selector, e)))?;

    let document = Html::parse_document(doc);
    Ok(document
        .select(&parsed)
        .filter_map(|element| element_value(element, attr))
        .collect())
}

fn select_json(path: &str, doc: &str) -> Result<Vec<String>> {
    let data: Value = serde_json::from_str(doc)
        .map_err(|e| EngineError::Selector(format!("document is not JSON: {}", e)))?;

    Ok(values_to_texts(extract_path(&data, path).clone()))
}

fn values_to_texts(value: Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(value_to_text).collect(),
        other => vec![value_to_text(other)],
    }
}

/// Resolve a possibly relative URL against `host`.
pub fn resolve_url(host: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    match Url::parse(host).and_then(|base| base.join(path)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", host, path),
    }
}

/// Selector backed by `scraper` for HTML and `serde_json` for JSON.
#[derive(Clone, Default)]
pub struct HtmlSelector {
    scripts: Option<Arc<dyn ScriptEvaluator>>,
}

impl HtmlSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable `@js:` expressions.
    pub fn with_scripts(mut self, scripts: Arc<dyn ScriptEvaluator>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    async fn select(
        &self,
        expr: &str,
        doc: &str,
        ctx: &ExecutionContext,
        default_attr: Attr<'_>,
    ) -> Result<Vec<String>> {
        match parse_expr(expr) {
            Expr::Empty => Ok(Vec::new()),
            Expr::Script(script) => {
                let scripts = self.scripts.as_ref().ok_or(EngineError::ScriptUnavailable)?;
                let ctx = ctx.clone().with_result(doc);
                let value = scripts.evaluate(script, &ctx).await?;
                Ok(values_to_texts(value))
            }
            Expr::Json(path) => select_json(path, doc),
            Expr::Css { selector, attr } => {
                select_css(selector, attr.unwrap_or(default_attr), doc)
            }
        }
    }
}

#[async_trait]
impl Selector for HtmlSelector {
    async fn get_string(&self, expr: &str, doc: &str, ctx: &ExecutionContext) -> Result<String> {
        let values = self.select(expr, doc, ctx, Attr::Text).await?;
        Ok(values.into_iter().next().unwrap_or_default())
    }

    async fn get_string_list(
        &self,
        expr: &str,
        doc: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<String>> {
        self.select(expr, doc, ctx, Attr::Text).await
    }

    async fn get_elements(
        &self,
        expr: &str,
        doc: &str,
        ctx: &ExecutionContext,
    ) -> Result<Vec<String>> {
        self.select(expr, doc, ctx, Attr::OuterHtml).await
    }

    async fn get_url(
        &self,
        expr: &str,
        host: &str,
        doc: &str,
        ctx: &ExecutionContext,
    ) -> Result<String> {
        let raw = self.get_string(expr, doc, ctx).await?;
        Ok(resolve_url(host, raw.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <ul id="results">
            <li class="book"><a href="/book/1">  Dune </a><span class="author">Herbert</span></li>
            <li class="book"><a href="/book/2">Emma</a><span class="author">Austen</span></li>
          </ul>
          <a class="next" href="https://site.example/list?p=2">next</a>
        </body></html>
    "#;

    fn ctx() -> ExecutionContext {
        ExecutionContext::default()
    }

    #[test]
    fn test_parse_expr_forms() {
        assert_eq!(parse_expr("  "), Expr::Empty);
        assert_eq!(parse_expr("@js:result"), Expr::Script("result"));
        assert_eq!(parse_expr("@json:$.data"), Expr::Json("$.data"));
        assert_eq!(
            parse_expr("@css:a.next@href"),
            Expr::Css {
                selector: "a.next",
                attr: Some(Attr::Named("href"))
            }
        );
        assert_eq!(
            parse_expr("li.book"),
            Expr::Css {
                selector: "li.book",
                attr: None
            }
        );
        assert_eq!(
            parse_expr("@text"),
            Expr::Css {
                selector: "",
                attr: Some(Attr::Text)
            }
        );
    }

    #[test]
    fn test_at_inside_attribute_value_is_selector() {
        assert_eq!(
            parse_expr("a[href^='mailto:x@y']"),
            Expr::Css {
                selector: "a[href^='mailto:x@y']",
                attr: None
            }
        );
        assert_eq!(
            parse_expr("a[href^='mailto:x@y']@href"),
            Expr::Css {
                selector: "a[href^='mailto:x@y']",
                attr: Some(Attr::Named("href"))
            }
        );
    }

    #[tokio::test]
    async fn test_mailto_selector_matches() {
        let doc = r#"<a href="mailto:x@y.example">mail</a><a href="/other">other</a>"#;
        let text = HtmlSelector::new()
            .get_string("a[href^='mailto:x@y']", doc, &ctx())
            .await
            .unwrap();
        assert_eq!(text, "mail");
    }

    #[tokio::test]
    async fn test_elements_then_fields() {
        let selector = HtmlSelector::new();
        let rows = selector.get_elements("li.book", PAGE, &ctx()).await.unwrap();
        assert_eq!(rows.len(), 2);

        let name = selector.get_string("a@text", &rows[0], &ctx()).await.unwrap();
        assert_eq!(name, "  Dune ");
        let author = selector.get_string("span.author", &rows[1], &ctx()).await.unwrap();
        assert_eq!(author, "Austen");
    }

    #[tokio::test]
    async fn test_get_url_resolves_against_host() {
        let selector = HtmlSelector::new();
        let rows = selector.get_elements("li.book", PAGE, &ctx()).await.unwrap();

        let url = selector
            .get_url("a@href", "https://site.example", &rows[1], &ctx())
            .await
            .unwrap();
        assert_eq!(url, "https://site.example/book/2");

        let next = selector
            .get_url("a.next@href", "https://other.example", PAGE, &ctx())
            .await
            .unwrap();
        assert_eq!(next, "https://site.example/list?p=2");
    }

    #[tokio::test]
    async fn test_string_list_and_missing() {
        let selector = HtmlSelector::new();
        let authors = selector
            .get_string_list("span.author", PAGE, &ctx())
            .await
            .unwrap();
        assert_eq!(authors, vec!["Herbert", "Austen"]);

        let missing = selector.get_string("div.nothing", PAGE, &ctx()).await.unwrap();
        assert_eq!(missing, "");
        let empty = selector.get_string("", PAGE, &ctx()).await.unwrap();
        assert_eq!(empty, "");
    }

    #[tokio::test]
    async fn test_top_level_attribute() {
        let selector = HtmlSelector::new();
        let href = selector
            .get_string("@href", r#"<a href="/c/9">Nine</a>"#, &ctx())
            .await
            .unwrap();
        assert_eq!(href, "/c/9");
    }

    #[tokio::test]
    async fn test_json_selection() {
        let selector = HtmlSelector::new();
        let doc = r#"{"data": {"list": [{"name": "Dune", "id": 1}, {"name": "Emma", "id": 2}]}}"#;

        let rows = selector
            .get_elements("@json:$.data.list", doc, &ctx())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);

        let name = selector.get_string("@json:name", &rows[1], &ctx()).await.unwrap();
        assert_eq!(name, "Emma");
        let id = selector.get_string("@json:id", &rows[0], &ctx()).await.unwrap();
        assert_eq!(id, "1");
    }

    #[tokio::test]
    async fn test_json_on_html_is_error() {
        let selector = HtmlSelector::new();
        let err = selector.get_string("@json:a", PAGE, &ctx()).await.unwrap_err();
        assert!(matches!(err, EngineError::Selector(_)));
    }

    #[tokio::test]
    async fn test_script_without_evaluator() {
        let selector = HtmlSelector::new();
        let err = selector.get_string("@js:result", PAGE, &ctx()).await.unwrap_err();
        assert!(matches!(err, EngineError::ScriptUnavailable));
    }

    #[tokio::test]
    async fn test_invalid_css_is_error() {
        let selector = HtmlSelector::new();
        let err = selector.get_string("li[[", PAGE, &ctx()).await.unwrap_err();
        assert!(matches!(err, EngineError::Selector(_)));
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(resolve_url("https://a.example/x/", "y"), "https://a.example/x/y");
        assert_eq!(resolve_url("https://a.example", "/y"), "https://a.example/y");
        assert_eq!(resolve_url("https://a.example", "http://b/z"), "http://b/z");
        assert_eq!(resolve_url("not a url", "/y"), "not a url/y");
        assert_eq!(resolve_url("https://a.example", ""), "");
    }
}
