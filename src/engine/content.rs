//! Paginated content resolution.

use tracing::{debug, info, warn};

use super::context::ExecutionContext;
use super::pagination::{PageState, PageStrategy, Paginator};
use super::RuleEngine;
use crate::error::Result;
use crate::rules::ContentType;

/// What one content page contributed.
struct ContentPage {
    ctx: ExecutionContext,
    items: Vec<String>,
    next_url: Option<String>,
}

/// Flatten fragments to trimmed, non-empty lines.
///
/// `["1\n\n2", "3"]` becomes `["1", "2", "3"]`.
pub fn normalize_lines(items: Vec<String>) -> Vec<String> {
    items
        .join("\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl RuleEngine {
    /// Accumulate the content of the chapter at `last_result` across pages.
    ///
    /// A failing page ends pagination without failing the call: whatever
    /// earlier pages produced is returned.
    pub async fn content(&self, last_result: &str) -> Result<Vec<String>> {
        let rule = &self.rule;
        let template = if rule.content_url.is_empty() {
            last_result
        } else {
            rule.content_url.as_str()
        };

        let strategy = PageStrategy::detect(rule.has_content_next_url(), template);
        let paginator = Paginator::new(strategy, template)
            .with_max_pages(self.options.max_content_pages);
        debug!("Content pagination for {} uses {:?}", last_result, strategy);

        let mut ctx = self.context().with_result(last_result);
        let mut items = Vec::new();
        let mut state = paginator.start();

        while let PageState::Fetching { page, url } = state {
            let page_ctx = ctx.clone().with_page(page);
            state = match self.content_page(&url, last_result, page_ctx).await {
                Ok(mut fetched) => {
                    items.append(&mut fetched.items);
                    ctx = fetched.ctx;
                    paginator.advance(page, fetched.next_url.as_deref())
                }
                Err(e) => {
                    warn!("Content page {} ({}) failed: {}", page, url, e);
                    paginator.fail(page)
                }
            };
        }

        info!(
            "Resolved {} content items for {} ({:?})",
            items.len(),
            last_result,
            state
        );
        Ok(items)
    }

    async fn content_page(
        &self,
        url: &str,
        last_result: &str,
        ctx: ExecutionContext,
    ) -> Result<ContentPage> {
        let rule = &self.rule;
        let selector = &self.caps.selector;

        let response = self.fetch(url, "", last_result, &ctx).await?;
        let ctx = ctx
            .with_last_result(last_result)
            .with_result(&response.body)
            .with_base_url(&response.params.url);

        let next_url = if rule.has_content_next_url() {
            Some(
                selector
                    .get_string(&rule.content_next_url, &response.body, &ctx)
                    .await?,
            )
        } else {
            None
        };

        let mut items = self
            .get_string_list(&response.body, &rule.content_items, &ctx)
            .await?;
        if rule.content_type == ContentType::Novel {
            items = normalize_lines(items);
        }

        Ok(ContentPage {
            ctx,
            items,
            next_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lines() {
        let items = vec!["1\n\n2".to_string(), "3".to_string()];
        assert_eq!(normalize_lines(items), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_normalize_lines_trims_and_drops_blanks() {
        let items = vec!["  a  \n \n".to_string(), String::new(), "\tb".to_string()];
        assert_eq!(normalize_lines(items), vec!["a", "b"]);
    }
}
