//! Keyword search.

use tracing::info;

use super::RuleEngine;
use crate::error::Result;
use crate::models::SearchItem;

impl RuleEngine {
    /// Search the site for `keyword`.
    ///
    /// Rows come back in extraction order; no rows is an empty result.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchItem>> {
        let rule = &self.rule;
        let selector = &self.caps.selector;

        let ctx = self.context().with_keyword(keyword);
        let response = self.fetch(&rule.search_url, keyword, "", &ctx).await?;
        let rows = self.get_list(&response.body, &rule.search_list, &ctx).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(SearchItem {
                cover: selector.get_string(&rule.search_cover, row, &ctx).await?,
                name: selector
                    .get_string(&rule.search_name, row, &ctx)
                    .await?
                    .trim()
                    .to_string(),
                author: selector.get_string(&rule.search_author, row, &ctx).await?,
                chapter: selector.get_string(&rule.search_chapter, row, &ctx).await?,
                description: selector
                    .get_string(&rule.search_description, row, &ctx)
                    .await?,
                url: selector
                    .get_url(&rule.search_result, &rule.host, row, &ctx)
                    .await?,
            });
        }

        info!("Search {:?} on {} found {} items", keyword, rule.id, items.len());
        Ok(items)
    }
}
