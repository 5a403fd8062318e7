//! Chapter list resolution.

use tracing::{debug, info, warn};

use super::RuleEngine;
use crate::error::Result;
use crate::models::ChapterItem;
use crate::rules::SINGLE_CHAPTER;

impl RuleEngine {
    /// Resolve the chapter list of the work at `result`.
    pub async fn chapters(&self, result: &str) -> Result<Vec<ChapterItem>> {
        let rule = &self.rule;
        let selector = &self.caps.selector;

        if rule.is_single_chapter() {
            return Ok(vec![ChapterItem {
                url: result.to_string(),
                name: SINGLE_CHAPTER.to_string(),
                ..Default::default()
            }]);
        }

        let ctx = self.context().with_result(result);
        let template = if rule.chapter_url.is_empty() {
            result
        } else {
            rule.chapter_url.as_str()
        };
        let response = self.fetch(template, "", result, &ctx).await?;
        debug!("Chapter request: {:?}", response.params);

        let ctx = ctx
            .with_page(1)
            .with_last_result(result)
            .with_result(&response.body)
            .with_base_url(&response.params.url);

        let rows = if rule.enable_multi_roads {
            // Only the first road is resolved; merging every road is not supported.
            let roads = selector
                .get_elements(&rule.chapter_roads, &response.body, &ctx)
                .await?;
            debug!("Found {} chapter roads", roads.len());
            match roads.first() {
                Some(road) => self.get_list(road, &rule.chapter_list, &ctx).await?,
                None => {
                    warn!("No chapter roads matched for {}", result);
                    Vec::new()
                }
            }
        } else {
            self.get_list(&response.body, &rule.chapter_list, &ctx).await?
        };

        let mut chapters = Vec::with_capacity(rows.len());
        for row in &rows {
            let cover = selector.get_string(&rule.chapter_cover, row, &ctx).await?;
            let name = selector.get_string(&rule.chapter_name, row, &ctx).await?;
            let time = selector.get_string(&rule.chapter_time, row, &ctx).await?;
            let url = selector
                .get_url(&rule.chapter_result, &rule.host, row, &ctx)
                .await?;

            chapters.push(ChapterItem {
                url,
                name: name.trim().to_string(),
                cover: Some(cover),
                content_url: None,
                time: Some(time),
            });
        }

        info!("Resolved {} chapters for {}", chapters.len(), result);
        Ok(chapters)
    }
}
