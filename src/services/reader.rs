//! Rule-backed reading service.
//!
//! Looks rules up by id and runs one engine operation per call. Separated
//! from UI concerns so the CLI or an embedding application can share it.

use tracing::debug;

use crate::engine::{Capabilities, ContinuationCache, EngineOptions, RuleEngine};
use crate::error::{EngineError, Result};
use crate::models::{ChapterItem, Content, ContentResult, DiscoverItem, DiscoverList, SearchItem};
use crate::rules::{Rule, RuleStore};

/// Service for resolving works, chapters and content through rules.
#[derive(Clone)]
pub struct RuleService {
    rules: RuleStore,
    caps: Capabilities,
    options: EngineOptions,
}

impl RuleService {
    pub fn new(rules: RuleStore, caps: Capabilities) -> Self {
        Self {
            rules,
            caps,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    fn engine(&self, rule: &Rule) -> RuleEngine {
        RuleEngine::new(rule.clone(), self.caps.clone()).with_options(self.options)
    }

    fn engine_for(&self, rule_id: &str) -> Result<RuleEngine> {
        let rule = self.rules.get(rule_id)?;
        debug!("Using rule {} ({})", rule.id, rule.name);
        Ok(self.engine(rule))
    }

    pub async fn search(&self, rule_id: &str, keyword: &str) -> Result<Vec<SearchItem>> {
        self.engine_for(rule_id)?.search(keyword).await
    }

    pub async fn search_by_rule(&self, rule: &Rule, keyword: &str) -> Result<Vec<SearchItem>> {
        self.engine(rule).search(keyword).await
    }

    /// Chapters of the work at `path` (a search item's url).
    pub async fn chapters(&self, rule_id: &str, path: &str) -> Result<Vec<ChapterItem>> {
        self.engine_for(rule_id)?.chapters(path).await
    }

    pub async fn chapters_by_rule(&self, rule: &Rule, path: &str) -> Result<Vec<ChapterItem>> {
        self.engine(rule).chapters(path).await
    }

    /// Content of the chapter at `chapter_path`.
    ///
    /// Fails with [`EngineError::ContentEmpty`] when nothing was extracted.
    pub async fn content(&self, rule_id: &str, chapter_path: &str) -> Result<ContentResult> {
        let engine = self.engine_for(rule_id)?;
        Self::shape_content(&engine, chapter_path).await
    }

    pub async fn content_by_rule(&self, rule: &Rule, chapter_path: &str) -> Result<ContentResult> {
        Self::shape_content(&self.engine(rule), chapter_path).await
    }

    async fn shape_content(engine: &RuleEngine, chapter_path: &str) -> Result<ContentResult> {
        let content_type = engine.rule().content_type;
        let items = engine.content(chapter_path).await?;
        let content =
            Content::from_items(content_type, items).ok_or(EngineError::ContentEmpty)?;

        Ok(ContentResult {
            content_type,
            content,
        })
    }

    pub async fn discover_map(&self, rule_id: &str) -> Result<Vec<DiscoverList>> {
        self.engine_for(rule_id)?.discover_map().await
    }

    pub async fn discover_map_by_rule(&self, rule: &Rule) -> Result<Vec<DiscoverList>> {
        self.engine(rule).discover_map().await
    }

    /// One page of the discover listing `value` (a discover pair's value).
    pub async fn discover(
        &self,
        rule_id: &str,
        value: &str,
        page: u32,
        cache: &mut ContinuationCache,
    ) -> Result<Vec<DiscoverItem>> {
        self.engine_for(rule_id)?
            .discover_page(value, page, cache)
            .await
    }

    pub async fn discover_by_rule(
        &self,
        rule: &Rule,
        value: &str,
        page: u32,
        cache: &mut ContinuationCache,
    ) -> Result<Vec<DiscoverItem>> {
        self.engine(rule).discover_page(value, page, cache).await
    }
}
