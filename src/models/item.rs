//! Search and chapter records.

use serde::{Deserialize, Serialize};

/// One row of a search result page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub name: String,
    pub cover: String,
    pub author: String,
    pub chapter: String,
    pub description: String,
    pub url: String,
}

/// One entry of a chapter list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterItem {
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl ChapterItem {
    /// Path handed back to content resolution for this chapter.
    pub fn chapter_path(&self) -> &str {
        &self.url
    }
}
