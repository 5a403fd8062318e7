//! Content results at the service boundary.

use serde::{Deserialize, Serialize};

use crate::rules::ContentType;

/// Extracted chapter content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Media URL for video rules.
    Video(String),
    /// Lines or image URLs for everything else.
    Text(Vec<String>),
}

impl Content {
    /// Shape raw engine output for a content type.
    ///
    /// Returns None when there is nothing to show.
    pub fn from_items(content_type: ContentType, items: Vec<String>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        match content_type {
            ContentType::Video => items.into_iter().next().map(Content::Video),
            _ => Some(Content::Text(items)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResult {
    pub content_type: ContentType,
    pub content: Content,
}
