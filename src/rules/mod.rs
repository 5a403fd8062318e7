//! Site rule definitions.
//!
//! A rule is the declarative per-site configuration the engine resolves:
//! URL templates for each operation plus the extraction expressions used to
//! pull rows and fields out of fetched documents. Rules are read-only input
//! to the engine.

mod store;
mod value;

pub use store::RuleStore;
pub use value::{RuleValue, SCRIPT_PREFIX};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chapter URL value marking a source without chapter structure.
///
/// When a rule's `chapterUrl` equals this token, the whole work is treated
/// as a single chapter and no chapter page is fetched.
pub const SINGLE_CHAPTER: &str = "正文";

/// Kind of content a rule produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ContentType {
    Manga,
    #[default]
    Novel,
    Video,
    Audio,
    Rss,
    NovelMore,
}

impl ContentType {
    /// Numeric code used in rule files.
    pub fn code(self) -> u8 {
        match self {
            ContentType::Manga => 0,
            ContentType::Novel => 1,
            ContentType::Video => 2,
            ContentType::Audio => 3,
            ContentType::Rss => 4,
            ContentType::NovelMore => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Manga => "manga",
            ContentType::Novel => "novel",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
            ContentType::Rss => "rss",
            ContentType::NovelMore => "novel_more",
        }
    }
}

impl TryFrom<u8> for ContentType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ContentType::Manga),
            1 => Ok(ContentType::Novel),
            2 => Ok(ContentType::Video),
            3 => Ok(ContentType::Audio),
            4 => Ok(ContentType::Rss),
            5 => Ok(ContentType::NovelMore),
            other => Err(format!("unknown content type code {}", other)),
        }
    }
}

impl From<ContentType> for u8 {
    fn from(content_type: ContentType) -> Self {
        content_type.code()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The discover URL field as it appears in a rule file.
///
/// Rule files carry either a clause string (possibly a script directive),
/// an array of clause strings, or nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum DiscoverSource {
    #[default]
    None,
    Single(String),
    Many(Vec<String>),
}

impl From<serde_json::Value> for DiscoverSource {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DiscoverSource::None,
            serde_json::Value::String(s) => DiscoverSource::Single(s),
            serde_json::Value::Array(items) => {
                DiscoverSource::Many(items.into_iter().map(value_to_text).collect())
            }
            other => DiscoverSource::Single(other.to_string()),
        }
    }
}

impl From<DiscoverSource> for serde_json::Value {
    fn from(source: DiscoverSource) -> Self {
        match source {
            DiscoverSource::None => serde_json::Value::Null,
            DiscoverSource::Single(s) => serde_json::Value::String(s),
            DiscoverSource::Many(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::String).collect())
            }
        }
    }
}

/// Stringify a JSON value the way scripts expect: strings verbatim,
/// null as empty, everything else as its JSON text.
pub fn value_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Per-site extraction rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub host: String,
    pub content_type: ContentType,
    pub sort: i64,
    pub cookies: String,
    pub user_agent: String,
    pub load_js: String,

    pub enable_discover: bool,
    pub discover_url: DiscoverSource,
    pub discover_next_url: String,
    pub discover_list: String,
    pub discover_tags: String,
    pub discover_name: String,
    pub discover_cover: String,
    pub discover_author: String,
    pub discover_chapter: String,
    pub discover_description: String,
    pub discover_result: String,

    pub enable_search: bool,
    pub search_url: String,
    pub search_list: String,
    pub search_name: String,
    pub search_cover: String,
    pub search_author: String,
    pub search_chapter: String,
    pub search_description: String,
    pub search_result: String,

    pub chapter_url: String,
    pub chapter_list: String,
    pub chapter_name: String,
    pub chapter_cover: String,
    pub chapter_time: String,
    pub chapter_result: String,
    pub enable_multi_roads: bool,
    pub chapter_roads: String,

    pub content_url: String,
    pub content_items: String,
    pub content_next_url: String,
}

impl Rule {
    /// Whether chapters resolve to the work itself.
    pub fn is_single_chapter(&self) -> bool {
        self.chapter_url == SINGLE_CHAPTER
    }

    pub fn has_content_next_url(&self) -> bool {
        !self.content_next_url.is_empty()
    }

    pub fn has_discover_next_url(&self) -> bool {
        !self.discover_next_url.is_empty()
    }

    /// Whether the host looks like an absolute URL.
    pub fn host_is_url(&self) -> bool {
        self.host.starts_with("http")
    }
}
