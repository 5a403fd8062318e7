//! Result records produced by rule resolution.

mod content;
mod discover;
mod item;

pub use content::{Content, ContentResult};
pub use discover::{parse_tags, Discover, DiscoverItem, DiscoverList, DiscoverMapBuilder};
pub use item::{ChapterItem, SearchItem};
