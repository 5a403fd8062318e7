//! Discover tabs and listing rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named (label, value) pair inside a discover tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discover {
    pub name: String,
    pub value: String,
}

/// A discover tab and its categories, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverList {
    pub name: String,
    pub pairs: Vec<Discover>,
}

/// Groups discover pairs by tab name, preserving first-seen tab order.
#[derive(Debug, Default)]
pub struct DiscoverMapBuilder {
    lists: Vec<DiscoverList>,
    index: HashMap<String, usize>,
}

impl DiscoverMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair to `tab`, creating the tab on first sight.
    pub fn push(&mut self, tab: &str, class_name: &str, value: &str) {
        let pair = Discover {
            name: class_name.to_string(),
            value: value.to_string(),
        };

        match self.index.get(tab) {
            Some(&idx) => self.lists[idx].pairs.push(pair),
            None => {
                self.index.insert(tab.to_string(), self.lists.len());
                self.lists.push(DiscoverList {
                    name: tab.to_string(),
                    pairs: vec![pair],
                });
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn build(self) -> Vec<DiscoverList> {
        self.lists
    }
}

/// One row of a discover listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverItem {
    pub name: String,
    pub cover: String,
    pub author: String,
    pub chapter: String,
    pub description: String,
    pub url: String,
    pub tags: Vec<String>,
}

/// Split a tag string on whitespace, dropping empty tokens.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_tab_appends() {
        let mut builder = DiscoverMapBuilder::new();
        builder.push("Fiction", "Romance", "http://a");
        builder.push("Comics", "all", "http://c");
        builder.push("Fiction", "SciFi", "http://b");

        let lists = builder.build();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].name, "Fiction");
        let names: Vec<_> = lists[0].pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Romance", "SciFi"]);
        assert_eq!(lists[1].name, "Comics");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("  romance  scifi "), vec!["romance", "scifi"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags("   ").is_empty());
    }
}
