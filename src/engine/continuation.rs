//! Next-page URLs for discover listings being browsed.

use std::collections::HashMap;

/// Maps a discover origin URL to the next-page URL its last fetch yielded.
///
/// Owned by the browsing session and passed into each discover-page call.
/// Entries are never expired by time; they are overwritten on every page
/// fetch and dropped when the rule declares no next-page expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuationCache {
    next: HashMap<String, String>,
}

impl ContinuationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next-page URL for `origin`, if a non-empty one is known.
    pub fn next_url(&self, origin: &str) -> Option<&str> {
        self.next
            .get(origin)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn store(&mut self, origin: &str, next_url: String) {
        self.next.insert(origin.to_string(), next_url);
    }

    pub fn forget(&mut self, origin: &str) {
        self.next.remove(origin);
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_overwrites() {
        let mut cache = ContinuationCache::new();
        cache.store("http://o", "http://o?2".into());
        cache.store("http://o", "http://o?3".into());

        assert_eq!(cache.next_url("http://o"), Some("http://o?3"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_next_is_absent() {
        let mut cache = ContinuationCache::new();
        cache.store("http://o", String::new());
        assert_eq!(cache.next_url("http://o"), None);
    }

    #[test]
    fn test_forget() {
        let mut cache = ContinuationCache::new();
        cache.store("http://a", "http://a?2".into());
        cache.store("http://b", "http://b?2".into());
        cache.forget("http://a");

        assert_eq!(cache.next_url("http://a"), None);
        assert_eq!(cache.next_url("http://b"), Some("http://b?2"));
    }
}
