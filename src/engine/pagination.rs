//! Pagination state machine shared by content and discover resolution.
//!
//! Two strategies exist. A rule with a next-page expression follows the URL
//! extracted from each page. A rule without one re-fetches its template with
//! an incremented page number, but only when the template carries a page
//! token; otherwise there is exactly one page.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `$page`, or a standalone `page` word not adjacent to identifier
/// characters, quotes or path separators.
static PAGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\$page)|((^|[^a-zA-Z'"_/-])page([^a-zA-Z0-9'"]|$))"#).unwrap()
});

/// Whether a URL template can be re-fetched with a different page number.
pub fn has_page_token(template: &str) -> bool {
    PAGE_TOKEN.is_match(template)
}

/// How the next page's URL is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStrategy {
    /// Follow the URL extracted by the rule's next-page expression.
    NextUrl,
    /// Re-fetch the template with the page counter advanced.
    PageToken,
    /// Only page 1 exists.
    SinglePage,
}

impl PageStrategy {
    pub fn detect(has_next_url_rule: bool, template: &str) -> Self {
        if has_next_url_rule {
            PageStrategy::NextUrl
        } else if has_page_token(template) {
            PageStrategy::PageToken
        } else {
            PageStrategy::SinglePage
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// Fetch `url` as page number `page`.
    Fetching { page: u32, url: String },
    /// No URL is determinable for the next page.
    Done,
    /// A fetch or extraction failed on `page`.
    Failed { page: u32 },
}

impl PageState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PageState::Fetching { .. })
    }
}

/// Computes page transitions for one paginated resolution.
#[derive(Debug, Clone)]
pub struct Paginator {
    strategy: PageStrategy,
    template: String,
    max_pages: Option<u32>,
}

impl Paginator {
    pub fn new(strategy: PageStrategy, template: impl Into<String>) -> Self {
        Self {
            strategy,
            template: template.into(),
            max_pages: None,
        }
    }

    /// Stop after `max_pages` pages even if more are determinable.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn strategy(&self) -> PageStrategy {
        self.strategy
    }

    /// Page 1 always uses the template verbatim.
    pub fn start(&self) -> PageState {
        if self.template.is_empty() {
            return PageState::Done;
        }
        PageState::Fetching {
            page: 1,
            url: self.template.clone(),
        }
    }

    /// State after `page` completed, given the next URL it yielded.
    pub fn advance(&self, page: u32, next_url: Option<&str>) -> PageState {
        let page = page + 1;
        if self.max_pages.is_some_and(|max| page > max) {
            return PageState::Done;
        }

        match self.strategy {
            PageStrategy::NextUrl => match next_url {
                Some(url) if !url.is_empty() => PageState::Fetching {
                    page,
                    url: url.to_string(),
                },
                _ => PageState::Done,
            },
            PageStrategy::PageToken => PageState::Fetching {
                page,
                url: self.template.clone(),
            },
            PageStrategy::SinglePage => PageState::Done,
        }
    }

    pub fn fail(&self, page: u32) -> PageState {
        PageState::Failed { page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_token_detection() {
        assert!(has_page_token("http://x/list?p=$page"));
        assert!(has_page_token("http://x/list?p={{page}}"));
        assert!(has_page_token("http://x/list?p={{page + 1}}"));
        assert!(has_page_token("page"));
        assert!(has_page_token("@js:`http://x/${page}`"));

        assert!(!has_page_token("http://x/chapter/1.html"));
        assert!(!has_page_token("http://x/page/2"));
        assert!(!has_page_token("http://x/?mypage=1"));
        assert!(!has_page_token("http://x/?n=pages"));
        assert!(!has_page_token("http://x/?k='page'"));
        assert!(!has_page_token("http://x/home-page.html"));
    }

    #[test]
    fn test_strategy_detection() {
        assert_eq!(
            PageStrategy::detect(true, "http://x/1.html"),
            PageStrategy::NextUrl
        );
        assert_eq!(
            PageStrategy::detect(false, "http://x/1?p=$page"),
            PageStrategy::PageToken
        );
        assert_eq!(
            PageStrategy::detect(false, "http://x/1.html"),
            PageStrategy::SinglePage
        );
    }

    #[test]
    fn test_single_page_never_advances() {
        let paginator = Paginator::new(PageStrategy::SinglePage, "http://x/1.html");
        assert_eq!(
            paginator.start(),
            PageState::Fetching {
                page: 1,
                url: "http://x/1.html".into()
            }
        );
        assert_eq!(paginator.advance(1, Some("http://x/2.html")), PageState::Done);
    }

    #[test]
    fn test_next_url_follows_extracted_url() {
        let paginator = Paginator::new(PageStrategy::NextUrl, "http://x/1.html");
        assert_eq!(
            paginator.advance(1, Some("http://x/1_2.html")),
            PageState::Fetching {
                page: 2,
                url: "http://x/1_2.html".into()
            }
        );
        assert_eq!(paginator.advance(2, Some("")), PageState::Done);
        assert_eq!(paginator.advance(2, None), PageState::Done);
    }

    #[test]
    fn test_page_token_reuses_template() {
        let paginator = Paginator::new(PageStrategy::PageToken, "http://x/1?p=$page");
        assert_eq!(
            paginator.advance(4, None),
            PageState::Fetching {
                page: 5,
                url: "http://x/1?p=$page".into()
            }
        );
    }

    #[test]
    fn test_empty_template_is_done() {
        let paginator = Paginator::new(PageStrategy::NextUrl, "");
        assert_eq!(paginator.start(), PageState::Done);
    }

    #[test]
    fn test_max_pages() {
        let paginator =
            Paginator::new(PageStrategy::PageToken, "http://x/?p=$page").with_max_pages(Some(2));
        assert!(!paginator.advance(1, None).is_terminal());
        assert_eq!(paginator.advance(2, None), PageState::Done);
    }

    #[test]
    fn test_fail_is_terminal() {
        let paginator = Paginator::new(PageStrategy::PageToken, "http://x/?p=$page");
        let state = paginator.fail(3);
        assert_eq!(state, PageState::Failed { page: 3 });
        assert!(state.is_terminal());
    }
}
