//! Search, chapter and content commands.

use console::style;

use rulecrawl::models::Content;
use rulecrawl::RuleService;

use crate::cli::helpers::print_json;

/// Search a site and print the matches.
pub async fn cmd_search(service: &RuleService, rule_id: &str, keyword: &str) -> anyhow::Result<()> {
    let items = service.search(rule_id, keyword).await?;

    eprintln!(
        "{} {} results for {}",
        style("✓").green(),
        items.len(),
        style(keyword).cyan()
    );
    print_json(&items)
}

/// List a work's chapters.
pub async fn cmd_chapters(service: &RuleService, rule_id: &str, url: &str) -> anyhow::Result<()> {
    let chapters = service.chapters(rule_id, url).await?;

    if chapters.is_empty() {
        eprintln!("{} No chapters found at {}", style("!").yellow(), url);
    } else {
        eprintln!("{} {} chapters", style("✓").green(), chapters.len());
    }
    print_json(&chapters)
}

/// Extract a chapter's content.
pub async fn cmd_content(
    service: &RuleService,
    rule_id: &str,
    chapter_url: &str,
) -> anyhow::Result<()> {
    let result = service.content(rule_id, chapter_url).await?;

    match &result.content {
        Content::Video(url) => eprintln!("{} Video at {}", style("✓").green(), url),
        Content::Text(lines) => eprintln!(
            "{} {} {} items",
            style("✓").green(),
            lines.len(),
            result.content_type
        ),
    }
    print_json(&result)
}
