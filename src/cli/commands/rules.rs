//! Rule listing command.

use console::style;

use rulecrawl::RuleService;

use crate::cli::helpers::truncate;

/// List loaded rules.
pub fn cmd_rules(service: &RuleService) -> anyhow::Result<()> {
    let rules = service.rules();

    if rules.is_empty() {
        println!("{} No rules loaded.", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Rules").bold());
    println!("{}", "-".repeat(60));
    println!("{:<20} {:<28} Type", "ID", "Name");
    println!("{}", "-".repeat(60));

    for rule in rules.iter() {
        println!(
            "{:<20} {:<28} {}",
            truncate(&rule.id, 19),
            truncate(&rule.name, 27),
            rule.content_type
        );
    }

    Ok(())
}
