//! CLI commands implementation.

mod discover;
mod read;
mod rules;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rulecrawl::config::{Config, LoadOptions};

use super::helpers::build_service;

#[derive(Parser)]
#[command(name = "rulecrawl")]
#[command(about = "Rule-driven search, chapter, content and discover extraction")]
#[command(version)]
pub struct Cli {
    /// Config file (TOML or JSON)
    #[arg(long, global = true, env = "RULECRAWL_CONFIG")]
    config: Option<PathBuf>,

    /// Rules file, overriding the configured one
    #[arg(long, global = true, env = "RULECRAWL_RULES")]
    rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Search a site for a keyword
    Search {
        /// Rule ID to search with
        rule_id: String,
        /// Search keyword
        keyword: String,
    },

    /// List the chapters of a work
    Chapters {
        /// Rule ID the work belongs to
        rule_id: String,
        /// Work URL (from search results)
        url: String,
    },

    /// Extract the content of a chapter
    Content {
        /// Rule ID the chapter belongs to
        rule_id: String,
        /// Chapter URL (from the chapter list)
        chapter_url: String,
    },

    /// Show a rule's discover tabs
    DiscoverMap {
        /// Rule ID
        rule_id: String,
    },

    /// Browse a discover listing
    Discover {
        /// Rule ID
        rule_id: String,
        /// Listing URL (a value from discover-map)
        origin: String,
        /// Number of pages to browse
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// List loaded rules
    Rules,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let config = Config::load(&options)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    let service = build_service(&config, cli.rules.as_deref())?;

    match cli.command {
        Commands::Search { rule_id, keyword } => {
            read::cmd_search(&service, &rule_id, &keyword).await
        }
        Commands::Chapters { rule_id, url } => read::cmd_chapters(&service, &rule_id, &url).await,
        Commands::Content {
            rule_id,
            chapter_url,
        } => read::cmd_content(&service, &rule_id, &chapter_url).await,
        Commands::DiscoverMap { rule_id } => discover::cmd_discover_map(&service, &rule_id).await,
        Commands::Discover {
            rule_id,
            origin,
            pages,
        } => discover::cmd_discover(&service, &rule_id, &origin, pages).await,
        Commands::Rules => rules::cmd_rules(&service),
    }
}
