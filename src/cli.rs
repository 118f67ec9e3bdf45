use clap::Parser;

use crate::config::{Config, CrawlConfig};
use std::time::Duration;

/// Command-line surface for the crawler.
/// Exit codes: 0=success, 1=crawl error, 2=invalid arguments
#[derive(Parser, Debug)]
#[command(name = "swarmcrawl")]
#[command(about = "An actor-based web crawler with quiescence-driven shutdown")]
#[command(version)]
pub struct Cli {
    #[arg(help = "The starting URL to begin crawling from")]
    pub seed_url: String,

    #[arg(
        short,
        long,
        default_value_t = Config::PAGE_LIMIT,
        help = "Maximum number of pages to crawl"
    )]
    pub limit: usize,

    #[arg(
        short,
        long,
        default_value_t = Config::WORKERS,
        help = "Number of concurrent crawl workers"
    )]
    pub workers: usize,

    #[arg(
        long,
        default_value_t = Config::FETCH_TIMEOUT_SECS,
        help = "Per-request timeout in seconds"
    )]
    pub fetch_timeout: u64,

    #[arg(
        long,
        default_value_t = Config::IDLE_TIMEOUT_SECS,
        help = "Seconds of total silence before the crawl is forced to stop"
    )]
    pub idle_timeout: u64,

    #[arg(
        short,
        long,
        default_value = Config::USER_AGENT,
        help = "User agent string for requests"
    )]
    pub user_agent: String,

    #[arg(long, help = "Print the final report as JSON")]
    pub json: bool,
}

impl Cli {
    /// Parse CLI arguments; on error clap prints usage and exits with code 2.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Turn parsed arguments into a crawl configuration, normalizing bare
    /// domains into https URLs.
    pub fn to_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::new(normalize_seed_url(&self.seed_url));
        config.page_limit = self.limit;
        config.workers = self.workers;
        config.fetch_timeout = Duration::from_secs(self.fetch_timeout);
        config.idle_timeout = Duration::from_secs(self.idle_timeout);
        config.user_agent = self.user_agent.clone();
        config
    }
}

/// Accept `example.com` as shorthand for `https://example.com`. Anything
/// already carrying a scheme passes through unchanged; seed validation
/// proper happens when the crawl starts.
pub fn normalize_seed_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
