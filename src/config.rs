// Crawl configuration - single source of truth for timing defaults

use std::time::Duration;

pub struct Config;

impl Config {
    // Crawl shape
    pub const PAGE_LIMIT: usize = 25;
    pub const WORKERS: usize = 5;

    // Timing
    pub const FETCH_TIMEOUT_SECS: u64 = 5;
    pub const IDLE_TIMEOUT_SECS: u64 = 6;
    pub const STOP_GRACE_SECS: u64 = 1;
    pub const NO_WORK_DELAY_MS: u64 = 50;

    // HTTP/Network config
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const MAX_REDIRECTS: usize = 5;
    pub const USER_AGENT: &'static str = "SwarmCrawl/0.1";
}

/// Knobs for a single crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// URL the crawl starts from.
    pub seed_url: String,
    /// Hard cap on pages handed out to workers.
    pub page_limit: usize,
    /// Worker pool size; doubles as the quiescence gate.
    pub workers: usize,
    /// Per-request fetch timeout.
    pub fetch_timeout: Duration,
    /// How long the collector waits for a report before forcing a stop.
    pub idle_timeout: Duration,
    /// Pause between empty assignment rounds so idle workers do not spin hot.
    pub no_work_delay: Duration,
    /// Extra time granted to in-flight fetches after a stop is requested.
    pub stop_grace: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            page_limit: Config::PAGE_LIMIT,
            workers: Config::WORKERS,
            fetch_timeout: Duration::from_secs(Config::FETCH_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(Config::IDLE_TIMEOUT_SECS),
            no_work_delay: Duration::from_millis(Config::NO_WORK_DELAY_MS),
            stop_grace: Duration::from_secs(Config::STOP_GRACE_SECS),
            user_agent: Config::USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CrawlConfig::new("https://example.com");
        assert_eq!(config.seed_url, "https://example.com");
        assert_eq!(config.page_limit, 25);
        assert_eq!(config.workers, 5);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.idle_timeout, Duration::from_secs(6));
    }
}
