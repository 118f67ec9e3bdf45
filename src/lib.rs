//! Actor-based web crawler with quiescence-driven shutdown.
//!
//! A supervisor owns the visited set and grants assignments, a pool of
//! workers fetches and parses pages, and a collector funnels discovered
//! links back into the frontier while watching for quiescence. The crawl
//! ends when every worker reports an empty round, the page budget drains,
//! or the idle-timeout safety net fires.

pub mod cli;
pub mod collector;
pub mod config;
pub mod crawl;
pub mod frontier;
pub mod logging;
pub mod messages;
pub mod network;
pub mod parser;
pub mod supervisor;
pub mod worker;

pub use config::CrawlConfig;
pub use crawl::{start, start_with_shutdown, CrawlError, CrawlReport, StopReason};
pub use network::{Fetch, FetchError, FetchResult, HttpClient};
pub use parser::extract_links;
