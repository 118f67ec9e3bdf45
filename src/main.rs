use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, warn};

use swarmcrawl::cli::Cli;
use swarmcrawl::logging::init_logging;
use swarmcrawl::network::HttpClient;
use swarmcrawl::{crawl, CrawlError};

#[tokio::main]
async fn main() -> Result<(), CrawlError> {
    init_logging();

    let cli = Cli::parse_args();
    let config = cli.to_config();

    let client = Arc::new(HttpClient::new(&config.user_agent, config.fetch_timeout)?);

    // Ctrl+C flips the stop signal; the crawl drains and reports normally.
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("interrupt received, stopping crawl");
                let _ = stop_tx.send(true);
            }
            Err(e) => error!(error = %e, "failed to listen for interrupt"),
        }
    });

    let report = crawl::start_with_shutdown(config, client, stop_rx).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
