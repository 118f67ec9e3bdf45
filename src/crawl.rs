//! Crawl orchestration: wires the actors together and runs one crawl.
//!
//! The supervisor and collector are single tasks owning their state, the
//! workers are a fixed pool of tasks created up front, and everything
//! speaks over mpsc channels. The seed URL goes through the frontier like
//! any other discovery, so the assignment-time dedup covers it too.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::collector::Collector;
use crate::config::CrawlConfig;
use crate::frontier::Frontier;
use crate::messages::{SupervisorMessage, WorkerMessage};
use crate::network::Fetch;
use crate::supervisor::Supervisor;
use crate::worker::Worker;

/// Why the crawl stopped granting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every worker reported an empty round; the reachable graph (or the
    /// page budget) is exhausted.
    Quiescent,
    /// The idle timeout fired, or an external stop was requested.
    Forced,
    /// The actor mesh fell apart without a stop decision.
    Aborted,
}

/// Final crawl report returned by [`start`].
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed_url: String,
    /// Pages handed out as assignments (equals the visited-set size).
    pub pages_assigned: usize,
    /// Links reported to the collector, duplicates included.
    pub urls_discovered: usize,
    pub duration_ms: u64,
    pub reason: StopReason,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Crawled {} pages from {} ({} links discovered, {:?}, {}ms)",
            self.pages_assigned, self.seed_url, self.urls_discovered, self.reason, self.duration_ms
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] crate::network::FetchError),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Run one crawl to completion.
///
/// Returns after the page budget drains, the pool quiesces, or the idle
/// timeout fires; a bounded drain after the stop decision guarantees a
/// return even if a fetch wedges past its own timeout.
pub async fn start(config: CrawlConfig, fetcher: Arc<dyn Fetch>) -> Result<CrawlReport, CrawlError> {
    let (_stop_tx, stop_rx) = watch::channel(false);
    start_with_shutdown(config, fetcher, stop_rx).await
}

/// Like [`start`], with an external stop signal: flipping the watch value
/// to `true` force-stops the crawl (the Ctrl+C path in the binary).
pub async fn start_with_shutdown(
    config: CrawlConfig,
    fetcher: Arc<dyn Fetch>,
    shutdown: watch::Receiver<bool>,
) -> Result<CrawlReport, CrawlError> {
    validate_seed(&config.seed_url)?;
    let started = Instant::now();

    let frontier = Arc::new(Frontier::new());
    frontier.push(config.seed_url.clone());

    let discovered = Arc::new(AtomicUsize::new(0));

    let (supervisor_tx, supervisor_rx) = mpsc::unbounded_channel();
    let (collector_tx, collector_rx) = mpsc::unbounded_channel();

    // Worker mailboxes come first so the supervisor can hold their handles.
    let mut mailboxes = Vec::with_capacity(config.workers);
    for _ in 0..config.workers {
        mailboxes.push(mpsc::unbounded_channel::<WorkerMessage>());
    }
    let handles: Vec<_> = mailboxes.iter().map(|(tx, _)| tx.clone()).collect();

    let supervisor = Supervisor::new(
        Arc::clone(&frontier),
        handles,
        config.page_limit,
        config.fetch_timeout + config.stop_grace,
    );
    let supervisor_task = tokio::spawn(supervisor.run(supervisor_rx));

    let collector = Collector::new(
        Arc::clone(&frontier),
        supervisor_tx.clone(),
        config.workers,
        config.idle_timeout,
        Arc::clone(&discovered),
    );
    let collector_task = tokio::spawn(collector.run(collector_rx));

    let mut worker_tasks = JoinSet::new();
    for (id, (mailbox_tx, mailbox_rx)) in mailboxes.into_iter().enumerate() {
        let worker = Worker::new(
            id,
            Arc::clone(&fetcher),
            supervisor_tx.clone(),
            collector_tx.clone(),
            mailbox_tx,
            config.no_work_delay,
        );
        worker_tasks.spawn(worker.run(mailbox_rx));
    }

    spawn_shutdown_forwarder(shutdown, supervisor_tx);
    drop(collector_tx);

    info!(
        seed = %config.seed_url,
        workers = config.workers,
        limit = config.page_limit,
        "crawl started"
    );

    let report = match supervisor_task.await {
        Ok(report) => report,
        Err(e) => {
            debug!(error = %e, "supervisor task ended abnormally");
            // The visited count dies with the supervisor; there is nothing
            // trustworthy to report.
            crate::supervisor::SupervisorReport {
                pages_assigned: 0,
                reason: StopReason::Aborted,
            }
        }
    };

    // Anything still running (a wedged fetch, the collector parked on its
    // idle timer) is abandoned, not waited for.
    worker_tasks.abort_all();
    collector_task.abort();

    let report = CrawlReport {
        seed_url: config.seed_url,
        pages_assigned: report.pages_assigned,
        urls_discovered: discovered.load(Ordering::Relaxed),
        duration_ms: started.elapsed().as_millis() as u64,
        reason: report.reason,
    };
    info!(
        pages = report.pages_assigned,
        discovered = report.urls_discovered,
        reason = ?report.reason,
        "crawl finished"
    );

    Ok(report)
}

/// Forward an external stop request into the supervisor's mailbox.
fn spawn_shutdown_forwarder(
    mut shutdown: watch::Receiver<bool>,
    supervisor: mpsc::UnboundedSender<SupervisorMessage>,
) {
    tokio::spawn(async move {
        loop {
            if shutdown.changed().await.is_err() {
                return;
            }
            if *shutdown.borrow() {
                info!("external stop requested");
                let _ = supervisor.send(SupervisorMessage::ForceStop);
                return;
            }
        }
    });
}

fn validate_seed(seed_url: &str) -> Result<(), CrawlError> {
    let parsed = url::Url::parse(seed_url).map_err(|e| CrawlError::InvalidSeed {
        url: seed_url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CrawlError::InvalidSeed {
            url: seed_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}
