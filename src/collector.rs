//! Discovery collector actor: the single funnel for extracted links and
//! the authority that decides the crawl is exhausted.
//!
//! Quiescence is detected by counting empty reports: every discovery
//! clears the count, and once reports from as many distinct workers as
//! the gate (the pool size) have arrived with no discovery in between,
//! every worker has come up empty since the last new link was seen.
//! Requiring distinct workers means the count cannot fill while some
//! worker still holds an assignment whose page may yield links. The
//! scheme remains best-effort, so the loop also races an idle deadline
//! measured from the last discovery: if no new link arrives within the
//! idle window a stop is forced, no matter how much empty-report
//! traffic is still flowing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::frontier::Frontier;
use crate::messages::{CollectorMessage, SupervisorMessage};

pub struct Collector {
    frontier: Arc<Frontier>,
    supervisor: mpsc::UnboundedSender<SupervisorMessage>,
    /// Quiescence threshold; equals the worker pool size.
    gate: usize,
    /// Longest the collector tolerates without a discovery before forcing
    /// a stop.
    idle_timeout: Duration,
    /// Running count of reported links, readable outside this task.
    discovered: Arc<AtomicUsize>,
}

impl Collector {
    pub fn new(
        frontier: Arc<Frontier>,
        supervisor: mpsc::UnboundedSender<SupervisorMessage>,
        gate: usize,
        idle_timeout: Duration,
        discovered: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            frontier,
            supervisor,
            gate,
            idle_timeout,
            discovered,
        }
    }

    /// Process reports until quiescence, the idle deadline, or every
    /// reporting handle is gone.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<CollectorMessage>) {
        // Workers that reported empty since the last discovery.
        let mut quiet_workers: HashSet<usize> = HashSet::new();
        // Only a discovery pushes the deadline out. Empty reports do not,
        // so steady polling traffic from idle workers cannot keep a crawl
        // alive while a wedged fetch never reports at all.
        let mut deadline = Instant::now() + self.idle_timeout;

        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(CollectorMessage::FoundUrl(url)) => {
                        quiet_workers.clear();
                        deadline = Instant::now() + self.idle_timeout;
                        self.discovered.fetch_add(1, Ordering::Relaxed);
                        // Enqueue unconditionally; dedup happens at assignment.
                        self.frontier.push(url);
                    }
                    Some(CollectorMessage::NoNewWork { worker }) => {
                        quiet_workers.insert(worker);
                        if quiet_workers.len() >= self.gate {
                            info!(
                                workers = quiet_workers.len(),
                                "no worker is finding new links, requesting shutdown"
                            );
                            let _ = self.supervisor.send(SupervisorMessage::Quiesced);
                            return;
                        }
                    }
                    None => {
                        debug!("all reporting handles dropped, collector exiting");
                        return;
                    }
                },
                _ = sleep_until(deadline) => {
                    warn!(
                        idle_timeout = ?self.idle_timeout,
                        "no discovery within the idle window, forcing stop"
                    );
                    let _ = self.supervisor.send(SupervisorMessage::ForceStop);
                    return;
                }
            }
        }
    }
}
