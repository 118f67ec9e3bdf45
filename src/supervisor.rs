//! Supervisor actor: sole owner of the visited set and the authority to
//! grant work.
//!
//! All visited-set mutations are serialized through this actor's mailbox,
//! so the contains-check and insert below form the single linearization
//! point that keeps any URL from ever being assigned to two workers.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::crawl::StopReason;
use crate::frontier::Frontier;
use crate::messages::{SupervisorMessage, WorkerHandle, WorkerMessage};

/// What the supervisor knows once every worker has been drained.
#[derive(Debug, Clone)]
pub struct SupervisorReport {
    /// Size of the visited set, i.e. pages handed out as assignments.
    pub pages_assigned: usize,
    pub reason: StopReason,
}

pub struct Supervisor {
    frontier: Arc<Frontier>,
    /// Mailbox handles only; worker state stays worker-local.
    workers: Vec<WorkerHandle>,
    page_limit: usize,
    /// How long to wait for stop acknowledgments from wedged workers.
    drain_timeout: Duration,
    visited: HashSet<String>,
    stopped: bool,
    done_acks: usize,
    reason: Option<StopReason>,
}

impl Supervisor {
    pub fn new(
        frontier: Arc<Frontier>,
        workers: Vec<WorkerHandle>,
        page_limit: usize,
        drain_timeout: Duration,
    ) -> Self {
        Self {
            frontier,
            workers,
            page_limit,
            drain_timeout,
            visited: HashSet::new(),
            stopped: false,
            done_acks: 0,
            reason: None,
        }
    }

    /// Process mailbox traffic until every worker has acknowledged the stop
    /// instruction (or the drain window runs out on a wedged worker).
    pub async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<SupervisorMessage>,
    ) -> SupervisorReport {
        loop {
            let msg = if self.stopped {
                // Bounded drain: a fetch that never returns must not hold
                // the crawl open.
                match timeout(self.drain_timeout, rx.recv()).await {
                    Ok(msg) => msg,
                    Err(_) => {
                        warn!(
                            acked = self.done_acks,
                            total = self.workers.len(),
                            "drain window expired before every worker acknowledged"
                        );
                        break;
                    }
                }
            } else {
                rx.recv().await
            };

            let Some(msg) = msg else {
                break;
            };

            match msg {
                SupervisorMessage::RequestAssignment(worker) => {
                    self.handle_assignment_request(worker);
                }
                SupervisorMessage::Quiesced => self.stop_workers(StopReason::Quiescent),
                SupervisorMessage::ForceStop => self.stop_workers(StopReason::Forced),
                SupervisorMessage::WorkerDone => self.done_acks += 1,
            }

            if self.stopped && self.done_acks >= self.workers.len() {
                break;
            }
        }

        SupervisorReport {
            pages_assigned: self.visited.len(),
            reason: self.reason.unwrap_or(StopReason::Aborted),
        }
    }

    fn handle_assignment_request(&mut self, worker: WorkerHandle) {
        if self.stopped {
            // A stopped supervisor grants no further work.
            return;
        }

        if self.visited.len() >= self.page_limit.saturating_sub(1) {
            // Budget drain: no reply at all. The worker parks in its
            // mailbox and the collector's idle timeout ends the crawl.
            debug!(
                visited = self.visited.len(),
                limit = self.page_limit,
                "page budget reached, leaving worker idle"
            );
            return;
        }

        let Some(url) = self.frontier.pop() else {
            let _ = worker.send(WorkerMessage::NoWork);
            return;
        };

        if self.visited.insert(url.clone()) {
            let _ = worker.send(WorkerMessage::Assign(url));
        } else {
            // Re-discovered after it was already assigned.
            let _ = worker.send(WorkerMessage::NoWork);
        }
    }

    fn stop_workers(&mut self, reason: StopReason) {
        if self.stopped {
            // Stop is idempotent; the first reason wins.
            return;
        }
        self.stopped = true;
        self.reason = Some(reason);

        info!(?reason, pages = self.visited.len(), "stopping worker pool");

        for worker in &self.workers {
            if worker.send(WorkerMessage::Stop).is_err() {
                // Mailbox already gone; count it so the drain can finish.
                self.done_acks += 1;
            }
        }
    }
}
