//! Worker actor: one fetch-parse-report cycle per assignment.
//!
//! Lifecycle per message: Idle -> Assigned -> Fetching -> Reporting ->
//! Idle, with a terminal Stopped state on the stop instruction. A worker
//! suspends only while awaiting a fetch or its next mailbox message; all
//! other state is local to its task and never touched from outside.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::messages::{CollectorMessage, SupervisorMessage, WorkerMessage};
use crate::network::Fetch;
use crate::parser;

pub struct Worker {
    id: usize,
    fetcher: Arc<dyn Fetch>,
    supervisor: mpsc::UnboundedSender<SupervisorMessage>,
    collector: mpsc::UnboundedSender<CollectorMessage>,
    /// Clone of this worker's own mailbox sender, enclosed with every
    /// assignment request so the supervisor can route the reply.
    mailbox: mpsc::UnboundedSender<WorkerMessage>,
    /// Pause between empty rounds; keeps the polling loop from spinning.
    no_work_delay: Duration,
}

impl Worker {
    pub fn new(
        id: usize,
        fetcher: Arc<dyn Fetch>,
        supervisor: mpsc::UnboundedSender<SupervisorMessage>,
        collector: mpsc::UnboundedSender<CollectorMessage>,
        mailbox: mpsc::UnboundedSender<WorkerMessage>,
        no_work_delay: Duration,
    ) -> Self {
        Self {
            id,
            fetcher,
            supervisor,
            collector,
            mailbox,
            no_work_delay,
        }
    }

    /// Process assignments until stopped or the mailbox closes.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<WorkerMessage>) {
        // Announce idleness so the supervisor can hand out the seed.
        self.request_assignment();

        while let Some(msg) = rx.recv().await {
            match msg {
                WorkerMessage::Assign(url) => {
                    self.crawl_page(&url).await;
                    self.request_assignment();
                }
                WorkerMessage::NoWork => {
                    let _ = self
                        .collector
                        .send(CollectorMessage::NoNewWork { worker: self.id });
                    if !self.no_work_delay.is_zero() {
                        tokio::time::sleep(self.no_work_delay).await;
                    }
                    self.request_assignment();
                }
                WorkerMessage::Stop => {
                    debug!(worker = self.id, "stop instruction received");
                    let _ = self.supervisor.send(SupervisorMessage::WorkerDone);
                    return;
                }
            }
        }
    }

    /// Fetch one page and forward every extracted link to the collector.
    /// Fetch failures yield zero links; the crawl carries on.
    async fn crawl_page(&self, url: &str) {
        info!(worker = self.id, url, "fetching");

        let links = match self.fetcher.fetch(url).await {
            Ok(page) => parser::extract_links(&page.content),
            Err(e) => {
                warn!(worker = self.id, url, error = %e, "fetch failed");
                Vec::new()
            }
        };

        info!(worker = self.id, url, links = links.len(), "fetched");

        for link in links {
            let _ = self.collector.send(CollectorMessage::FoundUrl(link));
        }
    }

    fn request_assignment(&self) {
        let _ = self
            .supervisor
            .send(SupervisorMessage::RequestAssignment(self.mailbox.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{FetchError, FetchResult};
    use async_trait::async_trait;
    use tokio::sync::mpsc::unbounded_channel;

    struct StaticPage(String);

    #[async_trait]
    impl Fetch for StaticPage {
        async fn fetch(&self, _url: &str) -> Result<FetchResult, FetchError> {
            Ok(FetchResult {
                content: self.0.clone(),
                status_code: 200,
                content_type: Some("text/html".to_string()),
            })
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl Fetch for AlwaysFails {
        async fn fetch(&self, _url: &str) -> Result<FetchResult, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    struct Harness {
        worker_tx: mpsc::UnboundedSender<WorkerMessage>,
        supervisor_rx: mpsc::UnboundedReceiver<SupervisorMessage>,
        collector_rx: mpsc::UnboundedReceiver<CollectorMessage>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn spawn_worker(fetcher: Arc<dyn Fetch>) -> Harness {
        let (supervisor_tx, supervisor_rx) = unbounded_channel();
        let (collector_tx, collector_rx) = unbounded_channel();
        let (worker_tx, worker_rx) = unbounded_channel();
        let worker = Worker::new(
            0,
            fetcher,
            supervisor_tx,
            collector_tx,
            worker_tx.clone(),
            Duration::ZERO,
        );
        let handle = tokio::spawn(worker.run(worker_rx));
        Harness {
            worker_tx,
            supervisor_rx,
            collector_rx,
            handle,
        }
    }

    #[tokio::test]
    async fn test_extracted_links_reach_the_collector() {
        let html = "<a href=\"http://a.test/x\">x</a><a href=\"http://a.test/y\">y</a>";
        let mut h = spawn_worker(Arc::new(StaticPage(html.to_string())));

        // Startup announcement.
        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::RequestAssignment(_)
        ));

        h.worker_tx
            .send(WorkerMessage::Assign("http://a.test".to_string()))
            .unwrap();

        match h.collector_rx.recv().await.unwrap() {
            CollectorMessage::FoundUrl(url) => assert_eq!(url, "http://a.test/x"),
            other => panic!("expected FoundUrl, got {:?}", other),
        }
        match h.collector_rx.recv().await.unwrap() {
            CollectorMessage::FoundUrl(url) => assert_eq!(url, "http://a.test/y"),
            other => panic!("expected FoundUrl, got {:?}", other),
        }

        // After reporting, the worker asks for more work.
        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::RequestAssignment(_)
        ));

        h.worker_tx.send(WorkerMessage::Stop).unwrap();
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_stall_the_worker() {
        let mut h = spawn_worker(Arc::new(AlwaysFails));

        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::RequestAssignment(_)
        ));

        h.worker_tx
            .send(WorkerMessage::Assign("http://a.test".to_string()))
            .unwrap();

        // Zero links reported, but the worker still requests its next
        // assignment instead of stalling in the fetch state.
        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::RequestAssignment(_)
        ));
        assert!(h.collector_rx.try_recv().is_err());

        h.worker_tx.send(WorkerMessage::Stop).unwrap();
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_no_work_round_reports_to_the_collector() {
        let mut h = spawn_worker(Arc::new(AlwaysFails));

        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::RequestAssignment(_)
        ));

        h.worker_tx.send(WorkerMessage::NoWork).unwrap();

        assert!(matches!(
            h.collector_rx.recv().await.unwrap(),
            CollectorMessage::NoNewWork { worker: 0 }
        ));
        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::RequestAssignment(_)
        ));

        h.worker_tx.send(WorkerMessage::Stop).unwrap();
        h.handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_is_acknowledged() {
        let mut h = spawn_worker(Arc::new(AlwaysFails));

        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::RequestAssignment(_)
        ));

        h.worker_tx.send(WorkerMessage::Stop).unwrap();
        assert!(matches!(
            h.supervisor_rx.recv().await.unwrap(),
            SupervisorMessage::WorkerDone
        ));
        h.handle.await.unwrap();

        // Stopped means stopped: the mailbox is gone.
        assert!(h.worker_tx.send(WorkerMessage::NoWork).is_err());
    }
}
