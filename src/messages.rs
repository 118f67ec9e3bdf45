//! Message types exchanged between the crawler actors.
//!
//! Each actor owns a private mpsc mailbox and mutates its state only while
//! handling one message at a time. Senders never touch another actor's
//! state directly; these enums are the whole surface between them.

use tokio::sync::mpsc;

/// Handle to a worker's private mailbox. The supervisor holds one of these
/// per worker and nothing else about the worker.
pub type WorkerHandle = mpsc::UnboundedSender<WorkerMessage>;

/// Inbound traffic for the supervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A worker went idle and asks for its next assignment, enclosing its
    /// mailbox so the reply can be routed back.
    RequestAssignment(WorkerHandle),
    /// The collector observed a full round of empty reports; the reachable
    /// link graph is exhausted.
    Quiesced,
    /// The idle-timeout safety net (or an external stop request) fired.
    ForceStop,
    /// A stopped worker confirms it will process no further messages.
    WorkerDone,
}

/// Inbound traffic for the discovery collector.
#[derive(Debug)]
pub enum CollectorMessage {
    /// A link extracted from a fetched page.
    FoundUrl(String),
    /// A worker finished a round without producing any new link.
    NoNewWork { worker: usize },
}

/// Inbound traffic for a worker.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Fetch and parse this page.
    Assign(String),
    /// The frontier had nothing for this worker right now.
    NoWork,
    /// Terminal stop instruction.
    Stop,
}
