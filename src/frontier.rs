//! Shared FIFO frontier of discovered-but-unassigned URLs.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Unbounded FIFO queue of URLs awaiting assignment.
///
/// The collector pushes, the supervisor pops, and the entry point seeds it,
/// so unlike the other crawl state it needs internal mutual exclusion.
/// Deduplication does not happen here: the same URL may sit in the queue
/// several times and is filtered against the visited set at assignment time.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<VecDeque<String>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, url: String) {
        self.queue.lock().push_back(url);
    }

    /// Pop the head URL. Each queue entry is handed out at most once.
    pub fn pop(&self) -> Option<String> {
        self.queue.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
