//! Value types handed out by the queue: dequeue receipts, consistent
//! snapshots of the shared state, and per-task reports.

use serde::Serialize;

/// Work items are plain sequential integers
pub type WorkItem = u32;

/// An item taken from the queue, stamped while the lock was held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dequeued<T> {
    pub item: T,
    /// Global dequeue order across all workers, starting at 0
    pub ticket: u64,
    pub worker: usize,
}

/// Point-in-time copy of the queue and production counters
///
/// Always taken under the queue lock, so `queue_length`, the counters and
/// `finished` are mutually consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub queue_length: usize,
    pub produced: u64,
    pub consumed: Vec<u64>,
    pub finished: bool,
}

impl QueueSnapshot {
    pub fn total_consumed(&self) -> u64 {
        self.consumed.iter().sum()
    }

    /// Production finished and every produced item has been taken
    pub fn is_drained(&self) -> bool {
        self.finished && self.queue_length == 0
    }
}

/// Outcome of a producer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    pub produced: u64,
}

/// Outcome of one consumer worker run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker: usize,
    pub consumed: u64,
    /// Every item this worker took, in the order it took them; empty unless
    /// receipts were requested at spawn
    pub dequeued: Vec<Dequeued<WorkItem>>,
}
