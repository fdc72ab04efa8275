//! Consumer pool
//!
//! N workers race on the same queue. Each worker takes one item per lock
//! acquisition, simulates processing with the lock released, and exits once
//! production is finished and nothing is left to take.

use crate::queue::buffer::BoundedQueue;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::latency::Latency;
use crate::queue::types::{WorkItem, WorkerReport};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Worker lifecycle
///
/// `DrainingCheck` is the decision point after every wake-up: take an item
/// and go back to `Running`, or observe finished-and-empty and terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    DrainingCheck,
    Terminated,
}

fn enter(worker: usize, state: WorkerState) {
    log::trace!("Consumer {} -> {:?}", worker, state);
}

/// Body of one consumer worker
///
/// With `keep_receipts` set, every dequeue is kept in the report; otherwise
/// only the count is.
pub fn run_worker(
    worker: usize,
    queue: Arc<BoundedQueue<WorkItem>>,
    mut latency: Latency,
    keep_receipts: bool,
) -> QueueResult<WorkerReport> {
    log::info!("Consumer {} starting", worker);

    let mut report = WorkerReport {
        worker,
        consumed: 0,
        dequeued: Vec::new(),
    };

    loop {
        enter(worker, WorkerState::DrainingCheck);
        match queue.dequeue(worker)? {
            Some(dequeued) => {
                enter(worker, WorkerState::Running);
                log::debug!("- {} (consumer {})", dequeued.item, worker);
                report.consumed += 1;
                if keep_receipts {
                    report.dequeued.push(dequeued);
                }
                latency.pause();
            }
            None => {
                enter(worker, WorkerState::Terminated);
                break;
            }
        }
    }

    log::info!(
        "Consumer {} terminated after {} items",
        worker,
        report.consumed
    );
    Ok(report)
}

/// Handles to the running consumer workers
pub struct ConsumerPool {
    handles: Vec<(usize, JoinHandle<QueueResult<WorkerReport>>)>,
}

impl ConsumerPool {
    /// Spawn one named thread per consumer counter in `queue`
    ///
    /// Each worker gets its index directly and its own latency generator
    /// with delays below `max_delay`.
    pub fn spawn(queue: &Arc<BoundedQueue<WorkItem>>, max_delay: Duration) -> QueueResult<Self> {
        Self::spawn_with(queue, |_| Latency::up_to(max_delay), false)
    }

    /// Spawn with a caller-chosen latency per worker
    ///
    /// `keep_receipts` makes every worker report each item it took, which
    /// grows with the number of items consumed.
    pub fn spawn_with(
        queue: &Arc<BoundedQueue<WorkItem>>,
        latency_for: impl Fn(usize) -> Latency,
        keep_receipts: bool,
    ) -> QueueResult<Self> {
        let count = queue.consumer_count();
        let mut handles = Vec::with_capacity(count);

        for worker in 0..count {
            let name = format!("consumer-{}", worker);
            let queue = Arc::clone(queue);
            let latency = latency_for(worker);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || run_worker(worker, queue, latency, keep_receipts))
                .map_err(|e| QueueError::Spawn {
                    name,
                    message: e.to_string(),
                })?;
            handles.push((worker, handle));
        }

        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every worker, in index order
    ///
    /// All workers are joined even if one of them failed; the first
    /// failure is returned.
    pub fn join(self) -> QueueResult<Vec<WorkerReport>> {
        let mut reports = Vec::with_capacity(self.handles.len());
        let mut first_error = None;

        for (worker, handle) in self.handles {
            let outcome = handle.join().unwrap_or_else(|_| {
                Err(QueueError::TaskPanicked {
                    name: format!("consumer-{}", worker),
                })
            });
            match outcome {
                Ok(report) => reports.push(report),
                Err(e) => {
                    log::error!("Consumer {} failed: {}", worker, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }
}
