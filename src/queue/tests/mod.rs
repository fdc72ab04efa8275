//! Test suites for the bounded queue
//!
//! Organised by property: concurrent runs (conservation, FIFO, capacity,
//! termination), lifecycle of the finished flag, and edge cases.


use crate::queue::api::{
    BoundedQueue, ConsumerPool, Dequeued, Latency, Producer, QueueSnapshot, WorkItem,
    WorkerReport,
};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Upper bound for a whole small run; a deadlock shows up as a timeout
pub(super) const RUN_DEADLINE: Duration = Duration::from_secs(20);

pub(super) struct RunOutcome {
    pub produced: u64,
    pub reports: Vec<WorkerReport>,
    pub final_snapshot: QueueSnapshot,
}

impl RunOutcome {
    pub fn total_consumed(&self) -> u64 {
        self.reports.iter().map(|r| r.consumed).sum()
    }

    /// Every dequeue across all workers, in global dequeue order
    pub fn dequeues_in_order(&self) -> Vec<Dequeued<WorkItem>> {
        let mut all: Vec<_> = self
            .reports
            .iter()
            .flat_map(|r| r.dequeued.iter().copied())
            .collect();
        all.sort_by_key(|d| d.ticket);
        all
    }
}

/// Run one producer and a consumer pool to completion on fresh threads
///
/// Panics if the run does not finish within [`RUN_DEADLINE`].
pub(super) fn run_to_completion(
    slots: usize,
    consumers: usize,
    messages: u32,
    max_produce_delay: Duration,
    max_consume_delay: Duration,
) -> RunOutcome {
    let queue = Arc::new(BoundedQueue::new(slots, consumers).unwrap());
    run_queue_to_completion(queue, messages, max_produce_delay, max_consume_delay)
}

pub(super) fn run_queue_to_completion(
    queue: Arc<BoundedQueue<WorkItem>>,
    messages: u32,
    max_produce_delay: Duration,
    max_consume_delay: Duration,
) -> RunOutcome {
    let (done_tx, done_rx) = mpsc::channel();

    let runner_queue = Arc::clone(&queue);
    thread::spawn(move || {
        let pool = ConsumerPool::spawn_with(
            &runner_queue,
            |worker| Latency::seeded(max_consume_delay, worker as u64 + 1),
            true,
        )
        .unwrap();
        let producer = Producer::new(
            Arc::clone(&runner_queue),
            messages,
            Latency::seeded(max_produce_delay, 0),
        )
        .spawn()
        .unwrap();

        let produced = producer.join().unwrap().unwrap().produced;
        let reports = pool.join().unwrap();
        let _ = done_tx.send((produced, reports));
    });

    let (produced, reports) = done_rx
        .recv_timeout(RUN_DEADLINE)
        .expect("producer and consumers should terminate without deadlock");

    RunOutcome {
        produced,
        reports,
        final_snapshot: queue.snapshot().unwrap(),
    }
}
