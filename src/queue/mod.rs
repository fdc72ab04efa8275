//! Bounded Producer/Consumer Queue
//!
//! A fixed-capacity circular buffer shared by one producer and a pool of
//! consumer workers, with a read-mostly telemetry observer sampling the same
//! state.
//!
//! # Overview
//!
//! - **Blocking**: the producer waits while the buffer is full, consumers
//!   wait while it is empty; every wait re-checks its predicate on wake-up
//! - **Termination**: the producer sets a monotonic finished flag; workers
//!   exit only once the flag is set *and* the buffer is empty, so nothing
//!   queued is ever lost
//! - **One lock**: buffer, indices, finished flag and all counters share a
//!   single mutex encapsulated in [`BoundedQueue`]
//!
//! # Architecture
//!
//! ```text
//!            ┌────────────┐
//!            │  Producer  │  0, 1, 2, ... N_MESSAGES-1
//!            └─────┬──────┘
//!                  │ enqueue (blocks while full)
//!                  ▼
//! ┌────────────────────────────────────────────┐      sample / wait_interval
//! │ BoundedQueue (Mutex + 3 Condvars)          │ ◄──────────────────────────┐
//! │  ┌───┬───┬───┬───┬───┐  produced, finished │                            │
//! │  │ 3 │ 4 │   │ 1 │ 2 │  consumed[0..N]     │               ┌────────────┴──────┐
//! │  └───┴───┴───┴───┴───┘                     │               │ TelemetryExporter │
//! └────┬──────────┬──────────┬─────────────────┘               └───────────────────┘
//!      │ dequeue  │ dequeue  │ dequeue (blocks while empty and not finished)
//! ┌────┴─────┐ ┌──┴───────┐ ┌┴─────────┐
//! │Consumer 0│ │Consumer 1│ │Consumer 2│
//! └──────────┘ └──────────┘ └──────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use queuemon::queue::{BoundedQueue, ConsumerPool, Latency, Producer};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = Arc::new(BoundedQueue::new(3, 2)?);
//!
//! let pool = ConsumerPool::spawn(&queue, Duration::ZERO)?;
//! let producer = Producer::new(Arc::clone(&queue), 5, Latency::none()).spawn()?;
//!
//! let produced = producer.join().expect("producer panicked")?.produced;
//! let consumed: u64 = pool.join()?.iter().map(|r| r.consumed).sum();
//! assert_eq!(produced, 5);
//! assert_eq!(consumed, 5);
//! # Ok(())
//! # }
//! ```

mod buffer;
mod consumer;
mod error;
mod latency;
mod producer;
mod types;

pub mod api;

pub use buffer::BoundedQueue;
pub use consumer::{run_worker, ConsumerPool, WorkerState};
pub use error::{QueueError, QueueResult};
pub use latency::Latency;
pub use producer::{Producer, ProducerState};
pub use types::{Dequeued, ProducerReport, QueueSnapshot, WorkItem, WorkerReport};

#[cfg(test)]
mod tests;
