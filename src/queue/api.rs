//! Public API for the queue system
//!
//! External modules should import from here rather than directly from the
//! internal modules. See the module documentation for the architecture.

// Shared buffer
pub use crate::queue::buffer::BoundedQueue;

// Tasks
pub use crate::queue::consumer::{ConsumerPool, WorkerState};
pub use crate::queue::latency::Latency;
pub use crate::queue::producer::{Producer, ProducerState};

// Values
pub use crate::queue::types::{
    Dequeued, ProducerReport, QueueSnapshot, WorkItem, WorkerReport,
};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
