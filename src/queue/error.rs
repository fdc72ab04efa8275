//! Queue Error Types

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is full (capacity: {capacity})")]
    QueueFull { capacity: usize },

    #[error("Production already finished; no further items are accepted")]
    Finished,

    #[error("Worker index {worker} is out of range for a pool of {consumers}")]
    InvalidWorker { worker: usize, consumers: usize },

    #[error("A bounded queue needs at least 2 slots, got {slots}")]
    InvalidCapacity { slots: usize },

    #[error("Consumer pool size must be at least 1")]
    InvalidConsumerCount,

    #[error("Failed to allocate {what}: {message}")]
    Allocation { what: &'static str, message: String },

    #[error("Slot {index} was empty although the indices reported an item")]
    EmptySlot { index: usize },

    #[error("{message}")]
    Poisoned { message: String },

    #[error("Failed to spawn {name}: {message}")]
    Spawn { name: String, message: String },

    #[error("Task {name} panicked")]
    TaskPanicked { name: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
