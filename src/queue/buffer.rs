//! BoundedQueue: fixed-capacity circular buffer with blocking coordination
//!
//! The buffer keeps `K` slots and two indices. One slot is always left
//! unused so that "full" (`(write + 1) % K == read`) and "empty"
//! (`write == read`) can be told apart without a separate count, giving a
//! usable capacity of `K - 1`.
//!
//! The production state (items produced, the finished flag, per-worker
//! consumption counters) lives behind the same mutex as the buffer, so every
//! observer sees occupancy and the finished flag change together.
//!
//! Three condition variables are used, one per kind of waiter:
//!
//! - `can_read`: consumers waiting for an item or for production to finish
//! - `can_write`: the producer waiting for a free slot
//! - `drained`: the telemetry sampler waiting out its interval
//!
//! Every wait sits in a predicate-recheck loop. A single enqueue or dequeue
//! wakes one waiter of the opposite kind; only [`BoundedQueue::finish`]
//! broadcasts.

use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::types::{Dequeued, QueueSnapshot};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug)]
struct QueueState<T> {
    slots: Vec<Option<T>>,
    write_idx: usize,
    read_idx: usize,
    finished: bool,
    produced: u64,
    consumed: Vec<u64>,
    next_ticket: u64,
}

impl<T> QueueState<T> {
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn len(&self) -> usize {
        (self.write_idx + self.slot_count() - self.read_idx) % self.slot_count()
    }

    fn is_full(&self) -> bool {
        (self.write_idx + 1) % self.slot_count() == self.read_idx
    }

    fn is_empty(&self) -> bool {
        self.write_idx == self.read_idx
    }

    fn is_drained(&self) -> bool {
        self.finished && self.is_empty()
    }

    /// Caller guarantees the queue is not full
    fn push(&mut self, item: T) -> u64 {
        debug_assert!(!self.is_full());
        debug_assert!(self.slots[self.write_idx].is_none());
        self.slots[self.write_idx] = Some(item);
        self.write_idx = (self.write_idx + 1) % self.slot_count();
        self.produced += 1;
        self.produced
    }

    /// Caller guarantees the queue is not empty and `worker` is in range
    fn pop(&mut self, worker: usize) -> QueueResult<Dequeued<T>> {
        let index = self.read_idx;
        let item = self.slots[index]
            .take()
            .ok_or(QueueError::EmptySlot { index })?;
        self.read_idx = (self.read_idx + 1) % self.slot_count();
        self.consumed[worker] += 1;
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        Ok(Dequeued {
            item,
            ticket,
            worker,
        })
    }

    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            queue_length: self.len(),
            produced: self.produced,
            consumed: self.consumed.clone(),
            finished: self.finished,
        }
    }
}

/// Single-producer, multi-consumer bounded queue with an encapsulated lock
///
/// Shared between tasks as `Arc<BoundedQueue<T>>`. No field is reachable
/// without going through the lock, including the read-only telemetry path.
///
/// # Example
///
/// ```rust
/// use queuemon::queue::BoundedQueue;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = BoundedQueue::new(3, 1)?; // capacity 2, one consumer
/// queue.enqueue(7u32)?;
/// queue.finish()?;
///
/// let taken = queue.dequeue(0)?.expect("one item queued");
/// assert_eq!(taken.item, 7);
/// assert!(queue.dequeue(0)?.is_none()); // finished and empty
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,
    can_read: Condvar,
    can_write: Condvar,
    drained: Condvar,
    slot_count: usize,
    consumer_count: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue with `slot_count` slots (capacity `slot_count - 1`)
    /// and one consumption counter per consumer
    pub fn new(slot_count: usize, consumer_count: usize) -> QueueResult<Self> {
        if slot_count < 2 {
            return Err(QueueError::InvalidCapacity { slots: slot_count });
        }
        if consumer_count == 0 {
            return Err(QueueError::InvalidConsumerCount);
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(slot_count)
            .map_err(|e| QueueError::Allocation {
                what: "queue slots",
                message: e.to_string(),
            })?;
        slots.resize_with(slot_count, || None);

        let mut consumed = Vec::new();
        consumed
            .try_reserve_exact(consumer_count)
            .map_err(|e| QueueError::Allocation {
                what: "consumer counters",
                message: e.to_string(),
            })?;
        consumed.resize(consumer_count, 0);

        Ok(Self {
            state: Mutex::new(QueueState {
                slots,
                write_idx: 0,
                read_idx: 0,
                finished: false,
                produced: 0,
                consumed,
                next_ticket: 0,
            }),
            can_read: Condvar::new(),
            can_write: Condvar::new(),
            drained: Condvar::new(),
            slot_count,
            consumer_count,
        })
    }

    /// Number of slots `K`
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Usable capacity, `K - 1`
    pub fn capacity(&self) -> usize {
        self.slot_count - 1
    }

    pub fn consumer_count(&self) -> usize {
        self.consumer_count
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, QueueState<T>>> {
        handle_mutex_poison(self.state.lock(), |message| QueueError::Poisoned {
            message,
        })
    }

    fn check_worker(&self, worker: usize) -> QueueResult<()> {
        if worker >= self.consumer_count {
            return Err(QueueError::InvalidWorker {
                worker,
                consumers: self.consumer_count,
            });
        }
        Ok(())
    }

    /// Enqueue without blocking
    ///
    /// Fails with [`QueueError::QueueFull`] while no slot is free.
    /// Returns the produced count including this item.
    pub fn try_enqueue(&self, item: T) -> QueueResult<u64> {
        let mut state = self.lock()?;
        if state.finished {
            return Err(QueueError::Finished);
        }
        if state.is_full() {
            return Err(QueueError::QueueFull {
                capacity: self.capacity(),
            });
        }
        let produced = state.push(item);
        self.can_read.notify_one();
        Ok(produced)
    }

    /// Enqueue, blocking while the queue is full
    ///
    /// Returns the produced count including this item.
    pub fn enqueue(&self, item: T) -> QueueResult<u64> {
        let mut state = self.lock()?;
        if state.finished {
            return Err(QueueError::Finished);
        }
        while state.is_full() {
            state = handle_mutex_poison(self.can_write.wait(state), |message| {
                QueueError::Poisoned { message }
            })?;
        }
        let produced = state.push(item);
        // One new item satisfies exactly one consumer
        self.can_read.notify_one();
        Ok(produced)
    }

    /// Dequeue without blocking; `None` when the queue is empty
    pub fn try_dequeue(&self, worker: usize) -> QueueResult<Option<Dequeued<T>>> {
        self.check_worker(worker)?;
        let mut state = self.lock()?;
        if state.is_empty() {
            return Ok(None);
        }
        let dequeued = state.pop(worker)?;
        self.after_pop(&state);
        Ok(Some(dequeued))
    }

    /// Dequeue, blocking while the queue is empty and production is running
    ///
    /// Returns `None` once production has finished and the queue is empty.
    /// That condition is checked in the same critical section as the pop,
    /// so among racing workers only one can take the last item, and every
    /// item queued before [`finish`](Self::finish) is handed out.
    pub fn dequeue(&self, worker: usize) -> QueueResult<Option<Dequeued<T>>> {
        self.check_worker(worker)?;
        let mut state = self.lock()?;
        while state.is_empty() && !state.finished {
            state = handle_mutex_poison(self.can_read.wait(state), |message| {
                QueueError::Poisoned { message }
            })?;
        }
        if state.is_drained() {
            return Ok(None);
        }
        let dequeued = state.pop(worker)?;
        self.after_pop(&state);
        Ok(Some(dequeued))
    }

    fn after_pop(&self, state: &QueueState<T>) {
        if state.is_drained() {
            self.drained.notify_all();
        }
        self.can_write.notify_one();
    }

    /// Mark production as finished and wake every waiting consumer and sampler
    ///
    /// Returns `false` if production had already been marked finished.
    pub fn finish(&self) -> QueueResult<bool> {
        let mut state = self.lock()?;
        if state.finished {
            return Ok(false);
        }
        state.finished = true;
        // Every consumer must observe the flag on its own
        self.can_read.notify_all();
        self.drained.notify_all();
        Ok(true)
    }

    pub fn is_finished(&self) -> QueueResult<bool> {
        Ok(self.lock()?.finished)
    }

    /// Number of items currently queued
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Consistent copy of occupancy and counters
    pub fn snapshot(&self) -> QueueResult<QueueSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    /// Snapshot for telemetry, or `None` once the queue is drained
    pub fn sample(&self) -> QueueResult<Option<QueueSnapshot>> {
        let state = self.lock()?;
        if state.is_drained() {
            return Ok(None);
        }
        Ok(Some(state.snapshot()))
    }

    /// Park for up to `interval`, waking early once the queue is drained
    ///
    /// The lock is released while parked. Returns whether the queue is
    /// drained on return.
    pub fn wait_interval(&self, interval: Duration) -> QueueResult<bool> {
        let state = self.lock()?;
        let (state, _timeout) = handle_mutex_poison(
            self.drained
                .wait_timeout_while(state, interval, |state| !state.is_drained()),
            |message| QueueError::Poisoned { message },
        )?;
        Ok(state.is_drained())
    }
}
