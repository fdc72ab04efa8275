//! Producer task
//!
//! Emits the items `0..messages` into the shared queue, then announces that
//! production is finished. It is the only writer of the produced count and
//! the finished flag.

use crate::queue::buffer::BoundedQueue;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::latency::Latency;
use crate::queue::types::{ProducerReport, WorkItem};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Producer lifecycle; `Finished` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    Running,
    Finished,
}

pub struct Producer {
    queue: Arc<BoundedQueue<WorkItem>>,
    messages: u32,
    latency: Latency,
    state: ProducerState,
}

impl Producer {
    pub fn new(queue: Arc<BoundedQueue<WorkItem>>, messages: u32, latency: Latency) -> Self {
        Self {
            queue,
            messages,
            latency,
            state: ProducerState::Running,
        }
    }

    pub fn state(&self) -> ProducerState {
        self.state
    }

    /// Produce every item, then finish
    ///
    /// The queue is marked finished even when an enqueue fails, so blocked
    /// consumers are always released.
    pub fn run(&mut self) -> QueueResult<ProducerReport> {
        log::info!("Producer starting: {} items", self.messages);

        let outcome = self.produce_all();
        let finish = self.queue.finish();
        self.state = ProducerState::Finished;

        let produced = outcome?;
        if !finish? {
            log::warn!("Production was already marked finished");
        }
        log::info!("Producer finished after {} items", produced);

        Ok(ProducerReport { produced })
    }

    fn produce_all(&mut self) -> QueueResult<u64> {
        let mut produced = 0;
        for item in 0..self.messages {
            self.latency.pause();
            produced = self.queue.enqueue(item)?;
            log::debug!("+ {}", item);
        }
        Ok(produced)
    }

    /// Run on a dedicated, named OS thread
    pub fn spawn(mut self) -> QueueResult<JoinHandle<QueueResult<ProducerReport>>> {
        thread::Builder::new()
            .name("producer".to_string())
            .spawn(move || self.run())
            .map_err(|e| QueueError::Spawn {
                name: "producer".to_string(),
                message: e.to_string(),
            })
    }
}
