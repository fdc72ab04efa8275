//! One simulator run
//!
//! Wires the queue, the producer, the consumer pool and the telemetry
//! exporter together, waits for all of them and checks that every produced
//! item was consumed exactly once.

use crate::app::error::{AppError, AppResult};
use crate::app::settings::Settings;
use crate::queue::api::{
    BoundedQueue, ConsumerPool, Latency, Producer, ProducerReport, QueueResult, WorkItem,
    WorkerReport,
};
use crate::telemetry::{ExporterReport, TelemetryExporter, TelemetryResult};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSummary {
    pub produced: u64,
    /// Items taken by each worker, by worker index
    pub consumed: Vec<u64>,
    pub frames_sent: u64,
}

impl SimulationSummary {
    pub fn total_consumed(&self) -> u64 {
        self.consumed.iter().sum()
    }
}

/// Run the simulation described by `settings` to completion
///
/// The collector connection is made before any task starts, so an
/// unreachable collector fails the run without producing anything. A
/// telemetry failure later on does not stop the producer or the consumers;
/// it is reported once they have finished.
pub fn run(settings: &Settings) -> AppResult<SimulationSummary> {
    let queue = Arc::new(BoundedQueue::<WorkItem>::new(settings.slots, settings.consumers)?);
    let exporter = TelemetryExporter::connect(settings.collector, settings.consumers)?;

    log::info!(
        "Starting producer ({} items) and {} consumers on a {}-slot queue",
        settings.messages,
        settings.consumers,
        settings.slots
    );

    let pool = ConsumerPool::spawn(&queue, settings.consume_delay)?;

    let producer = Producer::new(
        Arc::clone(&queue),
        settings.messages,
        Latency::up_to(settings.produce_delay),
    );
    let producer = match producer.spawn() {
        Ok(handle) => handle,
        Err(e) => {
            abandon(&queue, pool);
            return Err(e.into());
        }
    };

    let exporter = exporter.spawn(Arc::clone(&queue), settings.interval);

    let produced = join_producer(producer, &queue);
    let workers = pool.join();
    let telemetry = join_exporter(exporter);

    let produced = produced?;
    let workers = workers?;
    let summary = summarize(produced, &workers, telemetry?);

    if summary.produced != summary.total_consumed() {
        return Err(AppError::ConservationViolated {
            produced: summary.produced,
            consumed: summary.total_consumed(),
        });
    }

    log::info!(
        "Run complete: {} produced, {} consumed {:?}, {} telemetry frames",
        summary.produced,
        summary.total_consumed(),
        summary.consumed,
        summary.frames_sent
    );
    Ok(summary)
}

// Consumers only exit on finished-and-empty
fn release(queue: &BoundedQueue<WorkItem>) {
    if let Err(e) = queue.finish() {
        log::error!("Failed to release consumers: {}", e);
    }
}

// Let the workers drain what is queued and wait for them
fn abandon(queue: &BoundedQueue<WorkItem>, pool: ConsumerPool) {
    release(queue);
    if let Err(e) = pool.join() {
        log::error!("Consumers failed while shutting down: {}", e);
    }
}

fn join_producer(
    handle: JoinHandle<QueueResult<ProducerReport>>,
    queue: &BoundedQueue<WorkItem>,
) -> AppResult<u64> {
    match handle.join() {
        Ok(report) => Ok(report?.produced),
        Err(_) => {
            release(queue);
            Err(AppError::TaskPanicked {
                name: "producer".to_string(),
            })
        }
    }
}

fn join_exporter(
    spawned: TelemetryResult<JoinHandle<TelemetryResult<ExporterReport>>>,
) -> AppResult<ExporterReport> {
    match spawned?.join() {
        Ok(report) => Ok(report?),
        Err(_) => Err(AppError::TaskPanicked {
            name: "telemetry".to_string(),
        }),
    }
}

fn summarize(produced: u64, workers: &[WorkerReport], telemetry: ExporterReport) -> SimulationSummary {
    SimulationSummary {
        produced,
        consumed: workers.iter().map(|w| w.consumed).collect(),
        frames_sent: telemetry.frames_sent,
    }
}
