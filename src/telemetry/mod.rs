//! Telemetry
//!
//! The exporter runs next to the queue on its own thread and streams
//! snapshots over TCP; the collector is a separate async process that reads
//! and renders them.
//!
//! ```text
//! BoundedQueue --sample()--> TelemetryExporter ==TCP==> Collector --render()--> stdout
//! ```

pub mod codec;
pub mod collector;
pub mod error;
pub mod exporter;

pub use codec::{CodecError, Frame};
pub use collector::{
    render, Collector, CollectorEvent, CollectorReport, ConnectionSummary, OutputFormat,
};
pub use error::{TelemetryError, TelemetryResult};
pub use exporter::{ExporterReport, TelemetryExporter};
