//! Telemetry Error Types

use crate::queue::api::QueueError;
use crate::telemetry::codec::CodecError;
use std::io;
use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to connect to collector at {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to send telemetry after {frames_sent} frames: {source}")]
    Send {
        frames_sent: u64,
        #[source]
        source: io::Error,
    },

    #[error("Failed to bind collector to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Telemetry codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Queue error while sampling: {0}")]
    Queue(#[from] QueueError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl crate::core::error_handling::ContextualError for TelemetryError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
