//! Binary codec for the telemetry stream
//!
//! ## Wire Format
//!
//! Every field is a big-endian signed 32-bit integer.
//!
//! ```text
//! handshake:  [N]
//! frame:      [queue_length, produced, consumed[0], ..., consumed[N-1]]
//! ```
//!
//! A frame is therefore `4 * (N + 2)` bytes. There is no length prefix and no
//! end-of-stream marker; the stream ends when the sender closes the
//! connection. Negative values never appear on a well-formed stream.

use crate::queue::api::QueueSnapshot;
use serde::Serialize;

/// Width of every field on the wire
pub const FIELD_LEN: usize = 4;

/// Size of the handshake that opens every connection
pub const HANDSHAKE_LEN: usize = FIELD_LEN;

/// Largest consumer pool a handshake may announce
///
/// Bounds the per-frame buffer a collector allocates for a stream.
pub const MAX_CONSUMERS: usize = 4096;

/// Error type for codec operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Handshake announced a negative consumer count: {0}")]
    NegativeHandshake(i32),
    #[error("Handshake announced an empty consumer pool")]
    EmptyPool,
    #[error("Handshake announced {count} consumers, at most {max} are supported")]
    TooManyConsumers { count: usize, max: usize },
    #[error("Field {field} is negative on the wire: {value}")]
    NegativeField { field: String, value: i32 },
    #[error("Field {field} does not fit a 32-bit signed integer: {value}")]
    Overflow { field: String, value: u64 },
    #[error("Frame has the wrong size: need {expected} bytes, have {actual}")]
    FrameLength { expected: usize, actual: usize },
    #[error("Frame carries {actual} consumer counters, expected {expected}")]
    ConsumerMismatch { expected: usize, actual: usize },
}

/// One decoded telemetry sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub queue_length: u32,
    pub produced: u32,
    pub consumed: Vec<u32>,
}

impl Frame {
    /// Narrow a queue snapshot to wire width
    pub fn from_snapshot(snapshot: &QueueSnapshot) -> Result<Self, CodecError> {
        let consumed = snapshot
            .consumed
            .iter()
            .enumerate()
            .map(|(i, &count)| narrow(&format!("consumed[{}]", i), count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            queue_length: narrow("queue_length", snapshot.queue_length as u64)?,
            produced: narrow("produced", snapshot.produced)?,
            consumed,
        })
    }

    pub fn consumer_count(&self) -> usize {
        self.consumed.len()
    }

    pub fn total_consumed(&self) -> u64 {
        self.consumed.iter().map(|&c| c as u64).sum()
    }
}

fn narrow(field: &str, value: u64) -> Result<u32, CodecError> {
    if value > i32::MAX as u64 {
        return Err(CodecError::Overflow {
            field: field.to_string(),
            value,
        });
    }
    Ok(value as u32)
}

fn widen(field: impl FnOnce() -> String, bytes: [u8; FIELD_LEN]) -> Result<u32, CodecError> {
    let value = i32::from_be_bytes(bytes);
    if value < 0 {
        return Err(CodecError::NegativeField {
            field: field(),
            value,
        });
    }
    Ok(value as u32)
}

/// Size in bytes of one frame for a pool of `consumers`
pub fn frame_len(consumers: usize) -> usize {
    FIELD_LEN * (consumers + 2)
}

fn check_pool_size(consumers: usize) -> Result<usize, CodecError> {
    match consumers {
        0 => Err(CodecError::EmptyPool),
        n if n > MAX_CONSUMERS => Err(CodecError::TooManyConsumers {
            count: n,
            max: MAX_CONSUMERS,
        }),
        n => Ok(n),
    }
}

pub fn encode_handshake(consumers: usize) -> Result<[u8; HANDSHAKE_LEN], CodecError> {
    let consumers = check_pool_size(consumers)?;
    Ok((consumers as i32).to_be_bytes())
}

/// Decode the pool size, rejecting anything outside `1..=MAX_CONSUMERS`
pub fn decode_handshake(bytes: [u8; HANDSHAKE_LEN]) -> Result<usize, CodecError> {
    match i32::from_be_bytes(bytes) {
        n if n < 0 => Err(CodecError::NegativeHandshake(n)),
        n => check_pool_size(n as usize),
    }
}

/// Encode into `buf`, clearing it first
pub fn encode_frame_into(frame: &Frame, buf: &mut Vec<u8>) {
    buf.clear();
    buf.reserve(frame_len(frame.consumer_count()));
    buf.extend_from_slice(&(frame.queue_length as i32).to_be_bytes());
    buf.extend_from_slice(&(frame.produced as i32).to_be_bytes());
    for &count in &frame.consumed {
        buf.extend_from_slice(&(count as i32).to_be_bytes());
    }
}

pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_frame_into(frame, &mut buf);
    buf
}

/// Decode one frame for a pool of `consumers`
///
/// `bytes` must be exactly one frame long.
pub fn decode_frame(bytes: &[u8], consumers: usize) -> Result<Frame, CodecError> {
    let expected = frame_len(consumers);
    if bytes.len() != expected {
        return Err(CodecError::FrameLength {
            expected,
            actual: bytes.len(),
        });
    }

    let mut fields = bytes.chunks_exact(FIELD_LEN).map(|chunk| {
        let mut field = [0u8; FIELD_LEN];
        field.copy_from_slice(chunk);
        field
    });

    // Length was checked above, so every field is present
    let mut next = || fields.next().unwrap_or_default();

    let queue_length = widen(|| "queue_length".to_string(), next())?;
    let produced = widen(|| "produced".to_string(), next())?;
    let consumed = (0..consumers)
        .map(|i| widen(|| format!("consumed[{}]", i), next()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Frame {
        queue_length,
        produced,
        consumed,
    })
}

/// Check a frame against the pool size announced in the handshake
pub fn check_consumers(frame: &Frame, consumers: usize) -> Result<(), CodecError> {
    if frame.consumer_count() != consumers {
        return Err(CodecError::ConsumerMismatch {
            expected: consumers,
            actual: frame.consumer_count(),
        });
    }
    Ok(())
}
