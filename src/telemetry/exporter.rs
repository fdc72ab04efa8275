//! Telemetry exporter
//!
//! Streams queue snapshots to a collector over one TCP connection. The
//! exporter owns the socket; the queue lock is only held for the duration of
//! a snapshot copy, never across a send.

use crate::queue::api::{BoundedQueue, WorkItem};
use crate::telemetry::codec::{check_consumers, encode_frame_into, encode_handshake, Frame};
use crate::telemetry::error::{TelemetryError, TelemetryResult};
use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Outcome of an exporter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExporterReport {
    pub frames_sent: u64,
}

pub struct TelemetryExporter {
    stream: TcpStream,
    peer: SocketAddr,
    consumers: usize,
    frames_sent: u64,
    buf: Vec<u8>,
}

impl TelemetryExporter {
    /// Connect to the collector and announce the pool size
    pub fn connect(addr: SocketAddr, consumers: usize) -> TelemetryResult<Self> {
        let handshake = encode_handshake(consumers)?;

        let mut stream = TcpStream::connect(addr)
            .map_err(|source| TelemetryError::Connect { addr, source })?;
        stream
            .set_nodelay(true)
            .map_err(|source| TelemetryError::Connect { addr, source })?;
        stream
            .write_all(&handshake)
            .map_err(|source| TelemetryError::Send {
                frames_sent: 0,
                source,
            })?;

        log::info!(
            "Connected to collector at {} ({} consumers announced)",
            addr,
            consumers
        );

        Ok(Self {
            stream,
            peer: addr,
            consumers,
            frames_sent: 0,
            buf: Vec::new(),
        })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn consumers(&self) -> usize {
        self.consumers
    }

    fn send(&mut self, frame: &Frame) -> TelemetryResult<()> {
        // The collector sizes every frame from the handshake
        check_consumers(frame, self.consumers)?;
        encode_frame_into(frame, &mut self.buf);
        self.stream
            .write_all(&self.buf)
            .map_err(|source| TelemetryError::Send {
                frames_sent: self.frames_sent,
                source,
            })?;
        self.frames_sent += 1;
        Ok(())
    }

    /// Sample, send and wait until the queue is drained
    ///
    /// The drained sample itself is not sent; the stream simply ends when the
    /// connection closes on return.
    pub fn run(
        mut self,
        queue: &BoundedQueue<WorkItem>,
        interval: Duration,
    ) -> TelemetryResult<ExporterReport> {
        log::info!("Telemetry exporter starting (interval {:?})", interval);

        while let Some(snapshot) = queue.sample()? {
            let frame = Frame::from_snapshot(&snapshot)?;
            self.send(&frame)?;
            log::trace!(
                "Sent frame {} (queue {}, produced {})",
                self.frames_sent,
                frame.queue_length,
                frame.produced
            );

            if queue.wait_interval(interval)? {
                break;
            }
        }

        let _ = self.stream.shutdown(Shutdown::Both);
        log::info!(
            "Telemetry exporter finished after {} frames",
            self.frames_sent
        );

        Ok(ExporterReport {
            frames_sent: self.frames_sent,
        })
    }

    /// Run on a dedicated named thread
    pub fn spawn(
        self,
        queue: Arc<BoundedQueue<WorkItem>>,
        interval: Duration,
    ) -> TelemetryResult<JoinHandle<TelemetryResult<ExporterReport>>> {
        let handle = thread::Builder::new()
            .name("telemetry".to_string())
            .spawn(move || {
                let result = self.run(&queue, interval);
                if let Err(e) = &result {
                    log::error!("Telemetry exporter stopped: {}", e);
                }
                result
            })?;
        Ok(handle)
    }
}
