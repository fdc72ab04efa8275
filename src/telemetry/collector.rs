//! Telemetry collector
//!
//! Accepts exporter connections one at a time, reads the handshake and then
//! fixed-size frames until the peer closes. A short read is the normal end of
//! a stream; a malformed stream is dropped with a warning and the collector
//! moves on to the next connection.

use crate::core::styles::StyleRole;
use crate::telemetry::codec::{decode_frame, decode_handshake, frame_len, Frame, HANDSHAKE_LEN};
use crate::telemetry::error::{TelemetryError, TelemetryResult};
use serde::Serialize;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// How received frames are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Something the collector observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorEvent {
    Connected { peer: SocketAddr, consumers: usize },
    Frame { peer: SocketAddr, frame: Frame },
    Closed(ConnectionSummary),
}

/// What one connection delivered before it ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub peer: SocketAddr,
    /// Pool size from the handshake, 0 if none was received
    pub consumers: usize,
    pub frames: u64,
}

/// Totals across every connection served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorReport {
    pub connections: u64,
    pub frames: u64,
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    received_at: String,
    #[serde(flatten)]
    frame: &'a Frame,
}

/// Render one frame as a single output line
///
/// `color` only affects the text format.
pub fn render(frame: &Frame, format: OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Text => {
            let field = |label: &str, value: u32| {
                format!(
                    "{}: {}",
                    StyleRole::Label.paint(label, color),
                    StyleRole::Value.paint(&value.to_string(), color)
                )
            };
            let mut line = format!(
                "{}, {}",
                field("queue", frame.queue_length),
                field("produced", frame.produced)
            );
            for (i, count) in frame.consumed.iter().enumerate() {
                line.push_str(&format!(
                    ", {}: {}",
                    StyleRole::Worker.paint(&format!("[{}]", i), color),
                    count
                ));
            }
            line
        }
        OutputFormat::Json => {
            let record = FrameRecord {
                received_at: chrono::Utc::now().to_rfc3339(),
                frame,
            };
            serde_json::to_string(&record).unwrap_or_else(|e| {
                log::warn!("Failed to serialize frame: {}", e);
                String::new()
            })
        }
    }
}

fn is_end_of_stream(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}

/// Read the handshake, or `None` if the peer closed first
pub async fn read_handshake<R: AsyncRead + Unpin>(reader: &mut R) -> TelemetryResult<Option<usize>> {
    let mut bytes = [0u8; HANDSHAKE_LEN];
    match reader.read_exact(&mut bytes).await {
        Ok(_) => Ok(Some(decode_handshake(bytes)?)),
        Err(e) if is_end_of_stream(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read one frame into `buf`, or `None` once the stream has ended
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    consumers: usize,
    buf: &mut Vec<u8>,
) -> TelemetryResult<Option<Frame>> {
    buf.resize(frame_len(consumers), 0);
    match reader.read_exact(buf).await {
        Ok(_) => Ok(Some(decode_frame(buf, consumers)?)),
        Err(e) if is_end_of_stream(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Serve one telemetry stream to completion
///
/// Reports `Connected` once the handshake is read and a `Frame` event for
/// every complete frame. Returns once the peer closes; a trailing partial
/// frame is discarded.
pub async fn serve_connection<R, F>(
    reader: &mut R,
    peer: SocketAddr,
    on_event: &mut F,
) -> TelemetryResult<ConnectionSummary>
where
    R: AsyncRead + Unpin,
    F: FnMut(CollectorEvent),
{
    let mut summary = ConnectionSummary {
        peer,
        consumers: 0,
        frames: 0,
    };

    let Some(consumers) = read_handshake(reader).await? else {
        return Ok(summary);
    };
    summary.consumers = consumers;
    on_event(CollectorEvent::Connected { peer, consumers });

    let mut buf = Vec::with_capacity(frame_len(consumers));
    while let Some(frame) = read_frame(reader, consumers, &mut buf).await? {
        summary.frames += 1;
        on_event(CollectorEvent::Frame { peer, frame });
    }

    Ok(summary)
}

/// Sequential TCP collector
pub struct Collector {
    listener: TcpListener,
}

impl Collector {
    pub async fn bind(addr: &str) -> TelemetryResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TelemetryError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> TelemetryResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections until shutdown is signalled
    ///
    /// Connections are served strictly one after another. A shutdown while a
    /// stream is being read abandons that stream.
    pub async fn run<F>(
        &self,
        mut shutdown_rx: broadcast::Receiver<()>,
        mut on_event: F,
    ) -> TelemetryResult<CollectorReport>
    where
        F: FnMut(CollectorEvent),
    {
        let mut report = CollectorReport::default();
        log::info!("Collector listening on {}", self.local_addr()?);

        loop {
            let (mut socket, peer) = tokio::select! {
                _ = shutdown_rx.recv() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        log::warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                },
            };

            log::info!("Accepted telemetry stream from {}", peer);
            report.connections += 1;

            let served = tokio::select! {
                _ = shutdown_rx.recv() => {
                    log::info!("Abandoning stream from {} on shutdown", peer);
                    break;
                }
                served = serve_connection(&mut socket, peer, &mut on_event) => served,
            };

            match served {
                Ok(summary) => {
                    log::info!(
                        "Stream from {} ended after {} frames",
                        peer,
                        summary.frames
                    );
                    report.frames += summary.frames;
                    on_event(CollectorEvent::Closed(summary));
                }
                Err(e) => {
                    log::warn!("Dropping stream from {}: {}", peer, e);
                }
            }
        }

        log::info!(
            "Collector stopped after {} connections, {} frames",
            report.connections,
            report.frames
        );
        Ok(report)
    }
}
