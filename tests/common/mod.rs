//! Common test utilities and helpers
//!
//! An in-process collector running on its own tokio runtime, so synchronous
//! simulator runs can stream to it from the test thread.

#![allow(dead_code)]

use queuemon::app::settings::Settings;
use queuemon::telemetry::{Collector, CollectorEvent, CollectorReport, ConnectionSummary, Frame};
use std::net::SocketAddr;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::broadcast;

pub const STREAM_DEADLINE: Duration = Duration::from_secs(30);

pub struct CollectorHarness {
    pub addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
    frames: Arc<Mutex<Vec<Frame>>>,
    closed_rx: mpsc::Receiver<ConnectionSummary>,
    server: JoinHandle<CollectorReport>,
}

impl CollectorHarness {
    pub fn start() -> Self {
        let (addr_tx, addr_rx) = mpsc::channel();
        let (closed_tx, closed_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let frames = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&frames);
        let server = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let collector = Collector::bind("127.0.0.1:0").await.unwrap();
                addr_tx.send(collector.local_addr().unwrap()).unwrap();
                collector
                    .run(shutdown_rx, |event| match event {
                        CollectorEvent::Frame { frame, .. } => sink.lock().unwrap().push(frame),
                        CollectorEvent::Closed(summary) => {
                            let _ = closed_tx.send(summary);
                        }
                        CollectorEvent::Connected { .. } => {}
                    })
                    .await
                    .unwrap()
            })
        });

        let addr = addr_rx.recv_timeout(STREAM_DEADLINE).unwrap();
        Self {
            addr,
            shutdown_tx,
            frames,
            closed_rx,
            server,
        }
    }

    /// Block until the next stream has been fully read
    pub fn wait_closed(&self) -> ConnectionSummary {
        self.closed_rx
            .recv_timeout(STREAM_DEADLINE)
            .expect("collector should see the stream close")
    }

    /// Every frame received so far, across all connections
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn stop(self) -> CollectorReport {
        self.shutdown_tx.send(()).unwrap();
        self.server.join().unwrap()
    }
}

/// Fast settings for a run against `collector`
pub fn quick_settings(collector: SocketAddr, consumers: usize, messages: u32, slots: usize) -> Settings {
    Settings {
        consumers,
        collector,
        interval: Duration::from_millis(2),
        messages,
        slots,
        produce_delay: Duration::from_millis(1),
        consume_delay: Duration::from_millis(2),
    }
}

/// Frame invariants that hold for every well-formed stream
pub fn assert_well_formed(frames: &[Frame], consumers: usize, capacity: usize) {
    for frame in frames {
        assert_eq!(frame.consumed.len(), consumers);
        assert!(frame.queue_length as usize <= capacity, "{:?}", frame);
        assert_eq!(
            frame.total_consumed() + frame.queue_length as u64,
            frame.produced as u64,
            "{:?}",
            frame
        );
    }
    for pair in frames.windows(2) {
        assert!(pair[0].produced <= pair[1].produced);
        for (before, after) in pair[0].consumed.iter().zip(&pair[1].consumed) {
            assert!(before <= after);
        }
    }
}

/// A local port with nothing listening on it
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}
