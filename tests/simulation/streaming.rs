//! Library-level runs streaming to an in-process collector

use crate::common::{assert_well_formed, closed_port, quick_settings, CollectorHarness};
use queuemon::app::simulation;
use queuemon::app::AppError;
use queuemon::telemetry::TelemetryError;
use serial_test::serial;

#[test]
#[serial]
fn test_three_slots_five_messages_two_consumers() {
    let collector = CollectorHarness::start();

    let summary = simulation::run(&quick_settings(collector.addr, 2, 5, 3)).unwrap();
    let closed = collector.wait_closed();

    assert_eq!(summary.produced, 5);
    assert_eq!(summary.total_consumed(), 5);
    assert_eq!(closed.consumers, 2);
    assert_eq!(closed.frames, summary.frames_sent);

    let frames = collector.frames();
    assert_eq!(frames.len() as u64, summary.frames_sent);
    assert_well_formed(&frames, 2, 2);

    let report = collector.stop();
    assert_eq!(report.connections, 1);
}

#[test]
#[serial]
fn test_sequential_runs_share_one_collector() {
    let collector = CollectorHarness::start();

    for consumers in [1, 3] {
        let summary = simulation::run(&quick_settings(collector.addr, consumers, 20, 4)).unwrap();
        let closed = collector.wait_closed();
        assert_eq!(summary.total_consumed(), 20);
        assert_eq!(closed.consumers, consumers);
    }

    let report = collector.stop();
    assert_eq!(report.connections, 2);
}

#[test]
#[serial]
fn test_zero_messages_sends_nothing_after_handshake() {
    let collector = CollectorHarness::start();

    let summary = simulation::run(&quick_settings(collector.addr, 2, 0, 3)).unwrap();
    let closed = collector.wait_closed();

    assert_eq!(summary.produced, 0);
    assert_eq!(summary.consumed, vec![0, 0]);
    assert_eq!(closed.consumers, 2);
    assert!(collector
        .frames()
        .iter()
        .all(|f| f.produced == 0 && f.queue_length == 0));

    collector.stop();
}

#[test]
fn test_unreachable_collector() {
    let result = simulation::run(&quick_settings(closed_port(), 2, 5, 3));
    assert!(matches!(
        result,
        Err(AppError::Telemetry(TelemetryError::Connect { .. }))
    ));
}
