//! Both binaries launched as child processes

use crate::common::{closed_port, CollectorHarness, STREAM_DEADLINE};
use serial_test::serial;
use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn simulator() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_queuemon"));
    // Keep the user's default config file out of the picture
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("queuemon-tests-no-config"));
    cmd.env("HOME", std::env::temp_dir().join("queuemon-tests-no-home"));
    cmd
}

fn quick_run_args(addr: SocketAddr) -> Vec<String> {
    vec![
        "2".to_string(),
        "--collector".to_string(),
        addr.to_string(),
        "--messages".to_string(),
        "5".to_string(),
        "--slots".to_string(),
        "3".to_string(),
        "--interval".to_string(),
        "0.005".to_string(),
        "--produce-delay-ms".to_string(),
        "2".to_string(),
        "--consume-delay-ms".to_string(),
        "4".to_string(),
        "--no-color".to_string(),
    ]
}

fn run(cmd: &mut Command) -> Output {
    cmd.stdin(Stdio::null()).output().unwrap()
}

#[test]
#[serial]
fn test_simulator_streams_to_collector() {
    let collector = CollectorHarness::start();

    let output = run(simulator().args(quick_run_args(collector.addr)));
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let closed = collector.wait_closed();
    assert_eq!(closed.consumers, 2);
    collector.stop();
}

#[test]
fn test_zero_consumers_rejected() {
    let output = run(simulator().args(["0", "--collector", "127.0.0.1:9"]));
    assert!(!output.status.success());
}

#[test]
fn test_missing_collector_is_a_configuration_error() {
    let output = run(simulator().args(["2", "--no-color"]));
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Collector address is required"));
}

#[test]
fn test_unreachable_collector_exits_non_zero() {
    let output = run(simulator().args(quick_run_args(closed_port())));
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("FATAL"));
}

#[test]
fn test_missing_config_file_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");

    let output = run(simulator().arg("--config-file").arg(&missing).arg("2"));
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
#[serial]
fn test_config_file_supplies_settings() {
    let collector = CollectorHarness::start();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "consumers = 3\ncollector = \"{}\"\nmessages = 6\nslots = 2\ninterval = 0.005\nproduce-delay-ms = 1\nconsume-delay-ms = 1\nlog-level = \"warn\"",
        collector.addr
    )
    .unwrap();

    let output = run(simulator().arg("--config-file").arg(file.path()));
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let closed = collector.wait_closed();
    assert_eq!(closed.consumers, 3);
    collector.stop();
}

#[cfg(unix)]
#[test]
#[serial]
fn test_collector_binary_prints_frames_and_stops_on_sigterm() {
    let port = closed_port().port();
    let addr: SocketAddr = format!("127.0.0.1:{}", port).parse().unwrap();

    let child = Command::new(env!("CARGO_BIN_EXE_queuemon-collector"))
        .args(["--bind", "127.0.0.1", "--no-color", "-q"])
        .arg(port.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Wait for the listener; the probe is an empty stream the collector skips
    let started = Instant::now();
    while TcpStream::connect(addr).is_err() {
        assert!(started.elapsed() < STREAM_DEADLINE, "collector never listened");
        thread::sleep(Duration::from_millis(20));
    }

    let output = run(simulator().args(quick_run_args(addr)));
    assert!(output.status.success());

    // Give the collector a moment to drain the stream before stopping it
    thread::sleep(Duration::from_millis(200));
    unsafe {
        libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
    }
    let collected = child.wait_with_output().unwrap();
    assert!(collected.status.success());

    let stdout = String::from_utf8_lossy(&collected.stdout);
    for line in stdout.lines() {
        assert!(line.starts_with("queue: "), "unexpected line: {}", line);
        assert!(line.contains(", [0]: ") && line.contains(", [1]: "));
    }
}

#[test]
fn test_collector_requires_port() {
    let output = run(&mut Command::new(env!("CARGO_BIN_EXE_queuemon-collector")));
    assert!(!output.status.success());
}
