//! CLI argument parsing tests

use clap::Parser;
use queuemon::app::cli::{Args, CollectorArgs};
use queuemon::app::settings::Settings;
use queuemon::app::AppError;
use queuemon::telemetry::OutputFormat;
use std::time::Duration;

#[test]
fn test_minimal_command_line_resolves() {
    let args = Args::try_parse_from(["queuemon", "3", "--collector", "127.0.0.1:4000"]).unwrap();
    let settings = Settings::resolve(&args).unwrap();

    assert_eq!(settings.consumers, 3);
    assert_eq!(settings.collector.port(), 4000);
    assert_eq!(settings.slots, 10);
    assert_eq!(settings.messages, 1000);
}

#[test]
fn test_fractional_interval() {
    let args = Args::try_parse_from([
        "queuemon",
        "1",
        "--collector",
        "127.0.0.1:4000",
        "--interval",
        "0.25",
    ])
    .unwrap();
    let settings = Settings::resolve(&args).unwrap();
    assert_eq!(settings.interval, Duration::from_millis(250));
}

#[test]
fn test_negative_interval_rejected() {
    let args = Args::try_parse_from([
        "queuemon",
        "1",
        "--collector",
        "127.0.0.1:4000",
        "--interval=-1",
    ])
    .unwrap();
    assert!(matches!(
        Settings::resolve(&args),
        Err(AppError::Configuration { .. })
    ));
}

#[test]
fn test_unparseable_collector_address() {
    for collector in ["localhost", "127.0.0.1:notaport", ""] {
        let args = Args::try_parse_from(["queuemon", "1", "--collector", collector]).unwrap();
        assert!(
            Settings::resolve(&args).is_err(),
            "accepted collector '{}'",
            collector
        );
    }
}

#[test]
fn test_verbosity_flags() {
    let args = Args::try_parse_from(["queuemon", "-q", "-q"]).unwrap();
    assert_eq!(args.effective_log_level(), "error");

    let args = Args::try_parse_from(["queuemon", "--log-level", "warn", "-v"]).unwrap();
    assert_eq!(args.effective_log_level(), "info");

    assert!(Args::try_parse_from(["queuemon", "--log-level", "loud"]).is_err());
    assert!(Args::try_parse_from(["queuemon", "--log-format", "xml"]).is_err());
}

#[test]
fn test_collector_arguments() {
    let args = CollectorArgs::try_parse_from([
        "queuemon-collector",
        "--bind",
        "127.0.0.1",
        "--format",
        "json",
        "-v",
        "5050",
    ])
    .unwrap();

    assert_eq!(args.listen_address(), "127.0.0.1:5050");
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.effective_log_level(), "debug");
}
