//! CLI TOML configuration tests
//!
//! Tests for configuration file discovery, CLI overrides and collector
//! logging keys.

use clap::Parser;
use queuemon::app::cli::{Args, CollectorArgs};
use queuemon::app::settings::Settings;
use queuemon::app::AppError;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use toml::Table;

#[test]
fn test_config_then_cli_precedence() {
    let mut args = Args::try_parse_from([
        "queuemon",
        "--collector",
        "127.0.0.1:6000",
        "--consume-delay-ms",
        "5",
    ])
    .unwrap();

    let mut config = Table::new();
    config.insert("consumers".to_string(), toml::Value::Integer(4));
    config.insert(
        "collector".to_string(),
        toml::Value::String("127.0.0.1:1".to_string()),
    );
    config.insert("consume-delay-ms".to_string(), toml::Value::Integer(900));
    config.insert("produce-delay-ms".to_string(), toml::Value::Integer(7));
    args.apply_toml_values(&config).unwrap();

    let settings = Settings::resolve(&args).unwrap();
    assert_eq!(settings.consumers, 4);
    assert_eq!(settings.collector.port(), 6000);
    assert_eq!(settings.consume_delay, Duration::from_millis(5));
    assert_eq!(settings.produce_delay, Duration::from_millis(7));
}

#[test]
fn test_config_error_mentions_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "slots = \"many\"").unwrap();

    let mut args = Args::new();
    args.config_file = Some(file.path().to_path_buf());
    match args.load_config_file() {
        Err(AppError::Configuration { message }) => {
            assert!(message.contains("slots"));
            assert!(message.contains(&file.path().display().to_string()));
        }
        other => panic!("Expected Configuration error, got {:?}", other),
    }
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_default_config_file_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("Queuemon");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("queuemon.toml"),
        "consumers = 5\ncollector = \"127.0.0.1:7070\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let mut args = Args::new();
    let loaded = args.load_config_file();

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(
        loaded.unwrap(),
        Some(config_dir.join("queuemon.toml"))
    );
    assert_eq!(args.consumers, Some(5));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_absent_default_config_file_is_fine() {
    let dir = tempfile::tempdir().unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let mut args = Args::new();
    let loaded = args.load_config_file();

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(loaded.unwrap(), None);
}

#[test]
fn test_collector_reads_logging_keys_only() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "consumers = 2\nlog-level = \"debug\"\nlog-format = \"ext\"\nno-color = true"
    )
    .unwrap();

    let mut args = CollectorArgs::try_parse_from(["queuemon-collector", "9000"]).unwrap();
    args.config_file = Some(file.path().to_path_buf());
    args.load_config_file().unwrap();

    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("ext"));
    assert!(args.no_color);
    assert!(!args.use_color());
}

#[test]
fn test_collector_missing_config_file() {
    let mut args = CollectorArgs::try_parse_from(["queuemon-collector", "9000"]).unwrap();
    args.config_file = Some("/nonexistent/queuemon.toml".into());
    assert!(matches!(
        args.load_config_file(),
        Err(AppError::Configuration { .. })
    ));
}
