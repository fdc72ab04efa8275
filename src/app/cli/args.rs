//! Simulator command line arguments
//!
//! Every option is optional at the clap level so that values missing on the
//! command line can still come from the configuration file. Required values
//! and ranges are enforced when the arguments are resolved into `Settings`.

use crate::core::validation::validate_positive_int;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

pub const DEFAULT_MESSAGES: u32 = 1000;
pub const DEFAULT_SLOTS: usize = 10;
pub const DEFAULT_PRODUCE_DELAY_MS: u64 = 300;
pub const DEFAULT_CONSUME_DELAY_MS: u64 = 1000;
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "queuemon")]
#[command(about = "Bounded producer/consumer queue simulator with live telemetry")]
#[command(version)]
pub struct Args {
    /// Number of consumer workers
    #[arg(value_name = "CONSUMERS", value_parser = validate_positive_int)]
    pub consumers: Option<usize>,

    /// Telemetry collector endpoint
    #[arg(short = 'c', long = "collector", value_name = "HOST:PORT")]
    pub collector: Option<String>,

    /// Sampling interval in seconds (fractions allowed)
    #[arg(short = 'i', long = "interval", value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// Number of items the producer generates
    #[arg(short = 'm', long = "messages", value_name = "COUNT")]
    pub messages: Option<u32>,

    /// Ring buffer slots (holds one item less)
    #[arg(short = 'k', long = "slots", value_name = "K")]
    pub slots: Option<usize>,

    /// Upper bound of the simulated production latency
    #[arg(long = "produce-delay-ms", value_name = "MS")]
    pub produce_delay_ms: Option<u64>,

    /// Upper bound of the simulated consumption latency
    #[arg(long = "consume-delay-ms", value_name = "MS")]
    pub consume_delay_ms: Option<u64>,

    /// Configuration file path
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease log verbosity (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for log output: `--no-color` wins, then `--color`, then TTY detection
    pub fn use_color(&self) -> bool {
        resolve_color(self.color, self.no_color)
    }

    /// Log file, with the literal `none` meaning no file
    pub fn effective_log_file(&self) -> Option<&Path> {
        effective_log_file(self.log_file.as_deref())
    }

    /// Base level shifted by `-v` / `-q`
    pub fn effective_log_level(&self) -> &'static str {
        crate::core::logging::level_with_verbosity(
            self.log_level.as_deref().unwrap_or("info"),
            self.verbose,
            self.quiet,
        )
    }
}

pub(crate) fn resolve_color(color: bool, no_color: bool) -> bool {
    if no_color {
        return false;
    }
    color || std::io::IsTerminal::is_terminal(&std::io::stderr())
}

pub(crate) fn effective_log_file(log_file: Option<&Path>) -> Option<&Path> {
    log_file.filter(|path| !path.as_os_str().eq_ignore_ascii_case("none"))
}
