//! Collector command line arguments

use super::args::{effective_log_file, resolve_color};
use super::config::{apply_logging_values, get_bool, read_config};
use crate::app::error::{AppError, AppResult};
use crate::telemetry::OutputFormat;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "queuemon-collector")]
#[command(about = "Receives and prints queuemon telemetry streams")]
#[command(version)]
pub struct CollectorArgs {
    /// TCP port to listen on
    #[arg(value_name = "PORT")]
    pub port: u16,

    /// Address to bind
    #[arg(short = 'b', long = "bind", value_name = "ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    /// Frame output format
    #[arg(long = "format", value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Configuration file path (logging keys only)
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

impl CollectorArgs {
    /// `bind:port` as given
    pub fn listen_address(&self) -> String {
        if self.bind.contains(':') && !self.bind.starts_with('[') {
            format!("[{}]:{}", self.bind, self.port)
        } else {
            format!("{}:{}", self.bind, self.port)
        }
    }

    /// Merge logging settings from an explicitly given configuration file
    pub fn load_config_file(&mut self) -> AppResult<()> {
        let Some(path) = self.config_file.clone() else {
            return Ok(());
        };
        if !path.exists() {
            return Err(AppError::configuration(format!(
                "The specified configuration file does not exist: {}",
                path.display()
            )));
        }

        let config = read_config(&path)?;
        let in_file = |e: String| {
            AppError::configuration(format!("Error in configuration file {}: {}", path.display(), e))
        };
        apply_logging_values(
            &config,
            &mut self.log_level,
            &mut self.log_format,
            &mut self.log_file,
        )
        .map_err(in_file)?;
        if !self.color && !self.no_color {
            self.color = get_bool(&config, "color").map_err(in_file)?.unwrap_or(false);
            self.no_color = get_bool(&config, "no-color").map_err(in_file)?.unwrap_or(false);
        }
        Ok(())
    }

    pub fn use_color(&self) -> bool {
        resolve_color(self.color, self.no_color)
    }

    pub fn effective_log_file(&self) -> Option<&Path> {
        effective_log_file(self.log_file.as_deref())
    }

    pub fn effective_log_level(&self) -> &'static str {
        crate::core::logging::level_with_verbosity(
            self.log_level.as_deref().unwrap_or("info"),
            self.verbose,
            self.quiet,
        )
    }
}
