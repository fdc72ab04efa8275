//! TOML configuration file parsing and loading
//!
//! Keys mirror the long option names (`collector`, `interval`,
//! `produce-delay-ms`, ...). Values from the file only fill in options that
//! were not given on the command line.

use super::args::Args;
use crate::app::error::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// `<config_dir>/Queuemon/queuemon.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Queuemon").join("queuemon.toml"))
}

impl Args {
    /// Load the configuration file and merge it under the CLI values
    ///
    /// An explicitly given file must exist; the default file is optional.
    /// Returns the path that was loaded, if any.
    pub fn load_config_file(&mut self) -> AppResult<Option<PathBuf>> {
        let path = match self.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::configuration(format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    )));
                }
                path
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        let config = read_config(&path)?;
        self.apply_toml_values(&config).map_err(|e| {
            AppError::configuration(format!("Error in configuration file {}: {}", path.display(), e))
        })?;
        Ok(Some(path))
    }

    /// Fill unset options from a parsed TOML table
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), String> {
        if self.consumers.is_none() {
            if let Some(n) = get_integer(config, "consumers")? {
                if n < 1 {
                    return Err("'consumers' must be at least 1".to_string());
                }
                self.consumers = Some(to_unsigned(n, "consumers")?);
            }
        }
        if self.collector.is_none() {
            self.collector = get_str(config, "collector")?.map(str::to_string);
        }
        if self.interval.is_none() {
            self.interval = match config.get("interval") {
                None => None,
                Some(toml::Value::Float(f)) => Some(*f),
                Some(toml::Value::Integer(i)) => Some(*i as f64),
                Some(_) => return Err("'interval' must be a number of seconds".to_string()),
            };
        }
        if self.messages.is_none() {
            if let Some(n) = get_integer(config, "messages")? {
                self.messages = Some(to_unsigned(n, "messages")?);
            }
        }
        if self.slots.is_none() {
            if let Some(n) = get_integer(config, "slots")? {
                self.slots = Some(to_unsigned(n, "slots")?);
            }
        }
        if self.produce_delay_ms.is_none() {
            if let Some(n) = get_integer(config, "produce-delay-ms")? {
                self.produce_delay_ms = Some(to_unsigned(n, "produce-delay-ms")?);
            }
        }
        if self.consume_delay_ms.is_none() {
            if let Some(n) = get_integer(config, "consume-delay-ms")? {
                self.consume_delay_ms = Some(to_unsigned(n, "consume-delay-ms")?);
            }
        }

        apply_logging_values(
            config,
            &mut self.log_level,
            &mut self.log_format,
            &mut self.log_file,
        )?;

        if !self.color && !self.no_color {
            self.color = get_bool(config, "color")?.unwrap_or(false);
            self.no_color = get_bool(config, "no-color")?.unwrap_or(false);
        }

        Ok(())
    }
}

pub(crate) fn read_config(path: &Path) -> AppResult<toml::Table> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::configuration(format!(
            "Error reading configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    toml::from_str::<toml::Table>(&contents).map_err(|e| {
        AppError::configuration(format!(
            "Error parsing configuration file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Shared by both binaries
pub(crate) fn apply_logging_values(
    config: &toml::Table,
    log_level: &mut Option<String>,
    log_format: &mut Option<String>,
    log_file: &mut Option<PathBuf>,
) -> Result<(), String> {
    if log_level.is_none() {
        if let Some(level) = get_str(config, "log-level")? {
            const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
            if !LEVELS.contains(&level) {
                return Err(format!("'log-level' must be one of {}", LEVELS.join(", ")));
            }
            *log_level = Some(level.to_string());
        }
    }
    if log_format.is_none() {
        if let Some(format) = get_str(config, "log-format")? {
            if !["text", "ext", "json"].contains(&format) {
                return Err("'log-format' must be one of text, ext, json".to_string());
            }
            *log_format = Some(format.to_string());
        }
    }
    if log_file.is_none() {
        *log_file = get_str(config, "log-file")?.map(PathBuf::from);
    }
    Ok(())
}

fn get_str<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, String> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| format!("'{}' must be a string", key)),
    }
}

fn get_integer(config: &toml::Table, key: &str) -> Result<Option<i64>, String> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| format!("'{}' must be an integer", key)),
    }
}

pub(crate) fn get_bool(config: &toml::Table, key: &str) -> Result<Option<bool>, String> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| format!("'{}' must be true or false", key)),
    }
}

fn to_unsigned<T: TryFrom<i64>>(value: i64, key: &str) -> Result<T, String> {
    T::try_from(value).map_err(|_| format!("'{}' is out of range: {}", key, value))
}
