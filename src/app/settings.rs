//! Validated runtime settings
//!
//! Built once from the merged CLI/config arguments before any task starts.

use crate::app::cli::args::{
    Args, DEFAULT_CONSUME_DELAY_MS, DEFAULT_INTERVAL_SECS, DEFAULT_MESSAGES,
    DEFAULT_PRODUCE_DELAY_MS, DEFAULT_SLOTS,
};
use crate::app::error::{AppError, AppResult};
use crate::core::validation::{resolve_collector_address, validate_interval_secs};
use crate::telemetry::codec::MAX_CONSUMERS;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub consumers: usize,
    pub collector: SocketAddr,
    pub interval: Duration,
    pub messages: u32,
    pub slots: usize,
    pub produce_delay: Duration,
    pub consume_delay: Duration,
}

impl Settings {
    pub fn resolve(args: &Args) -> AppResult<Self> {
        let consumers = args.consumers.ok_or_else(|| {
            AppError::configuration(
                "Number of consumers is required (positional CONSUMERS or 'consumers' in the config file)",
            )
        })?;
        if consumers < 1 {
            return Err(AppError::configuration("Number of consumers must be at least 1"));
        }
        if consumers > MAX_CONSUMERS {
            return Err(AppError::configuration(format!(
                "Number of consumers must be at most {}, got {}",
                MAX_CONSUMERS, consumers
            )));
        }

        let collector = args.collector.as_deref().ok_or_else(|| {
            AppError::configuration(
                "Collector address is required (--collector HOST:PORT or 'collector' in the config file)",
            )
        })?;
        let collector = resolve_collector_address(collector).map_err(AppError::configuration)?;

        let interval = validate_interval_secs(args.interval.unwrap_or(DEFAULT_INTERVAL_SECS))
            .map_err(AppError::configuration)?;

        let slots = args.slots.unwrap_or(DEFAULT_SLOTS);
        if slots < 2 {
            return Err(AppError::configuration(format!(
                "The queue needs at least 2 slots, got {}",
                slots
            )));
        }

        Ok(Self {
            consumers,
            collector,
            interval,
            messages: args.messages.unwrap_or(DEFAULT_MESSAGES),
            slots,
            produce_delay: Duration::from_millis(
                args.produce_delay_ms.unwrap_or(DEFAULT_PRODUCE_DELAY_MS),
            ),
            consume_delay: Duration::from_millis(
                args.consume_delay_ms.unwrap_or(DEFAULT_CONSUME_DELAY_MS),
            ),
        })
    }
}
