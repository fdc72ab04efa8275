//! Validation utilities for CLI arguments and configuration values

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a sampling interval given in (possibly fractional) seconds
pub fn validate_interval_secs(value: f64) -> Result<Duration, String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!(
            "Sampling interval must be a positive number of seconds, got {}",
            value
        ));
    }
    Duration::try_from_secs_f64(value)
        .map_err(|e| format!("Sampling interval {} is out of range: {}", value, e))
}

/// Resolve a `host:port` collector endpoint to its first socket address
pub fn resolve_collector_address(value: &str) -> Result<SocketAddr, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Collector address cannot be empty".to_string());
    }
    let mut addrs = trimmed
        .to_socket_addrs()
        .map_err(|e| format!("Invalid collector address '{}': {}", trimmed, e))?;
    addrs
        .next()
        .ok_or_else(|| format!("Collector address '{}' did not resolve", trimmed))
}
