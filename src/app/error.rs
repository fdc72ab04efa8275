//! Application Error Types

use crate::queue::api::QueueError;
use crate::telemetry::TelemetryError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    #[error("Task {name} panicked")]
    TaskPanicked { name: String },

    #[error("Produced {produced} items but consumers took {consumed}")]
    ConservationViolated { produced: u64, consumed: u64 },
}

impl AppError {
    pub fn configuration(message: impl Into<String>) -> Self {
        AppError::Configuration {
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, AppError::Configuration { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Configuration { message } => Some(message),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
