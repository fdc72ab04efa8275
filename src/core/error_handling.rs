//! Generic error handling utilities
//!
//! Provides unified fatal-error reporting across the queue, telemetry and
//! application error types while keeping domain-specific messages.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)` with an actionable message; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the operator can act on
    /// directly (bad consumer count, unreadable config file, ...)
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors log their own message; system errors log the
/// operation context and put the full error on the same fatal line, with the
/// debug representation at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use queuemon::core::error_handling::log_error_with_context;
/// # use queuemon::app::AppError;
/// let err = AppError::Configuration { message: "consumer count must be at least 1".into() };
/// log_error_with_context(&err, "Resolving settings");
/// // Logs: "FATAL: consumer count must be at least 1"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("FATAL: {}", user_msg);
        }
        _ => {
            log::error!("FATAL: {}: {}", operation_context, error);
        }
    }
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
