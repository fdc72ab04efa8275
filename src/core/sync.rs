//! Synchronization utilities for robust mutex handling
//!
//! Converts lock poisoning into application errors so a panicking worker
//! surfaces as a typed failure in every other task sharing the lock.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Works for both `Mutex::lock` and the `Condvar` wait family, since they
/// all return a `LockResult` wrapping the guard.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use queuemon::core::sync::handle_mutex_poison;
/// use queuemon::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |msg| QueueError::Poisoned { message: msg })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Condvar, Mutex};
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, PartialEq)]
    struct TestError {
        message: String,
    }

    #[test]
    fn test_handle_mutex_poison_success() {
        let mutex = Arc::new(Mutex::new(42));
        let result = handle_mutex_poison(mutex.lock(), |msg| TestError { message: msg });

        assert!(result.is_ok());
        assert_eq!(*result.unwrap(), 42);
    }

    #[test]
    fn test_handle_mutex_poison_with_poisoned_mutex() {
        let mutex = Arc::new(Mutex::new(42));
        let mutex_clone = Arc::clone(&mutex);

        let _ = thread::spawn(move || {
            let _guard = mutex_clone.lock().unwrap();
            panic!("Intentional panic to poison mutex");
        })
        .join();

        let result = handle_mutex_poison(mutex.lock(), |msg| TestError { message: msg });

        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.message.contains("mutex poisoned"));
        assert!(error.message.contains("panic occurred"));
    }

    #[test]
    fn test_handle_condvar_wait_result() {
        let mutex = Mutex::new(0);
        let condvar = Condvar::new();
        let guard = mutex.lock().unwrap();

        let result = handle_mutex_poison(
            condvar.wait_timeout(guard, Duration::from_millis(1)),
            |msg| TestError { message: msg },
        );

        let (guard, timeout) = result.unwrap();
        assert_eq!(*guard, 0);
        assert!(timeout.timed_out());
    }
}
