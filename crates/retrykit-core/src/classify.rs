//! Failure classification: deciding whether an error is worth retrying.
//!
//! A [`FailureClassifier`] is a pure predicate over an error. The retry loop
//! consults it after every failed attempt; a `false` answer ends the call
//! immediately without asking the retry policy.

use std::error::Error;

/// Decides whether a failure is transient (retry it) or fatal (give up now).
///
/// Implementations must be pure: the same error always yields the same
/// answer, and no state is kept between calls. A single classifier is
/// shared by every concurrent call made through one executor.
///
/// Any `Fn(&(dyn Error + 'static)) -> bool` closure is a classifier:
///
/// ```rust
/// use retrykit_core::classify::FailureClassifier;
/// use std::error::Error;
///
/// let timeouts_only = |err: &(dyn Error + 'static)| err.to_string().contains("timed out");
///
/// assert!(timeouts_only.is_transient(&std::io::Error::other("read timed out")));
/// assert!(!timeouts_only.is_transient(&std::io::Error::other("bad request")));
/// ```
pub trait FailureClassifier: Send + Sync {
    /// Returns `true` if the error is transient and the operation may be retried.
    fn is_transient(&self, error: &(dyn Error + 'static)) -> bool;
}

impl<F> FailureClassifier for F
where
    F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync,
{
    fn is_transient(&self, error: &(dyn Error + 'static)) -> bool {
        self(error)
    }
}

/// A business-rule failure that must never be retried.
///
/// Return this (or an error whose `source()` chain contains it) from an
/// operation to tell [`AllExceptApplicationErrors`] that the failure is not
/// a fault: retrying would only repeat the same rejection.
///
/// ```rust
/// use retrykit_core::classify::{AllExceptApplicationErrors, ApplicationError, FailureClassifier};
///
/// let rejected = ApplicationError::new("insufficient funds");
/// assert!(!AllExceptApplicationErrors.is_transient(&rejected));
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApplicationError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl ApplicationError {
    /// Create an application error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an application error that wraps an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if `error`, or anything in its `source()` chain, is an
    /// `ApplicationError`.
    pub fn is_in_chain(error: &(dyn Error + 'static)) -> bool {
        let mut current = Some(error);
        while let Some(err) = current {
            if err.is::<ApplicationError>() {
                return true;
            }
            current = err.source();
        }
        false
    }
}

/// The default classifier: every failure is transient except application errors.
///
/// The check walks the whole `source()` chain, so an application error
/// wrapped by the caller's own error enum (as a `#[source]`) is still
/// recognised.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllExceptApplicationErrors;

impl FailureClassifier for AllExceptApplicationErrors {
    fn is_transient(&self, error: &(dyn Error + 'static)) -> bool {
        !ApplicationError::is_in_chain(error)
    }
}

/// Treats every failure as transient. The policy alone decides when to stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTransient;

impl FailureClassifier for AlwaysTransient {
    fn is_transient(&self, _error: &(dyn Error + 'static)) -> bool {
        true
    }
}

/// Treats every failure as fatal, turning the retry loop into a single attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverTransient;

impl FailureClassifier for NeverTransient {
    fn is_transient(&self, _error: &(dyn Error + 'static)) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    enum OrderError {
        #[error("rejected: {0}")]
        Rejected(#[source] ApplicationError),
        #[error("storage unavailable")]
        Storage(#[source] io::Error),
    }

    #[test]
    fn test_plain_errors_are_transient() {
        let err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        assert!(AllExceptApplicationErrors.is_transient(&err));
    }

    #[test]
    fn test_application_error_is_fatal() {
        let err = ApplicationError::new("duplicate order");
        assert!(!AllExceptApplicationErrors.is_transient(&err));
    }

    #[test]
    fn test_application_error_found_in_source_chain() {
        let rejected = OrderError::Rejected(ApplicationError::new("limit exceeded"));
        let storage = OrderError::Storage(io::Error::other("disk busy"));

        assert!(!AllExceptApplicationErrors.is_transient(&rejected));
        assert!(AllExceptApplicationErrors.is_transient(&storage));
    }

    #[test]
    fn test_application_error_keeps_its_cause() {
        let err = ApplicationError::with_source("invalid input", io::Error::other("parse failed"));

        assert_eq!(err.message(), "invalid input");
        assert_eq!(err.to_string(), "invalid input");
        let cause = err.source().expect("cause should be preserved");
        assert_eq!(cause.to_string(), "parse failed");
    }

    #[test]
    fn test_fixed_classifiers() {
        let err = ApplicationError::new("nope");
        assert!(AlwaysTransient.is_transient(&err));
        assert!(!NeverTransient.is_transient(&io::Error::other("boom")));
    }

    #[test]
    fn test_closure_classifier() {
        let only_timeouts = |err: &(dyn Error + 'static)| {
            err.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::TimedOut)
        };

        assert!(only_timeouts.is_transient(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!only_timeouts.is_transient(&io::Error::from(io::ErrorKind::NotFound)));
    }

    proptest! {
        #[test]
        fn prop_classification_is_idempotent(message in ".*", application in any::<bool>()) {
            let err: Box<dyn Error + Send + Sync> = if application {
                Box::new(ApplicationError::new(message))
            } else {
                Box::new(io::Error::other(message))
            };
            let err: &(dyn Error + 'static) = err.as_ref();

            let first = AllExceptApplicationErrors.is_transient(err);
            for _ in 0..5 {
                prop_assert_eq!(AllExceptApplicationErrors.is_transient(err), first);
            }
            prop_assert_eq!(first, !application);
        }
    }
}
