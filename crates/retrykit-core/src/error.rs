//! Terminal errors of a retry call.

/// Result type for retry calls.
pub type Result<T, E> = std::result::Result<T, RetryError<E>>;

/// Why a retry call ended without a result.
///
/// The operation's own error is never re-wrapped into a string: a fatal or
/// exhausted call hands back the exact value the operation returned, so its
/// type, message, and `source()` chain stay inspectable.
///
/// # Examples
///
/// ```rust
/// use retrykit_core::error::RetryError;
/// use std::io;
///
/// let err: RetryError<io::Error> = RetryError::Failed(io::Error::from(io::ErrorKind::TimedOut));
/// assert!(!err.is_cancelled());
/// assert_eq!(err.into_inner().unwrap().kind(), io::ErrorKind::TimedOut);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The operation failed with a fatal error, or the retry policy gave up.
    ///
    /// Carries the last error the operation returned.
    #[error(transparent)]
    Failed(E),

    /// Cancellation was observed at a checkpoint before the call finished.
    #[error("Operation cancelled after {attempts} failed attempts")]
    Cancelled {
        /// Failed attempts counted before cancellation was observed.
        attempts: u32,
        /// The most recent failure, if any attempt had failed.
        #[source]
        last_error: Option<E>,
    },

    /// A blocking call could not build a runtime to drive the retry loop.
    ///
    /// The operation was never attempted.
    #[error("Runtime error: {0}")]
    Runtime(#[source] std::io::Error),
}

impl<E> RetryError<E> {
    /// Returns `true` if the call ended because it was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` if the call ended with the operation's own failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Borrow the operation's last error, if one was recorded.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Cancelled { last_error, .. } => last_error.as_ref(),
            Self::Runtime(_) => None,
        }
    }

    /// Take the operation's last error, if one was recorded.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Cancelled { last_error, .. } => last_error,
            Self::Runtime(_) => None,
        }
    }

    /// Transform the operation error, keeping the outcome kind.
    pub fn map_err<U, O>(self, op: O) -> RetryError<U>
    where
        O: FnOnce(E) -> U,
    {
        match self {
            Self::Failed(err) => RetryError::Failed(op(err)),
            Self::Cancelled {
                attempts,
                last_error,
            } => RetryError::Cancelled {
                attempts,
                last_error: last_error.map(op),
            },
            Self::Runtime(err) => RetryError::Runtime(err),
        }
    }
}

impl<E: PartialEq> PartialEq for RetryError<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Failed(a), Self::Failed(b)) => a == b,
            (
                Self::Cancelled {
                    attempts: a,
                    last_error: ea,
                },
                Self::Cancelled {
                    attempts: b,
                    last_error: eb,
                },
            ) => a == b && ea == eb,
            (Self::Runtime(a), Self::Runtime(b)) => {
                a.kind() == b.kind() && a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}
