#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core strategies for the retrykit execution engine.
//!
//! The retry loop in `retrykit` is driven entirely by three injected
//! strategies, all defined here:
//!
//! - **Failure classification** via [`FailureClassifier`](classify::FailureClassifier)
//!   - Default: everything is transient except an [`ApplicationError`](classify::ApplicationError)
//! - **Retry policies** via [`RetryPolicy`](retry::RetryPolicy)
//!   - Linear backoff (default: 10 retries, `attempt * 1s`)
//!   - Exponential backoff with jitter
//! - **Notification sinks** via [`NotificationSink`](notify::NotificationSink)
//!   - One summary line per call on stderr, through `tracing`, or nowhere
//!
//! The terminal error type shared by every call shape lives in [`error`].
//!
//! Every strategy is a plain `Send + Sync` value with no per-call state, so a
//! single instance can be shared by any number of concurrent calls. Closures
//! of the right shape implement the traits directly.
//!
//! # Examples
//!
//! ```rust
//! use retrykit_core::prelude::*;
//! use std::time::Duration;
//!
//! let policy = LinearBackoff::new(4, Duration::from_millis(125));
//! let err = std::io::Error::other("timeout");
//!
//! assert_eq!(policy.should_retry(1, &err), Some(Duration::from_millis(125)));
//! assert_eq!(policy.should_retry(5, &err), None);
//! assert!(AllExceptApplicationErrors.is_transient(&err));
//! ```

pub mod classify;
pub mod error;
pub mod notify;
pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use retrykit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::classify::{
        AllExceptApplicationErrors, AlwaysTransient, ApplicationError, FailureClassifier,
        NeverTransient,
    };
    pub use crate::error::RetryError;
    pub use crate::notify::{NotificationSink, OperationName, SilentSink, StderrSink, TracingSink};
    pub use crate::retry::{ExponentialBackoff, ExponentialBackoffBuilder, LinearBackoff, RetryPolicy};
}
