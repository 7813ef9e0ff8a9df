//! Retry policies: whether to try again, and how long to wait first.
//!
//! # Key Types
//!
//! - [`RetryPolicy`] - Core trait for retry policies
//! - [`LinearBackoff`] - `attempt * unit` delays, the process-wide default
//! - [`ExponentialBackoff`] - Exponential backoff with jitter
//!
//! # Examples
//!
//! ```rust
//! use retrykit_core::retry::{ExponentialBackoff, LinearBackoff, RetryPolicy};
//! use std::time::Duration;
//!
//! let err = std::io::Error::other("connection reset");
//!
//! // 1s, 2s, 3s, ... then give up after the tenth retry
//! let linear = LinearBackoff::default();
//! assert_eq!(linear.should_retry(3, &err), Some(Duration::from_secs(3)));
//! assert_eq!(linear.should_retry(11, &err), None);
//!
//! let exponential = ExponentialBackoff::builder()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .jitter(0.0)
//!     .build();
//! assert_eq!(exponential.should_retry(2, &err), Some(Duration::from_millis(200)));
//! ```

mod exponential;
mod linear;
mod strategy;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use linear::LinearBackoff;
pub use strategy::RetryPolicy;
