#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry execution engine.
//!
//! `retrykit` runs an operation, classifies any failure as transient or
//! fatal, asks a retry policy whether and how long to wait, and repeats until
//! the operation succeeds, fails fatally, exhausts the policy, or is
//! cancelled. Whatever happens, each call reports exactly one summary to a
//! notification sink.
//!
//! Four call shapes share a single retry loop:
//!
//! - [`RetryExecutor::execute_action`]: synchronous, no result
//! - [`RetryExecutor::execute`]: synchronous, with a result
//! - [`RetryExecutor::execute_action_async`]: asynchronous, no result
//! - [`RetryExecutor::execute_async`]: asynchronous, with a result
//!
//! The strategies themselves (classifiers, policies, sinks) live in
//! `retrykit-core` and are re-exported here.
//!
//! # Examples
//!
//! ```rust
//! use retrykit::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), RetryError<std::io::Error>> {
//! let executor = RetryExecutor::builder()
//!     .policy(LinearBackoff::new(4, Duration::from_millis(10)))
//!     .sink(TracingSink)
//!     .build();
//!
//! let token = CancellationToken::new();
//! let body = executor
//!     .execute_async_with(
//!         || async { Ok::<_, std::io::Error>("payload") },
//!         ExecuteOptions::new().cancel_token(token.clone()).name("feed::fetch"),
//!     )
//!     .await?;
//!
//! assert_eq!(body, "payload");
//! # Ok(())
//! # }
//! ```

mod blocking;
pub mod config;
mod engine;
pub mod executor;

pub use config::{BackoffKind, ConfigError, RetryConfig, SinkKind};
pub use executor::{ExecuteOptions, RetryExecutor, RetryExecutorBuilder};
pub use retrykit_core::error::RetryError;
pub use retrykit_core::{classify, notify, retry};
pub use tokio_util::sync::CancellationToken;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use retrykit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::RetryConfig;
    pub use crate::executor::{ExecuteOptions, RetryExecutor};
    pub use retrykit_core::prelude::*;
    pub use tokio_util::sync::CancellationToken;
}
