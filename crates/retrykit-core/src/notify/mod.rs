//! Notification sinks: the once-per-call summary of a retry loop.
//!
//! Every call made through the retry engine ends with exactly one
//! [`NotificationSink::notify`], whatever the outcome. The default
//! [`StderrSink`] turns that into a single human-readable line, and stays
//! quiet when no retries were needed.

mod name;
mod sinks;

pub use name::OperationName;
pub use sinks::{SilentSink, StderrSink, TracingSink, format_summary};

/// Receives the summary of one top-level retry call.
///
/// `attempts` is the number of *failed* attempts before the terminal
/// outcome: a call that succeeds first time reports 0; a call that fails
/// after exhausting ten retries reports 10. The engine always calls the
/// sink, even with 0, and leaves it to the sink to stay silent.
///
/// Sinks are shared across concurrent calls and must be `Send + Sync`.
/// Closures of the same shape are sinks:
///
/// ```rust
/// use retrykit_core::notify::{NotificationSink, OperationName};
///
/// let sink = |attempts: u32, operation: &OperationName, succeeded: bool| {
///     println!("{operation}: {attempts} failed attempts, succeeded={succeeded}");
/// };
/// sink.notify(2, &OperationName::new("sync"), true);
/// ```
pub trait NotificationSink: Send + Sync {
    /// Report the outcome of one call.
    fn notify(&self, attempts: u32, operation: &OperationName, succeeded: bool);
}

impl<F> NotificationSink for F
where
    F: Fn(u32, &OperationName, bool) + Send + Sync,
{
    fn notify(&self, attempts: u32, operation: &OperationName, succeeded: bool) {
        self(attempts, operation, succeeded)
    }
}
