//! Built-in notification sinks.

use super::{NotificationSink, OperationName};

/// Format the summary line for a call, or `None` when no retries happened.
///
/// ```rust
/// use retrykit_core::notify::{OperationName, format_summary};
///
/// let name = OperationName::new("orders::submit");
/// assert_eq!(
///     format_summary(1, &name, true).as_deref(),
///     Some("Needed 1 tries to complete orders::submit")
/// );
/// assert_eq!(
///     format_summary(4, &name, false).as_deref(),
///     Some("Failed after 4 tries orders::submit")
/// );
/// assert_eq!(format_summary(0, &name, true), None);
/// ```
pub fn format_summary(attempts: u32, operation: &OperationName, succeeded: bool) -> Option<String> {
    if attempts == 0 {
        return None;
    }
    Some(if succeeded {
        format!("Needed {} tries to complete {}", attempts, operation)
    } else {
        format!("Failed after {} tries {}", attempts, operation)
    })
}

/// Writes the summary line to standard error. The process-wide default.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, attempts: u32, operation: &OperationName, succeeded: bool) {
        if let Some(line) = format_summary(attempts, operation, succeeded) {
            eprintln!("{}", line);
        }
    }
}

/// Emits the summary line as a `tracing` event.
///
/// Successes after retries are logged at `INFO`, failures at `WARN`, both
/// with `operation`, `attempts`, and `succeeded` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, attempts: u32, operation: &OperationName, succeeded: bool) {
        let Some(line) = format_summary(attempts, operation, succeeded) else {
            return;
        };
        if succeeded {
            tracing::info!(operation = %operation, attempts, succeeded, "{}", line);
        } else {
            tracing::warn!(operation = %operation, attempts, succeeded, "{}", line);
        }
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify(&self, _attempts: u32, _operation: &OperationName, _succeeded: bool) {}
}
