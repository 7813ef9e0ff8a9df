//! Shared helpers for retrykit integration tests.

#![allow(dead_code)]

use retrykit::classify::ApplicationError;
use retrykit::notify::{NotificationSink, OperationName};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub attempts: u32,
    pub operation: String,
    pub succeeded: bool,
}

/// Sink that keeps every notification, plus the line the default sink would print.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Notification> {
        self.calls.lock().unwrap().clone()
    }

    pub fn single(&self) -> Notification {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one notification, got {:?}", calls);
        calls[0].clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|n| {
                retrykit::notify::format_summary(
                    n.attempts,
                    &OperationName::new(n.operation),
                    n.succeeded,
                )
            })
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, attempts: u32, operation: &OperationName, succeeded: bool) {
        self.calls.lock().unwrap().push(Notification {
            attempts,
            operation: operation.to_string(),
            succeeded,
        });
    }
}

/// Failure returned by scripted operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Transient under the default classifier
    #[error("service unavailable (attempt {0})")]
    Unavailable(u32),
    /// Fatal under the default classifier
    #[error("request rejected")]
    Rejected(#[source] ApplicationError),
}

impl ServiceError {
    pub fn rejected(message: &str) -> Self {
        Self::Rejected(ApplicationError::new(message))
    }
}

/// Counts attempts across clones.
#[derive(Debug, Clone, Default)]
pub struct Attempts(Arc<AtomicU32>);

impl Attempts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt, returning its 1-indexed number.
    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}
