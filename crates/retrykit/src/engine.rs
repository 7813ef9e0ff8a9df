//! The retry loop shared by every call shape.
//!
//! There is exactly one implementation of the attempt / classify / back off
//! cycle, written against futures. Synchronous adapters feed it ready
//! futures and drive it to completion on the calling thread.

use retrykit_core::classify::FailureClassifier;
use retrykit_core::error::RetryError;
use retrykit_core::notify::{NotificationSink, OperationName};
use retrykit_core::retry::RetryPolicy;
use std::error::Error;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Strategies and per-call state borrowed for one top-level call.
pub(crate) struct CallContext<'a> {
    pub(crate) classifier: &'a dyn FailureClassifier,
    pub(crate) policy: &'a dyn RetryPolicy,
    pub(crate) sink: &'a dyn NotificationSink,
    pub(crate) cancel: &'a CancellationToken,
    pub(crate) name: &'a OperationName,
}

/// Sends the call summary to the sink when dropped.
///
/// Created once at loop entry, so every way out of the loop (return, panic
/// in a strategy, or the caller dropping the future) notifies exactly once.
struct NotifyOnExit<'a> {
    sink: &'a dyn NotificationSink,
    name: &'a OperationName,
    attempts: u32,
    succeeded: bool,
}

impl<'a> NotifyOnExit<'a> {
    fn new(sink: &'a dyn NotificationSink, name: &'a OperationName) -> Self {
        Self {
            sink,
            name,
            attempts: 0,
            succeeded: false,
        }
    }
}

impl Drop for NotifyOnExit<'_> {
    fn drop(&mut self) {
        self.sink.notify(self.attempts, self.name, self.succeeded);
    }
}

/// Where a cancellation was observed.
#[derive(Debug, Clone, Copy)]
enum Checkpoint {
    DuringAttempt,
    AfterFailure,
    DuringDelay,
    AfterDelay,
}

/// Run `operation` until it succeeds, fails fatally, exhausts the policy, or
/// is cancelled.
///
/// Attempts run strictly one after another. The attempt counter counts
/// failed attempts that were followed by a retry decision; it is what the
/// sink receives.
pub(crate) async fn run<T, E, F, Fut>(ctx: CallContext<'_>, mut operation: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + 'static,
{
    let mut outcome = NotifyOnExit::new(ctx.sink, ctx.name);
    let mut last_error: Option<E> = None;

    loop {
        // The operation is polled first, so one that completes without
        // suspending always finishes even if the token is already set.
        let result = tokio::select! {
            biased;
            result = operation() => result,
            () = ctx.cancel.cancelled() => {
                return Err(cancelled(&ctx, Checkpoint::DuringAttempt, outcome.attempts, last_error));
            }
        };

        let err = match result {
            Ok(value) => {
                outcome.succeeded = true;
                return Ok(value);
            }
            Err(err) => err,
        };

        if !ctx.classifier.is_transient(&err) {
            debug!(
                operation = %ctx.name,
                attempts = outcome.attempts,
                error = %err,
                "Non-transient failure, not retrying"
            );
            return Err(RetryError::Failed(err));
        }

        let Some(delay) = ctx.policy.should_retry(outcome.attempts + 1, &err) else {
            debug!(
                operation = %ctx.name,
                attempts = outcome.attempts,
                error = %err,
                "Retry policy exhausted"
            );
            return Err(RetryError::Failed(err));
        };

        outcome.attempts += 1;
        debug!(
            operation = %ctx.name,
            attempt = outcome.attempts,
            delay = ?delay,
            error = %err,
            "Transient failure, retrying"
        );

        if ctx.cancel.is_cancelled() {
            return Err(cancelled(&ctx, Checkpoint::AfterFailure, outcome.attempts, Some(err)));
        }

        if !wait(delay, ctx.cancel).await {
            return Err(cancelled(&ctx, Checkpoint::DuringDelay, outcome.attempts, Some(err)));
        }

        if ctx.cancel.is_cancelled() {
            return Err(cancelled(&ctx, Checkpoint::AfterDelay, outcome.attempts, Some(err)));
        }

        last_error = Some(err);
    }
}

/// Sleep for `delay` unless cancelled first. Returns `false` on cancellation.
async fn wait(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}

fn cancelled<E>(
    ctx: &CallContext<'_>,
    checkpoint: Checkpoint,
    attempts: u32,
    last_error: Option<E>,
) -> RetryError<E> {
    debug!(
        operation = %ctx.name,
        attempts,
        checkpoint = ?checkpoint,
        "Operation cancelled"
    );
    RetryError::Cancelled {
        attempts,
        last_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrykit_core::classify::{AllExceptApplicationErrors, ApplicationError};
    use retrykit_core::notify::SilentSink;
    use retrykit_core::retry::LinearBackoff;
    use std::io;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(u32, bool)>>,
    }

    impl NotificationSink for Recorder {
        fn notify(&self, attempts: u32, _operation: &OperationName, succeeded: bool) {
            self.calls.lock().unwrap().push((attempts, succeeded));
        }
    }

    fn context<'a>(
        policy: &'a LinearBackoff,
        sink: &'a dyn NotificationSink,
        cancel: &'a CancellationToken,
        name: &'a OperationName,
    ) -> CallContext<'a> {
        CallContext {
            classifier: &AllExceptApplicationErrors,
            policy,
            sink,
            cancel,
            name,
        }
    }

    #[tokio::test]
    async fn test_success_reports_zero_attempts() {
        let policy = LinearBackoff::new(3, Duration::ZERO);
        let sink = Recorder::default();
        let cancel = CancellationToken::new();
        let name = OperationName::new("ok");

        let result: Result<u8, RetryError<io::Error>> =
            run(context(&policy, &sink, &cancel, &name), || async { Ok(7) }).await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(*sink.calls.lock().unwrap(), vec![(0, true)]);
    }

    #[tokio::test]
    async fn test_exhaustion_counts_retries_only() {
        let policy = LinearBackoff::new(3, Duration::ZERO);
        let sink = Recorder::default();
        let cancel = CancellationToken::new();
        let name = OperationName::new("flaky");
        let mut calls = 0;

        let result: Result<(), _> = run(context(&policy, &sink, &cancel, &name), || {
            calls += 1;
            std::future::ready(Err(io::Error::other("still down")))
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "still down");
        assert_eq!(calls, 4);
        assert_eq!(*sink.calls.lock().unwrap(), vec![(3, false)]);
    }

    #[tokio::test]
    async fn test_fatal_error_skips_policy() {
        let sink = Recorder::default();
        let cancel = CancellationToken::new();
        let name = OperationName::new("reject");
        let policy_calls = Mutex::new(0);
        let policy = |_attempt: u32, _err: &(dyn Error + 'static)| {
            *policy_calls.lock().unwrap() += 1;
            Some(Duration::ZERO)
        };
        let ctx = CallContext {
            classifier: &AllExceptApplicationErrors,
            policy: &policy,
            sink: &sink,
            cancel: &cancel,
            name: &name,
        };

        let result: Result<(), _> =
            run(ctx, || async { Err(ApplicationError::new("invalid account")) }).await;

        assert!(result.unwrap_err().is_failed());
        assert_eq!(*policy_calls.lock().unwrap(), 0);
        assert_eq!(*sink.calls.lock().unwrap(), vec![(0, false)]);
    }

    #[tokio::test]
    async fn test_dropping_the_call_still_notifies() {
        let policy = LinearBackoff::new(3, Duration::from_secs(3600));
        let sink = Recorder::default();
        let cancel = CancellationToken::new();
        let name = OperationName::new("abandoned");

        {
            let call = run(context(&policy, &sink, &cancel, &name), || async {
                Err::<(), _>(io::Error::other("slow"))
            });
            let _ = tokio::time::timeout(Duration::from_millis(20), call).await;
        }

        assert_eq!(*sink.calls.lock().unwrap(), vec![(1, false)]);
    }

    #[tokio::test]
    async fn test_wait_zero_delay_checks_token() {
        let cancel = CancellationToken::new();
        assert!(wait(Duration::ZERO, &cancel).await);

        cancel.cancel();
        assert!(!wait(Duration::ZERO, &cancel).await);
        assert!(!wait(Duration::from_secs(60), &cancel).await);
    }

    #[tokio::test]
    async fn test_silent_sink_is_accepted() {
        let policy = LinearBackoff::new(1, Duration::ZERO);
        let cancel = CancellationToken::new();
        let name = OperationName::new("quiet");

        let result: Result<(), RetryError<io::Error>> =
            run(context(&policy, &SilentSink, &cancel, &name), || async { Ok(()) }).await;

        assert!(result.is_ok());
    }
}
