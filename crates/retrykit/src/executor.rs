//! The retry executor and its four call shapes.
//!
//! | shape              | method                   |
//! |--------------------|--------------------------|
//! | sync, no result    | [`RetryExecutor::execute_action`]       |
//! | sync, result       | [`RetryExecutor::execute`]              |
//! | async, no result   | [`RetryExecutor::execute_action_async`] |
//! | async, result      | [`RetryExecutor::execute_async`]        |
//!
//! Each has a `*_with` variant taking [`ExecuteOptions`] (cancellation
//! token, per-call sink, explicit operation name). All of them run the same
//! retry loop.

use crate::blocking;
use crate::engine::{self, CallContext};
use retrykit_core::classify::{AllExceptApplicationErrors, FailureClassifier};
use retrykit_core::error::{self, RetryError};
use retrykit_core::notify::{NotificationSink, OperationName, StderrSink};
use retrykit_core::retry::{LinearBackoff, RetryPolicy};
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs operations with retries.
///
/// Holds the classifier, policy, and sink shared by every call. Cloning is
/// cheap and clones share the same strategies. Calls never share any other
/// state, so one executor can serve any number of concurrent calls.
///
/// # Examples
///
/// ```rust
/// use retrykit::RetryExecutor;
/// use retrykit::retry::LinearBackoff;
/// use std::time::Duration;
///
/// let executor = RetryExecutor::builder()
///     .policy(LinearBackoff::new(3, Duration::from_millis(1)))
///     .build();
///
/// let mut calls = 0;
/// let value = executor.execute(|| {
///     calls += 1;
///     if calls < 2 {
///         Err(std::io::Error::other("not yet"))
///     } else {
///         Ok(calls)
///     }
/// })?;
///
/// assert_eq!(value, 2);
/// # Ok::<(), retrykit::RetryError<std::io::Error>>(())
/// ```
#[derive(Clone)]
pub struct RetryExecutor {
    classifier: Arc<dyn FailureClassifier>,
    policy: Arc<dyn RetryPolicy>,
    sink: Arc<dyn NotificationSink>,
}

impl fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor").finish_non_exhaustive()
    }
}

impl Default for RetryExecutor {
    /// Linear backoff (10 retries, 1s unit), every error transient except
    /// application errors, summary lines on stderr.
    fn default() -> Self {
        RetryExecutorBuilder::default().build()
    }
}

impl RetryExecutor {
    /// Create an executor with the default strategies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuring the strategies.
    pub fn builder() -> RetryExecutorBuilder {
        RetryExecutorBuilder::default()
    }

    /// The process-wide executor with default strategies.
    pub fn global() -> &'static RetryExecutor {
        static GLOBAL: OnceLock<RetryExecutor> = OnceLock::new();
        GLOBAL.get_or_init(RetryExecutor::default)
    }

    /// Run a synchronous operation with no result.
    ///
    /// Blocks the calling thread, including while waiting between retries.
    pub fn execute_action<E, F>(&self, operation: F) -> error::Result<(), E>
    where
        F: FnMut() -> Result<(), E> + Send,
        E: Error + Send + 'static,
    {
        self.execute_with(operation, ExecuteOptions::default())
    }

    /// Run a synchronous operation with no result, with per-call options.
    pub fn execute_action_with<E, F>(
        &self,
        operation: F,
        options: impl Into<ExecuteOptions>,
    ) -> error::Result<(), E>
    where
        F: FnMut() -> Result<(), E> + Send,
        E: Error + Send + 'static,
    {
        self.execute_with(operation, options)
    }

    /// Run a synchronous operation and return its result.
    ///
    /// The retry loop is the async one, driven to completion while this
    /// thread waits. Inside a current-thread tokio runtime the loop runs on a
    /// helper thread, so the operation must be `Send`.
    pub fn execute<T, E, F>(&self, operation: F) -> error::Result<T, E>
    where
        F: FnMut() -> Result<T, E> + Send,
        T: Send,
        E: Error + Send + 'static,
    {
        self.execute_with(operation, ExecuteOptions::default())
    }

    /// Run a synchronous operation and return its result, with per-call options.
    pub fn execute_with<T, E, F>(
        &self,
        mut operation: F,
        options: impl Into<ExecuteOptions>,
    ) -> error::Result<T, E>
    where
        F: FnMut() -> Result<T, E> + Send,
        T: Send,
        E: Error + Send + 'static,
    {
        let call = self.prepare(&operation, options.into());
        let looped = engine::run(call.context(self), || std::future::ready(operation()));

        match blocking::block_on(looped) {
            Ok(result) => result,
            Err(err) => {
                // No runtime could be built, but the call still gets its one notification
                call.sink(self).notify(0, &call.name, false);
                Err(RetryError::Runtime(err))
            }
        }
    }

    /// Run an asynchronous operation with no result.
    ///
    /// Requires a tokio runtime with timers enabled.
    pub async fn execute_action_async<E, F, Fut>(&self, operation: F) -> error::Result<(), E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Error + 'static,
    {
        self.execute_async_with(operation, ExecuteOptions::default())
            .await
    }

    /// Run an asynchronous operation with no result, with per-call options.
    pub async fn execute_action_async_with<E, F, Fut>(
        &self,
        operation: F,
        options: impl Into<ExecuteOptions>,
    ) -> error::Result<(), E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Error + 'static,
    {
        self.execute_async_with(operation, options).await
    }

    /// Run an asynchronous operation and return its result.
    ///
    /// Requires a tokio runtime with timers enabled.
    pub async fn execute_async<T, E, F, Fut>(&self, operation: F) -> error::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        self.execute_async_with(operation, ExecuteOptions::default())
            .await
    }

    /// Run an asynchronous operation and return its result, with per-call options.
    ///
    /// Cancelling the token while an attempt is suspended drops that
    /// attempt's future and ends the call with [`RetryError::Cancelled`].
    pub async fn execute_async_with<T, E, F, Fut>(
        &self,
        operation: F,
        options: impl Into<ExecuteOptions>,
    ) -> error::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        let call = self.prepare(&operation, options.into());
        engine::run(call.context(self), operation).await
    }

    fn prepare<F>(&self, operation: &F, options: ExecuteOptions) -> PreparedCall {
        PreparedCall {
            name: options.name.unwrap_or_else(|| OperationName::of(operation)),
            cancel: options.cancel.unwrap_or_default(),
            sink: options.sink,
        }
    }
}

/// Per-call state resolved from `ExecuteOptions`.
struct PreparedCall {
    name: OperationName,
    cancel: CancellationToken,
    sink: Option<Arc<dyn NotificationSink>>,
}

impl PreparedCall {
    fn context<'a>(&'a self, executor: &'a RetryExecutor) -> CallContext<'a> {
        CallContext {
            classifier: executor.classifier.as_ref(),
            policy: executor.policy.as_ref(),
            sink: self.sink(executor),
            cancel: &self.cancel,
            name: &self.name,
        }
    }

    fn sink<'a>(&'a self, executor: &'a RetryExecutor) -> &'a dyn NotificationSink {
        self.sink.as_deref().unwrap_or(executor.sink.as_ref())
    }
}

/// Per-call options: cancellation, sink override, and operation name.
///
/// A bare `CancellationToken` converts into options, so
/// `executor.execute_with(op, token.clone())` works directly.
///
/// ```rust
/// use retrykit::ExecuteOptions;
/// use retrykit::CancellationToken;
/// use retrykit::notify::SilentSink;
///
/// let token = CancellationToken::new();
/// let options = ExecuteOptions::new()
///     .cancel_token(token.clone())
///     .sink(SilentSink)
///     .name("inventory::reserve");
/// # let _ = options;
/// ```
#[derive(Clone, Default)]
pub struct ExecuteOptions {
    cancel: Option<CancellationToken>,
    sink: Option<Arc<dyn NotificationSink>>,
    name: Option<OperationName>,
}

impl ExecuteOptions {
    /// Options with no cancellation, the executor's sink, and an introspected name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe this token at every cancellation checkpoint.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Notify this sink instead of the executor's.
    pub fn sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Notify a shared sink instead of the executor's.
    pub fn shared_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Label the operation in notifications instead of introspecting it.
    pub fn name(mut self, name: impl Into<OperationName>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Debug for ExecuteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteOptions")
            .field("cancel", &self.cancel)
            .field("sink", &self.sink.as_ref().map(|_| "custom"))
            .field("name", &self.name)
            .finish()
    }
}

impl From<CancellationToken> for ExecuteOptions {
    fn from(token: CancellationToken) -> Self {
        Self::new().cancel_token(token)
    }
}

impl From<&CancellationToken> for ExecuteOptions {
    fn from(token: &CancellationToken) -> Self {
        Self::new().cancel_token(token.clone())
    }
}

/// Builder for `RetryExecutor`.
///
/// Unset strategies fall back to the defaults: [`AllExceptApplicationErrors`],
/// [`LinearBackoff::default`], and [`StderrSink`].
///
/// ```rust
/// use retrykit::RetryExecutor;
/// use retrykit::notify::TracingSink;
/// use std::time::Duration;
///
/// let executor = RetryExecutor::builder()
///     .transient_if(|err| !err.to_string().contains("forbidden"))
///     .policy_fn(|attempt, _err| (attempt <= 4).then(|| Duration::from_millis(125) * attempt))
///     .sink(TracingSink)
///     .build();
/// # let _ = executor;
/// ```
#[derive(Default)]
pub struct RetryExecutorBuilder {
    classifier: Option<Arc<dyn FailureClassifier>>,
    policy: Option<Arc<dyn RetryPolicy>>,
    sink: Option<Arc<dyn NotificationSink>>,
}

impl RetryExecutorBuilder {
    /// Set the failure classifier.
    pub fn classifier(mut self, classifier: impl FailureClassifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    /// Classify failures with a predicate: `true` means transient.
    pub fn transient_if<P>(self, predicate: P) -> Self
    where
        P: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        self.classifier(predicate)
    }

    /// Set the retry policy.
    pub fn policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    /// Decide retries with a function of `(attempt, last_error)`.
    pub fn policy_fn<P>(self, policy: P) -> Self
    where
        P: Fn(u32, &(dyn Error + 'static)) -> Option<Duration> + Send + Sync + 'static,
    {
        self.policy(policy)
    }

    /// Set the notification sink.
    pub fn sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Report outcomes to a function of `(attempts, operation, succeeded)`.
    pub fn sink_fn<S>(self, sink: S) -> Self
    where
        S: Fn(u32, &OperationName, bool) + Send + Sync + 'static,
    {
        self.sink(sink)
    }

    /// Build the executor, using defaults for any unset strategy.
    pub fn build(self) -> RetryExecutor {
        RetryExecutor {
            classifier: self
                .classifier
                .unwrap_or_else(|| Arc::new(AllExceptApplicationErrors)),
            policy: self
                .policy
                .unwrap_or_else(|| Arc::new(LinearBackoff::default())),
            sink: self.sink.unwrap_or_else(|| Arc::new(StderrSink)),
        }
    }
}
