//! Exponential backoff with jitter.

use super::strategy::RetryPolicy;
use std::error::Error;
use std::time::Duration;

/// Exponential backoff policy with configurable jitter.
///
/// Delays between retries grow exponentially: `initial_delay * multiplier^(n-1)`
/// for retry `n`, capped at `max_delay`. Jitter spreads concurrent callers out.
///
/// # Formula
///
/// For retry `n` (1-indexed):
/// ```text
/// base_delay = initial_delay * (multiplier ^ (n - 1))
/// jittered   = base_delay + base_delay * jitter * random(-1.0, +1.0)
/// delay      = min(jittered, max_delay)
/// ```
///
/// # Examples
///
/// ```rust
/// use retrykit_core::retry::{ExponentialBackoff, RetryPolicy};
/// use std::time::Duration;
///
/// // Defaults: max_retries=3, initial=100ms, max=60s, multiplier=2.0, jitter=0.1
/// let backoff = ExponentialBackoff::default();
/// assert_eq!(backoff.max_retries(), 3);
///
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .multiplier(2.0)
///     .jitter(0.0)
///     .build();
///
/// let err = std::io::Error::other("unavailable");
/// assert_eq!(backoff.should_retry(3, &err), Some(Duration::from_millis(400)));
/// assert_eq!(backoff.should_retry(6, &err), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Maximum number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt` (1-indexed), ignoring the limit.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let base_delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);

        let jittered = if self.jitter > 0.0 {
            // Range is [base * (1 - jitter), base * (1 + jitter)]
            let jitter_amount = base_delay * self.jitter * (rand::random::<f64>() - 0.5) * 2.0;
            base_delay + jitter_amount
        } else {
            base_delay
        };

        // `min` also absorbs an infinite base delay
        let capped = jittered.min(self.max_delay.as_secs_f64()).max(0.0);
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay)
    }
}

impl Default for ExponentialBackoff {
    /// Defaults:
    /// - `max_retries`: 3
    /// - `initial_delay`: 100ms
    /// - `max_delay`: 60s
    /// - `multiplier`: 2.0 (doubles each time)
    /// - `jitter`: 0.1 (10% randomization)
    fn default() -> Self {
        ExponentialBackoffBuilder::default().build()
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn should_retry(&self, attempt: u32, _last_error: &(dyn Error + 'static)) -> Option<Duration> {
        (attempt <= self.max_retries).then(|| self.delay_for(attempt))
    }
}

/// Builder for configuring `ExponentialBackoff`.
///
/// ```rust
/// use retrykit_core::retry::ExponentialBackoff;
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .multiplier(2.0)
///     .jitter(0.1)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    max_retries: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Set the maximum number of retry attempts.
    ///
    /// Default: 3
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the delay before the first retry.
    ///
    /// Default: 100ms
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the maximum delay between retries.
    ///
    /// Default: 60s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier.
    ///
    /// Values below 1.0 are raised to 1.0 so delays never shrink.
    ///
    /// Default: 2.0
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier.max(1.0));
        self
    }

    /// Set the jitter factor (0.0 to 1.0).
    ///
    /// A jitter of 0.1 means the delay can vary by ±10%.
    ///
    /// Default: 0.1
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Build the `ExponentialBackoff` instance.
    ///
    /// Uses default values for any unset parameters.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            max_retries: self.max_retries.unwrap_or(3),
            initial_delay: self.initial_delay.unwrap_or(Duration::from_millis(100)),
            max_delay: self.max_delay.unwrap_or(Duration::from_secs(60)),
            multiplier: self.multiplier.unwrap_or(2.0),
            jitter: self.jitter.unwrap_or(0.1),
        }
    }
}
