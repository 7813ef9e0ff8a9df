//! Linear backoff, the default retry policy.

use super::strategy::RetryPolicy;
use std::error::Error;
use std::time::Duration;

/// Linear backoff: retry number `n` waits `n * unit`, up to `max_retries` retries.
///
/// With the defaults (10 retries, 1 second unit) the delays are 1s, 2s, ...,
/// 10s, for a worst-case total wait of 55 seconds before giving up.
///
/// # Examples
///
/// ```rust
/// use retrykit_core::retry::{LinearBackoff, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = LinearBackoff::new(4, Duration::from_millis(125));
/// let err = std::io::Error::other("busy");
///
/// assert_eq!(policy.should_retry(1, &err), Some(Duration::from_millis(125)));
/// assert_eq!(policy.should_retry(4, &err), Some(Duration::from_millis(500)));
/// assert_eq!(policy.should_retry(5, &err), None);
/// assert_eq!(policy.total_delay(), Duration::from_millis(1250));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoff {
    max_retries: u32,
    unit: Duration,
}

impl LinearBackoff {
    /// Default number of retries after the initial attempt.
    pub const DEFAULT_MAX_RETRIES: u32 = 10;

    /// Default delay unit.
    pub const DEFAULT_UNIT: Duration = Duration::from_secs(1);

    /// Create a linear backoff with the given retry limit and delay unit.
    pub const fn new(max_retries: u32, unit: Duration) -> Self {
        Self { max_retries, unit }
    }

    /// Maximum number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// The delay unit multiplied by the attempt number.
    pub fn unit(&self) -> Duration {
        self.unit
    }

    /// Delay before retry number `attempt` (1-indexed), ignoring the limit.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.unit.saturating_mul(attempt)
    }

    /// Worst-case cumulative wait if every retry is used.
    pub fn total_delay(&self) -> Duration {
        (1..=self.max_retries).fold(Duration::ZERO, |total, attempt| {
            total.saturating_add(self.delay_for(attempt))
        })
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_UNIT)
    }
}

impl RetryPolicy for LinearBackoff {
    fn should_retry(&self, attempt: u32, _last_error: &(dyn Error + 'static)) -> Option<Duration> {
        (attempt <= self.max_retries).then(|| self.delay_for(attempt))
    }
}
