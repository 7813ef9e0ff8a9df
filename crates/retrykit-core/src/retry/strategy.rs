//! The retry policy trait.

use std::error::Error;
use std::time::Duration;

/// Decides whether a transient failure should be retried, and after what delay.
///
/// The retry loop calls this only for failures the classifier considered
/// transient. `attempt` is the 1-indexed number of the retry being asked
/// for: after the initial call fails, the policy is asked about attempt 1.
///
/// # Contract
///
/// - `Some(delay)`: retry after waiting `delay` (zero is legal and still
///   counts as a retry)
/// - `None`: the policy is exhausted; the last error becomes the result
///
/// Implementations must be a pure function of `(attempt, last_error)`. No
/// hidden counters: one policy instance is shared by every concurrent call.
///
/// # Examples
///
/// Any closure of the right shape is a policy:
///
/// ```rust
/// use retrykit_core::retry::RetryPolicy;
/// use std::error::Error;
/// use std::time::Duration;
///
/// let policy = |attempt: u32, _err: &(dyn Error + 'static)| {
///     (attempt <= 4).then(|| Duration::from_millis(125) * attempt)
/// };
///
/// let err = std::io::Error::other("busy");
/// assert_eq!(policy.should_retry(2, &err), Some(Duration::from_millis(250)));
/// assert_eq!(policy.should_retry(5, &err), None);
/// ```
pub trait RetryPolicy: Send + Sync {
    /// Returns the delay before retry number `attempt`, or `None` to stop.
    fn should_retry(&self, attempt: u32, last_error: &(dyn Error + 'static)) -> Option<Duration>;
}

impl<F> RetryPolicy for F
where
    F: Fn(u32, &(dyn Error + 'static)) -> Option<Duration> + Send + Sync,
{
    fn should_retry(&self, attempt: u32, last_error: &(dyn Error + 'static)) -> Option<Duration> {
        self(attempt, last_error)
    }
}
