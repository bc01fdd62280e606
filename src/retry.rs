//! Retry policy for transient failures.
//!
//! The policy is a pure function of the failed attempt's error, its index and
//! the configured parameters. It holds no state between calls.

use crate::Error;
use rand::Rng;
use std::time::Duration;

/// Decides whether a failed attempt is retried and how long to wait first.
///
/// Each retry waits `base_delay * 2^attempt`, where `attempt` is the 0-based
/// index of the attempt that just failed.
///
/// # Examples
///
/// ```
/// use kgiton::RetryPolicy;
/// use std::time::Duration;
///
/// // Three tries: wait 1s after the first failure, 2s after the second.
/// let policy = RetryPolicy::new(3, Duration::from_secs(1));
///
/// assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
/// assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
/// assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of tries, including the first. Never less than 1.
    pub max_attempts: u32,

    /// Delay after the first failed attempt.
    pub base_delay: Duration,

    /// Upper bound for a single delay. `None` leaves the backoff uncapped.
    pub max_delay: Option<Duration>,

    /// Scale each delay by a random factor between 50% and 100%.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

impl RetryPolicy {
    /// Creates an uncapped policy without jitter.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: None,
            jitter: false,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Returns the backoff after the attempt with the given 0-based index.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt);
        let mut delay = self.base_delay.saturating_mul(multiplier);

        if let Some(max_delay) = self.max_delay {
            delay = delay.min(max_delay);
        }

        if self.jitter {
            let factor = rand::thread_rng().gen_range(0.5..=1.0);
            delay = delay.mul_f64(factor);
        }

        delay
    }

    /// Decides what happens after the attempt with the given 0-based index
    /// failed with `error`.
    ///
    /// Returns `Some(delay)` to retry after `delay`, or `None` when the error
    /// must be returned to the caller.
    pub fn next_delay(&self, error: &Error, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts.max(1) || !error.is_retryable() {
            return None;
        }

        Some(self.delay_for_attempt(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn server_error() -> Error {
        Error::Api {
            message: "Internal error".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            details: None,
        }
    }

    #[test]
    fn test_exponential_delays() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_cap() {
        let policy = RetryPolicy {
            max_delay: Some(Duration::from_millis(250)),
            ..RetryPolicy::new(5, Duration::from_millis(100))
        };

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(250));
        assert_eq!(policy.delay_for_attempt(30), Duration::from_millis(250));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let policy = RetryPolicy {
            jitter: true,
            ..RetryPolicy::new(3, Duration::from_millis(1000))
        };

        for _ in 0..50 {
            let delay = policy.delay_for_attempt(1);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(2000));
        }
    }

    #[test]
    fn test_last_attempt_is_not_retried() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let err = server_error();

        assert_eq!(policy.next_delay(&err, 0), Some(Duration::from_millis(10)));
        assert_eq!(policy.next_delay(&err, 1), Some(Duration::from_millis(20)));
        assert_eq!(policy.next_delay(&err, 2), None);
    }

    #[test]
    fn test_client_errors_are_final() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let err = Error::Validation {
            message: "bad".to_string(),
            details: None,
        };
        assert_eq!(policy.next_delay(&err, 0), None);

        let err = Error::RateLimit {
            message: "slow down".to_string(),
            rate_limit_info: None,
        };
        assert_eq!(policy.next_delay(&err, 0), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.next_delay(&server_error(), 0), None);
    }
}
