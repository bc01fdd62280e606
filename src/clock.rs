//! Time source used for retry backoff and polling.
//!
//! The client never calls `tokio::time` directly. Swapping in another
//! [`Clock`] lets tests drive backoff and poll loops without waiting on the
//! wall clock.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// A monotonic clock that can suspend the current task.
///
/// # Examples
///
/// A clock that never sleeps, useful for tests:
///
/// ```
/// use async_trait::async_trait;
/// use kgiton::clock::Clock;
/// use std::time::{Duration, Instant};
///
/// struct Instantaneous;
///
/// #[async_trait]
/// impl Clock for Instantaneous {
///     fn now(&self) -> Instant {
///         Instant::now()
///     }
///
///     async fn sleep(&self, _duration: Duration) {}
/// }
/// ```
#[async_trait]
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The default clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
