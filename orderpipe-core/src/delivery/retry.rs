//! Retry budget and linear backoff.

use std::time::Duration;

/// Bounded retry policy with a delay that grows linearly with the attempt index.
///
/// Attempt indices are zero-based: the first request is attempt 0, and a
/// failure at attempt `n` is followed by a sleep of `backoff_unit * (n + 1)`
/// as long as `n < budget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first, per order, per pass.
    pub budget: u32,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(budget: u32, backoff_unit: Duration) -> Self {
        Self {
            budget,
            backoff_unit,
        }
    }

    /// Whether a failure at `attempt` may be followed by another try.
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.budget
    }

    /// Delay to wait after a failure at `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Blocking delay between attempts.
pub trait Sleeper {
    fn sleep(&self, delay: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, delay: Duration) {
        (**self).sleep(delay)
    }
}
