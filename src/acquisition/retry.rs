//! Bounded retry with exponential backoff for archive requests.
//!
//! Transient failures (network errors, 5xx, 429) are retried up to
//! `max_attempts` total attempts. Everything else is returned immediately.

use bon::bon;
use log::{debug, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1600);
pub const DEFAULT_MULTIPLIER: f64 = 1.6;
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Implemented by errors that know whether repeating the call may help.
pub trait Retryable {
    fn retry_decision(&self) -> RetryDecision;

    /// Minimum wait requested by the server, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// How many times to try and how long to wait in between.
///
/// The wait before retry `n` (0-based) is `initial_delay * multiplier^n`,
/// capped at `max_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

#[bon]
impl RetryPolicy {
    /// Builds a policy, falling back to the defaults for anything not set.
    ///
    /// `max_attempts` is at least 1 and `multiplier` at least 1.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use paca_climate::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::builder()
    ///     .max_attempts(5)
    ///     .initial_delay(Duration::from_millis(100))
    ///     .multiplier(2.0)
    ///     .build();
    /// assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
    /// ```
    #[builder]
    pub fn new(
        max_attempts: Option<u32>,
        initial_delay: Option<Duration>,
        multiplier: Option<f64>,
        max_delay: Option<Duration>,
    ) -> Self {
        Self {
            max_attempts: max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1),
            initial_delay: initial_delay.unwrap_or(DEFAULT_INITIAL_DELAY),
            multiplier: multiplier.unwrap_or(DEFAULT_MULTIPLIER).max(1.0),
            max_delay: max_delay.unwrap_or(DEFAULT_MAX_DELAY),
        }
    }

    /// A policy that retries immediately, mostly useful against local servers.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::builder()
            .max_attempts(max_attempts)
            .initial_delay(Duration::ZERO)
            .build()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (0 is the wait after the first failure).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let seconds = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = seconds.min(self.max_delay.as_secs_f64());
        if capped.is_finite() && capped >= 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            self.max_delay
        }
    }

    /// Delay that also honours a server-provided minimum wait, still capped at `max_delay`.
    fn delay_honouring(&self, retry: u32, requested: Option<Duration>) -> Duration {
        let scheduled = self.delay_for_retry(retry);
        match requested {
            Some(requested) if requested > scheduled => requested.min(self.max_delay),
            _ => scheduled,
        }
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error, or
    /// the attempts are used up. The closure receives the 1-based attempt number.
    ///
    /// Returns the last error when every attempt failed.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        E: Retryable + Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", label, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if e.retry_decision() == RetryDecision::NoRetry => {
                    debug!("{} failed with non-retryable error: {}", label, e);
                    return Err(e);
                }
                Err(e) if attempt >= self.max_attempts => {
                    warn!(
                        "{} failed after {} attempts, giving up: {}",
                        label, attempt, e
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_honouring(attempt - 1, e.retry_after());
                    warn!(
                        "{} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        label,
                        attempt,
                        self.max_attempts,
                        delay.as_secs_f64(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
