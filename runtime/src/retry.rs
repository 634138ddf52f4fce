//! Retry logic with exponential backoff for handling transient failures.
//!
//! This module provides a retry loop for operations that may fail due to transient
//! errors (network issues, temporary service unavailability, etc.). Callers decide
//! which errors are worth retrying; everything else fails immediately.
//!
//! # Example
//!
//! ```rust
//! use special_offers_runtime::retry::{RetryPolicy, retry_with_predicate};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::builder()
//!     .max_retries(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .multiplier(2.0)
//!     .build();
//!
//! let result = retry_with_predicate(
//!     &policy,
//!     &CancellationToken::new(),
//!     || async { Ok::<_, String>(42) },
//!     |err: &String| err.contains("transient"),
//! )
//! .await?;
//! assert_eq!(result, 42);
//! # Ok(())
//! # }
//! ```

use crate::metrics::RetryMetrics;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Retry policy configuration for exponential backoff.
///
/// # Default Values
///
/// - `max_retries`: 3 (four attempts in total)
/// - `initial_delay`: 100ms
/// - `max_delay`: 30 seconds
/// - `multiplier`: 2.0 (delay doubles each retry)
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first one
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a new policy builder.
    #[must_use]
    pub const fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder {
            max_retries: None,
            initial_delay: None,
            max_delay: None,
            multiplier: None,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total number of attempts this policy allows.
    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }

    /// Calculate the delay before retry number `attempt` (counted from 0).
    ///
    /// Uses exponential backoff: `initial_delay * multiplier ^ attempt`,
    /// capped at `max_delay`. With the defaults: 100ms, 200ms, 400ms.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return self.initial_delay.min(self.max_delay);
        }

        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay_ms = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);

        // `as` saturates, so an infinite product lands on u64::MAX and is capped below
        let delay = Duration::from_millis(delay_ms as u64);

        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }
}

/// Builder for [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryPolicyBuilder {
    max_retries: Option<usize>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
}

impl RetryPolicyBuilder {
    /// Set maximum number of retries.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set initial delay before first retry.
    #[must_use]
    pub const fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set maximum delay (cap for exponential backoff).
    #[must_use]
    pub const fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set multiplier for exponential backoff.
    #[must_use]
    pub const fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Build the [`RetryPolicy`], filling unset fields with the defaults.
    #[must_use]
    pub fn build(self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            initial_delay: self.initial_delay.unwrap_or(defaults.initial_delay),
            max_delay: self.max_delay.unwrap_or(defaults.max_delay),
            multiplier: self.multiplier.unwrap_or(defaults.multiplier),
        }
    }
}

/// Why a retried operation gave up.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every allowed attempt failed with a retryable error.
    #[error("Gave up after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Attempts made, including the first.
        attempts: usize,
        /// The error from the final attempt.
        last_error: E,
    },

    /// The operation failed with an error the predicate refused to retry.
    #[error("{0}")]
    NotRetryable(E),

    /// The cancellation token fired before the operation succeeded.
    #[error("Cancelled after {attempts} attempts")]
    Cancelled {
        /// Attempts started before cancellation, including an interrupted one.
        attempts: usize,
    },
}

/// Retry an async operation while `is_retryable` accepts its errors.
///
/// # Arguments
///
/// * `policy` - Retry policy configuration
/// * `cancellation` - Aborts an in-flight attempt or backoff wait when cancelled
/// * `operation` - Async operation to retry (must be `FnMut` to allow multiple calls)
/// * `is_retryable` - Predicate deciding whether an error should trigger a retry
///
/// # Errors
///
/// - [`RetryError::NotRetryable`] as soon as the predicate rejects an error
/// - [`RetryError::Exhausted`] with the last error once `policy.max_attempts()` failed
/// - [`RetryError::Cancelled`] if the token fires first
pub async fn retry_with_predicate<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    cancellation: &CancellationToken,
    mut operation: F,
    is_retryable: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        if cancellation.is_cancelled() {
            RetryMetrics::record_cancelled();
            tracing::info!(attempt, "Operation cancelled before the next attempt");
            return Err(RetryError::Cancelled { attempts: attempt });
        }

        let outcome = tokio::select! {
            biased;
            () = cancellation.cancelled() => {
                RetryMetrics::record_cancelled();
                tracing::info!(attempt, "Operation cancelled mid-attempt");
                return Err(RetryError::Cancelled { attempts: attempt + 1 });
            }
            outcome = operation() => outcome,
        };

        match outcome {
            Ok(result) => {
                if attempt > 0 {
                    RetryMetrics::record_success();
                    tracing::info!(attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(err) => {
                if !is_retryable(&err) {
                    tracing::warn!(
                        error = %err,
                        "Error is not retryable, failing immediately"
                    );
                    return Err(RetryError::NotRetryable(err));
                }

                if attempt >= policy.max_retries {
                    RetryMetrics::record_exhausted();
                    tracing::error!(
                        attempt,
                        error = %err,
                        "Operation failed after max retries"
                    );
                    return Err(RetryError::Exhausted {
                        attempts: attempt + 1,
                        last_error: err,
                    });
                }

                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "Operation failed, retrying..."
                );
                RetryMetrics::record_attempt();

                tokio::select! {
                    biased;
                    () = cancellation.cancelled() => {
                        RetryMetrics::record_cancelled();
                        tracing::info!(attempt, "Operation cancelled during backoff");
                        return Err(RetryError::Cancelled { attempts: attempt + 1 });
                    }
                    () = sleep(delay) => {}
                }
                attempt += 1;
            }
        }
    }
}
