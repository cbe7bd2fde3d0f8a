// ABOUTME: Retry policy configuration and delay calculation
// ABOUTME: Supports fixed-delay and capped exponential backoff between attempts

use std::time::Duration;

/// Bounded-retry policy attached to a task.
///
/// `max_retries` counts re-executions, so a task runs at most
/// `max_retries + 1` times. Every retry re-runs the full body; there is no
/// partial resume.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// No retries: a single attempt decides the outcome.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            max_delay: Duration::ZERO,
        }
    }

    /// Retry with the same delay between every attempt.
    pub fn fixed_delay(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay: delay,
            backoff_multiplier: 1.0, // No backoff
            max_delay: delay,
        }
    }

    /// Retry with exponentially growing delays, capped at five minutes.
    pub fn exponential_backoff(max_retries: u32, initial_delay: Duration, multiplier: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_multiplier: multiplier,
            max_delay: Duration::from_secs(300),
        }
    }

    /// Cap the computed backoff delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Calculate the delay before a specific retry (0-indexed).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let delay_ms = (self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(retry as i32)) as u64;

        let delay = Duration::from_millis(delay_ms);

        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }
}
