//! Retry backoff policy for resilient E-utilities calls.

use rand::Rng;
use std::time::Duration;

use crate::config::PubmedConfig;

/// Configuration for retry behavior
///
/// ```text
/// delay = base_delay * 2^attempt + jitter      (attempt is 0-based)
/// delay = max(delay, rate_limit_floor)         (rate-limited failures only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, the first one included
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Minimum delay after a rate-limited failure
    pub rate_limit_floor: Duration,
    /// Upper bound of the uniform random jitter
    pub max_jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from_config(&PubmedConfig::default())
    }
}

impl RetryConfig {
    /// Build the policy from the PubMed configuration
    pub fn from_config(config: &PubmedConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: Duration::from_millis(config.retry.base_delay_ms),
            rate_limit_floor: Duration::from_millis(config.retry.rate_limit_floor_ms),
            max_jitter: Duration::from_millis(config.retry.max_jitter_ms),
        }
    }

    /// Set maximum attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Whether another attempt is allowed after `attempt` (0-based) failed
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    /// Exponential part of the delay, without jitter or rate-limit floor
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.base_delay.saturating_mul(factor)
    }

    /// Delay before the retry following failed `attempt`, with the given jitter
    pub fn delay_with_jitter(&self, attempt: u32, rate_limited: bool, jitter: Duration) -> Duration {
        let delay = self.base_backoff(attempt) + jitter.min(self.max_jitter);
        if rate_limited {
            delay.max(self.rate_limit_floor)
        } else {
            delay
        }
    }

    /// Delay before the retry following failed `attempt`, with random jitter
    pub fn delay_for(&self, attempt: u32, rate_limited: bool) -> Duration {
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            let millis = self.max_jitter.as_millis() as u64;
            Duration::from_millis(rand::thread_rng().gen_range(0..=millis))
        };
        self.delay_with_jitter(attempt, rate_limited, jitter)
    }
}
