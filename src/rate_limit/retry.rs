//! Retry policy for transient upstream failures.

use std::time::Duration;

use rand::Rng;

use crate::rate_limit::limits;

/// Exponential backoff with bounded jitter and a hard attempt ceiling.
///
/// The delay before retry `n` (0-based) is
/// `min(base * 2^n + jitter, cap)` unless the upstream supplied a
/// `Retry-After`, which always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Backoff base delay
    pub base: Duration,
    /// Upper bound on any computed backoff
    pub cap: Duration,
    /// Jitter is drawn uniformly from `[0, max_jitter)`
    pub max_jitter: Duration,
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the attempt ceiling.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the base delay and the cap.
    pub fn with_bounds(mut self, base: Duration, cap: Duration) -> Self {
        self.base = base;
        self.cap = cap.max(base);
        self
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows_another(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }

    /// Backoff for a given 0-based retry index and an explicit jitter.
    pub fn backoff_with_jitter(&self, attempt: u32, jitter: Duration) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        let exp = self.base.saturating_mul(factor);
        exp.saturating_add(jitter).min(self.cap)
    }

    /// Backoff for a given 0-based retry index with random jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms))
        };
        self.backoff_with_jitter(attempt, jitter)
    }

    /// Delay before the next attempt, preferring the upstream's hint.
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.backoff(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: limits::MAX_ATTEMPTS,
            base: limits::BACKOFF_BASE,
            cap: limits::BACKOFF_CAP,
            max_jitter: limits::BACKOFF_JITTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_then_caps() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = (0..6)
            .map(|n| policy.backoff_with_jitter(n, Duration::ZERO).as_millis())
            .collect();
        assert_eq!(delays, vec![400, 800, 1600, 3200, 6400, 8000]);
    }

    #[test]
    fn test_jitter_is_bounded() {
        let policy = RetryPolicy::default();
        for _ in 0..100 {
            let d = policy.backoff(0);
            assert!(d >= Duration::from_millis(400));
            assert!(d < Duration::from_millis(700));
        }
        assert_eq!(policy.backoff(10), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_after_wins() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_for(5, Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_attempt_ceiling() {
        let policy = RetryPolicy::default();
        assert!(policy.allows_another(5));
        assert!(!policy.allows_another(6));
        assert!(!RetryPolicy::no_retry().allows_another(1));
    }
}
