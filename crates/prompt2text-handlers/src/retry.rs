// Exponential backoff schedule
//
// Attempt 1 fails -> wait 1s, attempt 2 fails -> wait 2s, then 4s, 8s...
// capped at max_backoff. The schedule is pure; the processor owns the
// actual sleeping.

use prompt2text_config::RetryConfig;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: config.initial_backoff(),
            max_backoff: config.max_backoff(),
        }
    }

    /// Backoff before retrying after failed attempt `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(16),
        }
    }

    #[test]
    fn doubles_each_attempt() {
        let p = policy();
        assert_eq!(p.backoff(0), Duration::from_secs(1));
        assert_eq!(p.backoff(1), Duration::from_secs(2));
        assert_eq!(p.backoff(2), Duration::from_secs(4));
        assert_eq!(p.backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn caps_at_max_backoff() {
        let p = policy();
        assert_eq!(p.backoff(4), Duration::from_secs(16));
        assert_eq!(p.backoff(10), Duration::from_secs(16));
        assert_eq!(p.backoff(31), Duration::from_secs(16));
    }

    #[test]
    fn from_config_carries_values() {
        let config = RetryConfig::default();
        let p = RetryPolicy::from_config(&config);
        assert_eq!(p.max_attempts, 3);
        assert_eq!(p.backoff(0), Duration::from_secs(1));
        assert_eq!(p.backoff(5), Duration::from_secs(16));
    }
}
