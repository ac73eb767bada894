// Circuit breaker for upstream services
//
// After `threshold` consecutive failures the breaker opens and calls are
// refused outright. Once `cooldown` has elapsed the breaker resets and the
// next call goes through as a trial. State transitions take an explicit
// `Instant` so tests control the clock.

use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    failures: u32,
    opened_at: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            failures: 0,
            opened_at: None,
        }
    }

    /// Should a call be attempted right now?
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    pub fn allow_at(&mut self, now: Instant) -> bool {
        match self.opened_at {
            None => true,
            Some(opened) => {
                if now.duration_since(opened) >= self.cooldown {
                    info!("circuit breaker cooldown elapsed, allowing trial call");
                    self.opened_at = None;
                    self.failures = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
        self.opened_at = None;
    }

    pub fn record_failure(&mut self) {
        self.record_failure_at(Instant::now());
    }

    pub fn record_failure_at(&mut self, now: Instant) {
        self.failures += 1;
        if self.failures >= self.threshold && self.opened_at.is_none() {
            info!(failures = self.failures, "circuit breaker opened");
            self.opened_at = Some(now);
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }
}
