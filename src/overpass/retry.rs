//! Bounded exponential backoff as an explicit state machine.

use std::time::Duration;

use crate::config::OverpassConfig;

/// Attempt budget and delay curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &OverpassConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: config.base_delay(),
        }
    }

    /// Delay after the zero-based `attempt`: `base * 2^attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Why an attempt failed, as far as retrying is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 5xx or 429. Always followed by a backoff sleep, even after the last attempt.
    Server,
    /// Connection error or timeout. No sleep once the budget is spent.
    Transport,
}

/// Tracks the attempt counter for one request.
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    pub fn has_attempts_left(&self) -> bool {
        self.attempt < self.policy.max_attempts
    }

    /// One-based number of the attempt about to be made
    pub fn attempt_number(&self) -> u32 {
        self.attempt + 1
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Record a failed attempt and return how long to sleep before the next
    /// one, or `None` to give up without sleeping.
    pub fn record_failure(&mut self, kind: FailureKind) -> Option<Duration> {
        let delay = self.policy.delay_for(self.attempt);
        self.attempt += 1;

        match kind {
            FailureKind::Server => Some(delay),
            FailureKind::Transport if self.has_attempts_left() => Some(delay),
            FailureKind::Transport => None,
        }
    }
}

/// Sleep seam so backoff can be observed in tests.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_curve() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (0..5).map(|a| policy.delay_for(a).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn test_server_failures_always_sleep() {
        let mut state = RetryState::new(RetryPolicy::default());
        let mut sleeps = Vec::new();
        while state.has_attempts_left() {
            sleeps.push(state.record_failure(FailureKind::Server));
        }
        assert_eq!(state.attempts_made(), 5);
        assert!(sleeps.iter().all(Option::is_some));
        assert_eq!(sleeps.last().copied().flatten(), Some(Duration::from_secs(16)));
    }

    #[test]
    fn test_transport_failure_skips_final_sleep() {
        let mut state = RetryState::new(RetryPolicy::default());
        let mut sleeps = Vec::new();
        while state.has_attempts_left() {
            sleeps.push(state.record_failure(FailureKind::Transport));
        }
        assert_eq!(
            sleeps,
            vec![
                Some(Duration::from_secs(1)),
                Some(Duration::from_secs(2)),
                Some(Duration::from_secs(4)),
                Some(Duration::from_secs(8)),
                None,
            ]
        );
    }

    #[test]
    fn test_attempt_numbering() {
        let mut state = RetryState::new(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(10),
        });
        assert_eq!(state.attempt_number(), 1);
        state.record_failure(FailureKind::Server);
        assert_eq!(state.attempt_number(), 2);
        assert!(state.has_attempts_left());
        state.record_failure(FailureKind::Server);
        assert!(!state.has_attempts_left());
    }
}
