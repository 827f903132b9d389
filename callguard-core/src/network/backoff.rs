//! Reconnect backoff policy.

use std::time::Duration;

/// Exponential backoff for reconnecting the signaling channel.
///
/// The delay before reconnect number `attempt + 1` is
/// `min(max_delay_ms, 2^(attempt + 1) * base_delay_ms)`: 2s, 4s, 8s, 16s,
/// then 30s forever with the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Unit of the exponential delay (milliseconds).
    pub base_delay_ms: u64,
    /// Upper bound for any single delay (milliseconds).
    pub max_delay_ms: u64,
    /// Stop reconnecting after this many consecutive failed cycles.
    /// `None` retries for as long as the session lives.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy {
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Delay to wait before the next reconnect, given the current attempt
    /// counter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_add(1));
        let delay_ms = factor
            .saturating_mul(self.base_delay_ms)
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    /// Returns true if another reconnect is allowed after `attempt` cycles.
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Consecutive disconnection counter.
///
/// Rises by one per unexpected close and goes back to zero once a
/// connection opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconnectState {
    pub attempt: u32,
}

impl ReconnectState {
    pub fn record_failure(&mut self) {
        self.attempt = self.attempt.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
