use std::time::Duration;

use rand::Rng;

use freshet_types::BackoffConfig;

/// Apply percentage jitter to a delay in milliseconds.
pub fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, (base_ms.saturating_mul(u64::from(jitter_percent))) / 100)
    };
    let mut rng = rand::rng();
    base_ms + rng.random_range(0..jitter_range)
}

/// An exponential delay schedule over a [`BackoffConfig`].
///
/// Each call to [`next_delay`](Backoff::next_delay) returns the jittered
/// delay to sleep before the next attempt and advances the schedule. The
/// schedule itself is unbounded; the caller bounds the wait with a deadline
/// (see `PollConfig::deadline`).
#[derive(Debug)]
pub struct Backoff {
    current_ms: u64,
    max_ms: u64,
    factor: u32,
    jitter_percent: u32,
}

impl Backoff {
    /// Start a schedule at the config's initial delay.
    #[must_use]
    pub fn new(cfg: &BackoffConfig) -> Self {
        Self {
            current_ms: cfg.initial.as_millis().try_into().unwrap_or(u64::MAX),
            max_ms: cfg.max.as_millis().try_into().unwrap_or(u64::MAX),
            factor: cfg.factor.max(1),
            jitter_percent: cfg.jitter_percent,
        }
    }

    /// The next delay, with jitter applied; advances the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let delay = jitter_wait(self.current_ms, self.jitter_percent);
        self.current_ms = self
            .current_ms
            .saturating_mul(u64::from(self.factor))
            .min(self.max_ms);
        Duration::from_millis(delay)
    }

    /// Sleep for the next delay. Dropping the returned future cancels the
    /// wait.
    pub async fn wait(&mut self) {
        tokio::time::sleep(self.next_delay()).await;
    }
}
