use std::time::Duration;

/// How the watch loop retries a broken event subscription.
///
/// Attempt `n` (starting at 1) waits `initial_delay * multiplier^(n-1)`,
/// capped at `max_delay`, before asking for a new subscription. After
/// `max_attempts` failures the loop gives up. The default is a single attempt
/// after a fixed 5s pause; more attempts with backoff are opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 2,
            max_attempts: 1,
        }
    }
}

impl ReconnectPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.checked_pow(exponent).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}
