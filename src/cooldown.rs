use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Remembers when each container was last acted upon.
///
/// Entries are never evicted. An entry older than the cooldown behaves exactly
/// like a missing one, so stale ids only cost a little memory.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_action: HashMap<String, Instant>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an action on `id` is allowed at `now`, recording `now`
    /// as the last action when it is.
    pub fn permit(&mut self, id: &str, now: Instant, interval: Duration) -> bool {
        match self.last_action.get_mut(id) {
            Some(last) if now.saturating_duration_since(*last) < interval => false,
            Some(last) => {
                *last = now;
                true
            }
            None => {
                self.last_action.insert(id.to_string(), now);
                true
            }
        }
    }

    #[cfg(test)]
    pub fn last_action(&self, id: &str) -> Option<Instant> {
        self.last_action.get(id).copied()
    }

    /// Number of containers ever acted upon.
    pub fn tracked(&self) -> usize {
        self.last_action.len()
    }
}
