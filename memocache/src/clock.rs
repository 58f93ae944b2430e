//! Manually driven clock for deterministic expiration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use memocache_core::Clock;

/// Clock that only moves when told to.
///
/// Clones share the same instant, so a test can hand one clone to the cache
/// and keep another to call [`advance`](MockClock::advance).
#[derive(Clone, Debug)]
pub struct MockClock {
    now: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Creates a clock frozen at the current system instant.
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves time forward for every clone of this clock.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_frozen() {
        let clock = MockClock::new();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_mock_clock_advance_shared() {
        let clock = MockClock::new();
        let handle = clock.clone();
        let before = clock.now();

        handle.advance(Duration::from_secs(3));

        assert_eq!(clock.now() - before, Duration::from_secs(3));
    }
}
