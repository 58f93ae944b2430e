//! Common traits for memocache.
//!
//! The cache never calls `Instant::now()` directly; it asks a [`Clock`].
//! Production code uses [`SystemClock`], tests substitute a clock they can
//! move forward by hand.

use std::sync::Arc;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the current instant.
///
/// Implementations must be monotonic: successive calls never go backwards.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by the operating system's monotonic timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_twice<C: Clock>(clock: C) -> (Instant, Instant) {
        let first = clock.now();
        let second = clock.now();
        (first, second)
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let (first, second) = read_twice(SystemClock);
        assert!(second >= first);
    }

    #[test]
    fn test_arc_clock_delegates() {
        let (first, second) = read_twice(Arc::new(SystemClock));
        assert!(second >= first);
    }

    #[test]
    fn test_borrowed_clock_delegates() {
        let clock = SystemClock;
        let (first, second) = read_twice(&clock);
        assert!(second >= first);
    }

    #[test]
    fn test_dyn_clock() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let (first, second) = read_twice(clock);
        assert!(second >= first);
    }
}
