//! Time source used to stamp `created_at` and `updated_at`.

use crate::domain::TimeMs;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> TimeMs;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeMs {
        TimeMs::now()
    }
}

/// Clock that only moves when told to. Useful for tests that need distinct
/// or identical timestamps.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start: TimeMs) -> Self {
        Self {
            now_ms: AtomicI64::new(start.as_i64()),
        }
    }

    pub fn set(&self, at: TimeMs) {
        self.now_ms.store(at.as_i64(), Ordering::SeqCst);
    }

    /// Move the clock forward by `ms` and return the new time.
    pub fn advance(&self, ms: i64) -> TimeMs {
        TimeMs::new(self.now_ms.fetch_add(ms, Ordering::SeqCst) + ms)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeMs {
        TimeMs::new(self.now_ms.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(TimeMs::new(1000));
        assert_eq!(clock.now(), TimeMs::new(1000));
        assert_eq!(clock.advance(5), TimeMs::new(1005));
        assert_eq!(clock.now(), TimeMs::new(1005));
    }

    #[test]
    fn test_manual_clock_set_backwards() {
        let clock = ManualClock::new(TimeMs::new(1000));
        clock.set(TimeMs::new(10));
        assert_eq!(clock.now(), TimeMs::new(10));
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        assert!(SystemClock.now() > TimeMs::new(0));
    }
}
