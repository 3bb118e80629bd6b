//! Time source for oracle staleness checks.

use std::cell::Cell;

/// Source of the current unix time in seconds
pub trait Clock {
    /// Current unix timestamp in seconds
    fn now(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Create a clock frozen at `now`
    pub fn new(now: u64) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    /// Move forward by `secs`
    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get().saturating_add(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}
