//! Time source for task timestamps.

#[cfg(test)]
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually advanced clock for tests.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            secs: AtomicI64::new(start),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}
