//! Source of the query time for evaluations

use chrono::Local;
use cronostar_core::TimeOfDay;
use std::sync::atomic::{AtomicU16, Ordering};

/// Supplies the current time of day
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeOfDay;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeOfDay {
        TimeOfDay::from(Local::now().time())
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    minutes: AtomicU16,
}

impl FixedClock {
    pub fn new(time: TimeOfDay) -> Self {
        Self {
            minutes: AtomicU16::new(time.minutes()),
        }
    }

    pub fn set(&self, time: TimeOfDay) {
        self.minutes.store(time.minutes(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> TimeOfDay {
        // Only ever stores values taken from a valid TimeOfDay
        TimeOfDay::from_minutes(self.minutes.load(Ordering::SeqCst) as u32)
            .unwrap_or(TimeOfDay::MIDNIGHT)
    }
}
