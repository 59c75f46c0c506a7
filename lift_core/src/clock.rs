//! Time source for the workout store.
//!
//! Calendar-day comparisons need a local offset, so clocks hand out
//! `DateTime<FixedOffset>` rather than plain UTC.

use chrono::{DateTime, Duration, FixedOffset, Local};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local time zone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Settable clock for tests
///
/// Clones share the same instant, so a test can keep one handle and move
/// time forward after handing another to the store.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}
