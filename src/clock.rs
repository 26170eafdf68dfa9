//! Time sources and the periodic trigger that drives day accrual.
//!
//! Everything that needs "now" receives a [`Clock`] instead of calling
//! `Local::now()` directly, so accrual and statistics can be exercised with
//! synthetic time.

use std::cell::Cell;

use chrono::{DateTime, Duration, FixedOffset, Local};

/// A source of the current instant.
///
/// The offset of the returned timestamp defines what "today" means for
/// calendar-day comparisons.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        ManualClock { now: Cell::new(start) }
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

/// A cancellable periodic trigger.
///
/// The ticker owns no thread or timer. The host loop asks it whether a tick is
/// due at a given instant, which keeps it usable with [`ManualClock`].
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_fire: Option<DateTime<FixedOffset>>,
    cancelled: bool,
}

impl Ticker {
    /// Creates a ticker that fires on its first poll and then once per `interval`.
    pub fn new(interval: Duration) -> Self {
        Ticker {
            interval,
            next_fire: None,
            cancelled: false,
        }
    }

    /// Returns `true` if a tick is due at `now`, and schedules the next one.
    pub fn fire_if_due(&mut self, now: DateTime<FixedOffset>) -> bool {
        if self.cancelled {
            return false;
        }
        let due = match self.next_fire {
            None => true,
            Some(at) => now >= at,
        };
        if due {
            self.next_fire = Some(now + self.interval);
        }
        due
    }

    /// Time left until the next tick, or `None` once cancelled.
    pub fn until_next(&self, now: DateTime<FixedOffset>) -> Option<std::time::Duration> {
        if self.cancelled {
            return None;
        }
        let wait = match self.next_fire {
            None => std::time::Duration::ZERO,
            Some(at) => (at - now).to_std().unwrap_or(std::time::Duration::ZERO),
        };
        Some(wait)
    }

    /// Stops the ticker permanently.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.next_fire = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
