use std::cell::RefCell;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local, Timelike, Weekday};

/// Source of monotonic time and blocking sleeps.
///
/// Every wait in the engine goes through this trait, so tests can substitute
/// a virtual clock and run hour-long sessions instantly.
pub trait Clock {
    /// Monotonic time since an arbitrary per-clock origin.
    fn now(&self) -> Duration;

    /// Block for `dur`. A virtual clock advances instead of sleeping.
    fn sleep(&self, dur: Duration);

    /// Local hour of day (0-23), for the time-of-day behavior patterns.
    fn local_hour(&self) -> u32;

    /// Local day of week, for the weekday behavior patterns.
    fn weekday(&self) -> Weekday;
}

/// Production clock backed by `Instant` and `thread::sleep`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }

    fn weekday(&self) -> Weekday {
        Local::now().weekday()
    }
}

/// Virtual clock for tests: `sleep` advances `now` immediately.
///
/// Only meant for the single simulation thread, hence the plain `RefCell`.
pub struct TestClock {
    now: RefCell<Duration>,
    hour: u32,
    weekday: Weekday,
}

impl TestClock {
    pub fn new() -> Self {
        Self::at(10, Weekday::Tue)
    }

    /// Pin the wall-clock context the time-of-day patterns will see.
    pub fn at(hour: u32, weekday: Weekday) -> Self {
        Self {
            now: RefCell::new(Duration::ZERO),
            hour,
            weekday,
        }
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Duration {
        *self.now.borrow()
    }

    fn sleep(&self, dur: Duration) {
        *self.now.borrow_mut() += dur;
    }

    fn local_hour(&self) -> u32 {
        self.hour
    }

    fn weekday(&self) -> Weekday {
        self.weekday
    }
}
