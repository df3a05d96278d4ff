//! Injectable source of "now".
//!
//! Grid builds, date disablement, and the time picker's default value read
//! the wall clock only through [`WallClock`], so tests can pin today.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::calendar::CalendarDate;

pub trait WallClock {
    /// Local date and time.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> CalendarDate {
        CalendarDate::from(self.now().date())
    }
}

impl<C: WallClock + ?Sized> WallClock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    #[must_use]
    pub const fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Midnight at the start of `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_pins_today() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 24).expect("valid date");
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), CalendarDate::new(2025, 6, 24).expect("valid date"));
        assert_eq!((&clock).today(), clock.today());
    }
}
