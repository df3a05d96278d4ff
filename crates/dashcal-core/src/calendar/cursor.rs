use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::date_math::{
    CalendarDate, DateParseError, days_in_month, first_weekday_of_month,
};

/// Full month names, indexed by 0-based month.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Column headers for a Sunday-first grid.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Name of a 0-based month, `None` outside `0..=11`.
#[must_use]
pub fn month_name(month0: u32) -> Option<&'static str> {
    MONTH_NAMES.get(usize::try_from(month0).ok()?).copied()
}

/// The `(year, month)` a calendar widget is showing.
///
/// The month is 0-based (`0` = January). A cursor only moves through
/// explicit navigation; nothing here reads the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonthCursor")]
pub struct MonthCursor {
    year: i32,
    month0: u32,
}

#[derive(Deserialize)]
struct RawMonthCursor {
    year: i32,
    month0: u32,
}

impl TryFrom<RawMonthCursor> for MonthCursor {
    type Error = DateParseError;

    fn try_from(raw: RawMonthCursor) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month0).ok_or_else(|| DateParseError::OutOfRange {
            input: format!("{} month index {}", raw.year, raw.month0),
        })
    }
}

impl MonthCursor {
    /// Returns `None` when `month0` is outside `0..=11`.
    #[must_use]
    pub const fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 < 12 {
            Some(Self { year, month0 })
        } else {
            None
        }
    }

    /// The month containing `date`.
    ///
    /// A hand-built date with a month outside `1..=12` is clamped to the
    /// nearest real month.
    #[must_use]
    pub const fn containing(date: CalendarDate) -> Self {
        let month0 = match date.month {
            0 => 0,
            month @ 1..=12 => month - 1,
            _ => 11,
        };
        Self {
            year: date.year,
            month0,
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// 0-based month index.
    #[must_use]
    pub const fn month0(self) -> u32 {
        self.month0
    }

    /// 1-based month number, as used by date keys.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month0 + 1
    }

    /// Move by `delta` months, carrying into the year. Saturates at
    /// January of `i32::MIN` and December of `i32::MAX`.
    #[must_use]
    pub fn step(self, delta: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month0) + i64::from(delta);
        let Ok(year) = i32::try_from(total.div_euclid(12)) else {
            return if total < 0 {
                Self { year: i32::MIN, month0: 0 }
            } else {
                Self { year: i32::MAX, month0: 11 }
            };
        };
        let month0 = u32::try_from(total.rem_euclid(12)).unwrap_or(0);
        Self { year, month0 }
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.step(1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        self.step(-1)
    }

    #[must_use]
    pub const fn with_year(self, year: i32) -> Self {
        Self {
            year,
            month0: self.month0,
        }
    }

    /// Returns `None` when `month0` is outside `0..=11`.
    #[must_use]
    pub const fn with_month(self, month0: u32) -> Option<Self> {
        Self::new(self.year, month0)
    }

    #[must_use]
    pub const fn days_in_month(self) -> u32 {
        days_in_month(self.year, self.month())
    }

    /// Weekday of the 1st, 0 = Sunday.
    #[must_use]
    pub fn first_weekday(self) -> u32 {
        first_weekday_of_month(self.year, self.month())
    }

    #[must_use]
    pub const fn first_day(self) -> CalendarDate {
        CalendarDate {
            year: self.year,
            month: self.month(),
            day: 1,
        }
    }

    #[must_use]
    pub const fn last_day(self) -> CalendarDate {
        CalendarDate {
            year: self.year,
            month: self.month(),
            day: self.days_in_month(),
        }
    }

    #[must_use]
    pub const fn contains(self, date: CalendarDate) -> bool {
        date.year == self.year && date.month == self.month()
    }

    /// Weeks needed to show the whole month: `ceil((days + first_weekday) / 7)`.
    #[must_use]
    pub fn row_count(self) -> u32 {
        (self.days_in_month() + self.first_weekday()).div_ceil(7)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        month_name(self.month0).unwrap_or_default()
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month())
    }
}

impl FromStr for MonthCursor {
    type Err = DateParseError;

    /// Parses `YYYY-MM` with a 1-based month, the same shape as a date key
    /// without its day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date: CalendarDate = format!("{}-01", s.trim()).parse().map_err(|err| match err {
            DateParseError::SegmentCount { found, .. } => DateParseError::SegmentCount {
                input: s.to_string(),
                separator: '-',
                found: found.saturating_sub(1),
            },
            DateParseError::NonNumeric { segment, .. } => DateParseError::NonNumeric {
                input: s.to_string(),
                segment,
            },
            DateParseError::OutOfRange { .. } => DateParseError::OutOfRange {
                input: s.to_string(),
            },
        })?;
        Ok(Self::containing(date))
    }
}
