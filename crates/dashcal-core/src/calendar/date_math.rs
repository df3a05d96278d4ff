//! Gregorian date arithmetic and the canonical `YYYY-MM-DD` date key.
//!
//! Everything here is pure. Months are 1-based (`1..=12`) at this layer;
//! only [`MonthCursor`](super::MonthCursor) carries the 0-based month index.
//!
//! Years are plain `i32` values with no bound beyond the integer range. Day
//! counting goes through `i64`, so every representable year converts without
//! overflow.
//!
//! # Date keys
//!
//! A [`DateKey`] is the zero-padded `YYYY-MM-DD` rendering of a date. The year
//! is *not* padded (`800-01-05`, `-44-03-15`), which keeps keys collision-free
//! across every year. Two dates are the same calendar day iff their keys are
//! equal; the key is the only join between grid cells and events.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Days between 0000-03-01 and 1970-01-01 in the proleptic Gregorian calendar.
const EPOCH_SHIFT: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

/// Errors from parsing a textual date (date keys and event-source dates).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    /// The input did not split into exactly three segments.
    #[error("expected 3 '{separator}'-separated segments in '{input}', found {found}")]
    SegmentCount {
        input: String,
        separator: char,
        found: usize,
    },

    /// A segment was empty or contained something other than ASCII digits.
    #[error("segment '{segment}' of '{input}' is not a number")]
    NonNumeric { input: String, segment: String },

    /// The segments were numeric but do not name a real calendar day.
    #[error("'{input}' is not a calendar date")]
    OutOfRange { input: String },
}

impl DateParseError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::SegmentCount { .. } | Self::NonNumeric { .. } | Self::OutOfRange { .. } => {
                ErrorCode::InvalidDate
            }
        }
    }
}

/// Leap iff divisible by 4, except centuries not divisible by 400.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-based) of `year`.
///
/// Returns 0 for a month outside `1..=12`.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Weekday of the 1st of `month` (1-based), with 0 = Sunday.
#[must_use]
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    weekday_from_days(days_from_civil(year, month, 1))
}

/// Format a `(year, month, day)` triple as a [`DateKey`].
///
/// Month and day are zero-padded to two digits; the year is written as-is.
#[must_use]
pub fn to_date_key(year: i32, month: u32, day: u32) -> DateKey {
    DateKey(format!("{year}-{month:02}-{day:02}"))
}

/// Parse a `YYYY-MM-DD` key back into `(year, month, day)`.
///
/// A leading `-` marks a negative year. Unpadded segments (`2025-6-4`) are
/// accepted; the result is validated against the calendar.
///
/// # Errors
///
/// Returns [`DateParseError`] on a wrong segment count, a non-numeric segment,
/// or a triple that is not a real date. Keys produced by [`to_date_key`] never
/// fail, so callers holding internal keys may treat an error as a bug.
pub fn from_date_key(key: &str) -> Result<(i32, u32, u32), DateParseError> {
    let (negative, body) = match key.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, key),
    };

    let segments: Vec<&str> = body.split('-').collect();
    let [year, month, day] = segments[..] else {
        return Err(DateParseError::SegmentCount {
            input: key.to_string(),
            separator: '-',
            found: segments.len(),
        });
    };

    let magnitude: i64 = numeric_segment(key, year)?;
    let signed = if negative { -magnitude } else { magnitude };
    let year = i32::try_from(signed).map_err(|_| out_of_range(key))?;
    let month: u32 = numeric_segment(key, month)?;
    let day: u32 = numeric_segment(key, day)?;

    validate(key, year, month, day)
}

/// Parse an event-source date written `DD/MM/YYYY`.
///
/// Surrounding whitespace is ignored and day/month may be unpadded.
///
/// # Errors
///
/// Same failure modes as [`from_date_key`].
pub fn parse_event_date(raw: &str) -> Result<CalendarDate, DateParseError> {
    let trimmed = raw.trim();
    let segments: Vec<&str> = trimmed.split('/').collect();
    let [day, month, year] = segments[..] else {
        return Err(DateParseError::SegmentCount {
            input: raw.to_string(),
            separator: '/',
            found: segments.len(),
        });
    };

    let day: u32 = numeric_segment(raw, day)?;
    let month: u32 = numeric_segment(raw, month)?;
    let year: i32 = numeric_segment(raw, year)?;

    let (year, month, day) = validate(raw, year, month, day)?;
    Ok(CalendarDate { year, month, day })
}

/// Compare two instants by calendar day, ignoring any time-of-day component.
#[must_use]
pub fn is_same_calendar_day<A, B>(a: &A, b: &B) -> bool
where
    A: ToDateKey + ?Sized,
    B: ToDateKey + ?Sized,
{
    a.date_key() == b.date_key()
}

fn numeric_segment<T: FromStr>(input: &str, segment: &str) -> Result<T, DateParseError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateParseError::NonNumeric {
            input: input.to_string(),
            segment: segment.to_string(),
        });
    }
    segment.parse::<T>().map_err(|_| out_of_range(input))
}

fn validate(input: &str, year: i32, month: u32, day: u32) -> Result<(i32, u32, u32), DateParseError> {
    if day == 0 || day > days_in_month(year, month) {
        return Err(out_of_range(input));
    }
    Ok((year, month, day))
}

fn out_of_range(input: &str) -> DateParseError {
    DateParseError::OutOfRange {
        input: input.to_string(),
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
pub(crate) fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let month = i64::from(month);
    let year = i64::from(year) - i64::from(month <= 2);
    let era = year.div_euclid(400);
    let yoe = year.rem_euclid(400);
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * DAYS_PER_ERA + doe - EPOCH_SHIFT
}

/// Inverse of [`days_from_civil`].
///
/// Day counts past either end of the `i32` year range pin the year to
/// `i32::MIN` or `i32::MAX` instead of wrapping around.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + EPOCH_SHIFT;
    let era = z.div_euclid(DAYS_PER_ERA);
    let doe = z.rem_euclid(DAYS_PER_ERA);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    let year = i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX });
    (year, month as u32, day as u32)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn weekday_from_days(days: i64) -> u32 {
    // 1970-01-01 was a Thursday.
    (days + 4).rem_euclid(7) as u32
}

/// Canonical `YYYY-MM-DD` join key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decompose back into a [`CalendarDate`].
    ///
    /// # Errors
    ///
    /// Never fails for keys built by this module; see [`from_date_key`].
    pub fn to_date(&self) -> Result<CalendarDate, DateParseError> {
        let (year, month, day) = from_date_key(&self.0)?;
        Ok(CalendarDate { year, month, day })
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DateKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for DateKey {
    type Err = DateParseError;

    /// Parses and re-normalizes, so `2025-6-4` becomes `2025-06-04`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month, day) = from_date_key(s)?;
        Ok(to_date_key(year, month, day))
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

/// Anything that falls on a calendar day.
pub trait ToDateKey {
    fn date_key(&self) -> DateKey;
}

/// A validated Gregorian date with a 1-based month.
///
/// Field order makes the derived ordering chronological.
///
/// Deserialization goes through [`CalendarDate::new`], so a decoded value
/// is always a real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCalendarDate")]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Deserialize)]
struct RawCalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl TryFrom<RawCalendarDate> for CalendarDate {
    type Error = DateParseError;

    fn try_from(raw: RawCalendarDate) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month, raw.day).ok_or_else(|| {
            out_of_range(&format!("{}-{:02}-{:02}", raw.year, raw.month, raw.day))
        })
    }
}

impl CalendarDate {
    /// Returns `None` unless the triple is a real date.
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    #[must_use]
    pub fn key(self) -> DateKey {
        to_date_key(self.year, self.month, self.day)
    }

    /// 0 = Sunday.
    #[must_use]
    pub fn weekday(self) -> u32 {
        weekday_from_days(self.days_since_epoch())
    }

    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        Self::from_days_since_epoch(self.days_since_epoch() + days)
    }

    #[must_use]
    pub fn days_since_epoch(self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    #[must_use]
    pub fn from_days_since_epoch(days: i64) -> Self {
        let (year, month, day) = civil_from_days(days);
        Self { year, month, day }
    }

    /// `None` when the year lies outside chrono's supported range.
    #[must_use]
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month, day) = from_date_key(s.trim())?;
        Ok(Self { year, month, day })
    }
}

impl ToDateKey for CalendarDate {
    fn date_key(&self) -> DateKey {
        self.key()
    }
}

impl ToDateKey for DateKey {
    fn date_key(&self) -> DateKey {
        self.clone()
    }
}

impl ToDateKey for NaiveDate {
    fn date_key(&self) -> DateKey {
        to_date_key(self.year(), self.month(), self.day())
    }
}

impl ToDateKey for NaiveDateTime {
    fn date_key(&self) -> DateKey {
        self.date().date_key()
    }
}

impl<Tz: TimeZone> ToDateKey for DateTime<Tz> {
    fn date_key(&self) -> DateKey {
        self.date_naive().date_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rule() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2025));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(-4));
    }

    #[test]
    fn february_length_follows_leap_rule() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn first_weekday_matches_chrono() {
        for (year, month) in [(2025, 2), (2025, 6), (2024, 9), (1970, 1), (2000, 1), (1600, 3)] {
            let expected = NaiveDate::from_ymd_opt(year, month, 1)
                .expect("valid date")
                .weekday()
                .num_days_from_sunday();
            assert_eq!(first_weekday_of_month(year, month), expected, "{year}-{month}");
        }
        // February 2025 starts on a Saturday.
        assert_eq!(first_weekday_of_month(2025, 2), 6);
    }

    #[test]
    fn keys_are_zero_padded_but_year_is_not() {
        assert_eq!(to_date_key(2025, 6, 4).as_str(), "2025-06-04");
        assert_eq!(to_date_key(800, 1, 5).as_str(), "800-01-05");
        assert_eq!(to_date_key(-44, 3, 15).as_str(), "-44-03-15");
    }

    #[test]
    fn key_parse_handles_negative_years() {
        assert_eq!(from_date_key("-44-03-15"), Ok((-44, 3, 15)));
        assert_eq!(from_date_key("800-01-05"), Ok((800, 1, 5)));
    }

    #[test]
    fn key_parse_rejects_malformed_input() {
        assert!(matches!(
            from_date_key("2025-06"),
            Err(DateParseError::SegmentCount { found: 2, .. })
        ));
        assert!(matches!(
            from_date_key("2025-06-24-01"),
            Err(DateParseError::SegmentCount { found: 4, .. })
        ));
        assert!(matches!(
            from_date_key("2025-ab-24"),
            Err(DateParseError::NonNumeric { .. })
        ));
        assert!(matches!(
            from_date_key("2025--24"),
            Err(DateParseError::NonNumeric { .. })
        ));
        assert!(matches!(
            from_date_key("2025-02-30"),
            Err(DateParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            from_date_key("99999999999-01-01"),
            Err(DateParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn date_key_from_str_normalizes() {
        let key: DateKey = "2025-6-4".parse().expect("parse key");
        assert_eq!(key.as_str(), "2025-06-04");
    }

    #[test]
    fn event_dates_are_day_first() {
        assert_eq!(
            parse_event_date("24/06/2025"),
            Ok(CalendarDate {
                year: 2025,
                month: 6,
                day: 24
            })
        );
        assert_eq!(parse_event_date(" 1/2/2024 ").map(CalendarDate::key), Ok(to_date_key(2024, 2, 1)));
        assert!(parse_event_date("2025-06-24").is_err());
        assert!(parse_event_date("31/04/2025").is_err());
        assert!(parse_event_date("xx/06/2025").is_err());
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 24).expect("valid date");
        let morning = date.and_hms_opt(8, 0, 0).expect("valid time");
        let night = date.and_hms_opt(23, 59, 59).expect("valid time");
        assert!(is_same_calendar_day(&morning, &night));
        assert!(is_same_calendar_day(
            &morning,
            &CalendarDate::new(2025, 6, 24).expect("valid date")
        ));
        assert!(!is_same_calendar_day(&morning, &date.succ_opt().expect("next day")));
    }

    #[test]
    fn day_arithmetic_crosses_month_and_year() {
        let date = CalendarDate::new(2024, 12, 31).expect("valid date");
        assert_eq!(date.add_days(1), CalendarDate::new(2025, 1, 1).expect("valid date"));
        assert_eq!(
            CalendarDate::new(2024, 3, 1).expect("valid date").add_days(-1),
            CalendarDate::new(2024, 2, 29).expect("valid date")
        );
        assert_eq!(CalendarDate::new(1970, 1, 1).expect("valid date").days_since_epoch(), 0);
    }

    #[test]
    fn calendar_date_orders_chronologically() {
        let a = CalendarDate::new(2024, 12, 31).expect("valid date");
        let b = CalendarDate::new(2025, 1, 1).expect("valid date");
        assert!(a < b);
    }

    #[test]
    fn deserialize_rejects_impossible_dates() {
        let date: CalendarDate =
            serde_json::from_str(r#"{"year":2024,"month":2,"day":29}"#).expect("valid date");
        assert_eq!(date, CalendarDate::new(2024, 2, 29).expect("valid date"));

        for raw in [
            r#"{"year":2025,"month":0,"day":0}"#,
            r#"{"year":2025,"month":13,"day":1}"#,
            r#"{"year":2025,"month":2,"day":29}"#,
        ] {
            assert!(serde_json::from_str::<CalendarDate>(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn day_counts_past_the_year_range_saturate() {
        let last = CalendarDate::new(i32::MAX, 12, 31).expect("valid date");
        assert_eq!(last.add_days(4).year, i32::MAX);
        let first = CalendarDate::new(i32::MIN, 1, 1).expect("valid date");
        assert_eq!(first.add_days(-1).year, i32::MIN);
    }
}
