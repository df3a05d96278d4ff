pub mod completions;
pub mod date;
pub mod dial;
pub mod events;
pub mod grid;
pub mod time;

use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDateTime, NaiveTime};
use dashcal_core::calendar::{CalendarDate, Event, EventRecord};
use dashcal_core::dial::ClockTime;
use dashcal_core::error::ErrorCode;
use dashcal_core::wall_clock::{FixedClock, SystemClock, WallClock};
use serde::Serialize;

/// A scripted picker action that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{action}' (expected one of: {expected})")]
pub struct ActionParseError {
    pub action: String,
    pub expected: &'static str,
}

impl ActionParseError {
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidPickerAction
    }
}

/// A `month=N` action outside `1..=12`, reported as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("month {month} is outside 1..=12")]
pub struct MonthOutOfRange {
    pub month: u32,
}

impl MonthOutOfRange {
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidMonth
    }
}

/// Read a JSON array of `{date, status, id}` records.
pub fn load_events(path: &Path) -> anyhow::Result<Vec<EventRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<EventRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as an event list", path.display()))?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded events");
    Ok(records)
}

/// The system clock with `today` and/or the time of day pinned.
pub fn pinned_clock(today: Option<CalendarDate>, now: Option<ClockTime>) -> FixedClock {
    let system = SystemClock.now();
    let date = today
        .and_then(CalendarDate::to_naive)
        .unwrap_or_else(|| system.date());
    let time = now
        .and_then(|t| NaiveTime::from_hms_opt(u32::from(t.hour24()), u32::from(t.minute()), 0))
        .unwrap_or_else(|| system.time());
    FixedClock::new(NaiveDateTime::new(date, time))
}

/// An event as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct EventReport {
    pub id: String,
    pub status: &'static str,
}

impl From<&Event<'_>> for EventReport {
    fn from(event: &Event<'_>) -> Self {
        Self {
            id: event.id.to_string(),
            status: event.status.as_str(),
        }
    }
}

/// Split `key=value`, or return the bare word with no value.
pub fn split_action(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (raw.trim(), None),
    }
}
