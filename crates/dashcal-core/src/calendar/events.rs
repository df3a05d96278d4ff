//! Date-keyed event index.
//!
//! The hosting page owns a flat list of [`EventRecord`]s whose dates arrive
//! as `DD/MM/YYYY` strings. [`EventIndex::build`] parses each one into a
//! [`DateKey`] and buckets it; records whose dates do not parse are left out
//! and reported in a [`SkipReport`] rather than dropped silently.
//!
//! Indexed [`Event`]s borrow their id from the source record, so the index
//! lives no longer than the list it was built from. There is no incremental
//! update: when the source list changes, build a new index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::date_math::{CalendarDate, DateKey, DateParseError, parse_event_date};

/// How many events a grid cell surfaces before summarizing the rest.
pub const MAX_VISIBLE_EVENTS: usize = 3;

/// One row of the external event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// `DD/MM/YYYY`.
    pub date: String,
    pub status: String,
    pub id: String,
}

impl EventRecord {
    pub fn new(date: impl Into<String>, status: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            status: status.into(),
            id: id.into(),
        }
    }
}

/// What an event marks on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    IssueDate,
    ReturningDate,
    Other,
}

impl EventStatus {
    /// Case-insensitive; spaces, `_` and `-` are interchangeable.
    /// Anything unrecognized is [`EventStatus::Other`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "issuedate" => Self::IssueDate,
            "returningdate" => Self::ReturningDate,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IssueDate => "issue_date",
            Self::ReturningDate => "returning_date",
            Self::Other => "other",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IssueDate => "Issue Date",
            Self::ReturningDate => "Returning Date",
            Self::Other => "Other",
        }
    }
}

/// An indexed event. Immutable; the id borrows from the source record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event<'a> {
    pub key: DateKey,
    pub status: EventStatus,
    pub id: &'a str,
}

/// A source record left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEvent {
    pub id: String,
    pub date: String,
    pub reason: String,
    #[serde(skip)]
    pub error: DateParseError,
}

/// Records excluded from an [`EventIndex`] build, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipReport {
    pub skipped: Vec<SkippedEvent>,
}

impl SkipReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkippedEvent> {
        self.skipped.iter()
    }
}

/// Mapping from [`DateKey`] to the events on that day, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventIndex<'a> {
    buckets: BTreeMap<DateKey, Vec<Event<'a>>>,
    total: usize,
}

impl<'a> EventIndex<'a> {
    /// Parse and bucket every record.
    ///
    /// Each record lands in exactly one bucket, the one for its parsed date.
    /// Records with unparseable dates are excluded, logged at `warn`, and
    /// returned in the [`SkipReport`].
    #[must_use]
    pub fn build(records: &'a [EventRecord]) -> (Self, SkipReport) {
        let mut buckets: BTreeMap<DateKey, Vec<Event<'a>>> = BTreeMap::new();
        let mut report = SkipReport::default();
        let mut total = 0;

        for record in records {
            match parse_event_date(&record.date) {
                Ok(date) => {
                    let key = date.key();
                    buckets.entry(key.clone()).or_default().push(Event {
                        key,
                        status: EventStatus::parse(&record.status),
                        id: &record.id,
                    });
                    total += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        id = %record.id,
                        date = %record.date,
                        "skipping event with unparseable date: {error}"
                    );
                    report.skipped.push(SkippedEvent {
                        id: record.id.clone(),
                        date: record.date.clone(),
                        reason: error.to_string(),
                        error,
                    });
                }
            }
        }

        if !report.is_empty() {
            tracing::warn!(
                skipped = report.len(),
                indexed = total,
                "event index built with skipped records"
            );
        }

        (Self { buckets, total }, report)
    }

    /// Events on `key`; empty when there are none.
    #[must_use]
    pub fn lookup(&self, key: &DateKey) -> &[Event<'a>] {
        self.lookup_str(key.as_str())
    }

    /// Like [`lookup`](Self::lookup) for a raw key string. A string that is not
    /// a canonical key simply matches nothing.
    #[must_use]
    pub fn lookup_str(&self, key: &str) -> &[Event<'a>] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn lookup_date(&self, date: CalendarDate) -> &[Event<'a>] {
        self.lookup(&date.key())
    }

    /// Number of indexed events across all days.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct days with at least one event.
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.buckets.len()
    }

    /// Days with events, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &DateKey> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &[Event<'a>])> {
        self.buckets.iter().map(|(key, events)| (key, events.as_slice()))
    }
}

/// The events a cell shows individually plus a count of the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellEvents<'a> {
    pub shown: &'a [Event<'a>],
    pub overflow: usize,
}

/// Split `events` into the first `max_visible` and an overflow count.
#[must_use]
pub fn decorate<'a>(events: &'a [Event<'a>], max_visible: usize) -> CellEvents<'a> {
    let cut = events.len().min(max_visible);
    CellEvents {
        shown: &events[..cut],
        overflow: events.len() - cut,
    }
}
