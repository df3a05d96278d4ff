//! Hour/minute/AM-PM selection on an analog dial.
//!
//! # States
//!
//! ```text
//!            open                 toggle_mode
//!  Closed ──────────▶ OpenHourMode ◀─────────▶ OpenMinuteMode
//!    ▲                    │                          │
//!    └──── apply/cancel ──┴──────────────────────────┘
//! ```
//!
//! A text edit (double-click on the hour or minute field) can be in progress
//! in either open state. Pointer input and keyboard stepping change only the
//! active ring's value; choosing an hour never switches to minutes on its own.
//!
//! `apply` is the single commit point and yields the 24-hour `HH:MM` string.
//! `cancel` reverts everything done since `open`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

use super::DialMode;
use super::angle::{angle_to_hour, angle_to_minute, point_to_angle};

/// Most digits a text edit accepts.
pub const EDIT_MAX_DIGITS: usize = 2;

/// Errors from parsing a host `HH:MM` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("expected HH:MM, got '{input}'")]
    Format { input: String },

    #[error("'{input}' is not a time of day")]
    OutOfRange { input: String },
}

impl TimeParseError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Format { .. } | Self::OutOfRange { .. } => ErrorCode::InvalidTime,
        }
    }
}

/// Actions issued in a state that does not accept them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DialError {
    #[error("cannot {action}: the clock dial is closed")]
    Closed { action: &'static str },

    #[error("the clock dial is already open")]
    AlreadyOpen,

    #[error("no text edit is in progress")]
    NotEditing,
}

impl DialError {
    #[must_use]
    pub const fn error_code(self) -> ErrorCode {
        match self {
            Self::Closed { .. } | Self::AlreadyOpen | Self::NotEditing => {
                ErrorCode::InvalidPickerAction
            }
        }
    }
}

/// A 12-hour clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
    is_pm: bool,
}

impl ClockTime {
    /// `hour` in `1..=12`, `minute` in `0..=59`.
    #[must_use]
    pub const fn new(hour: u8, minute: u8, is_pm: bool) -> Option<Self> {
        if hour == 0 || hour > 12 || minute > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            is_pm,
        })
    }

    #[must_use]
    pub const fn from_24h(hour24: u8, minute: u8) -> Option<Self> {
        if hour24 > 23 || minute > 59 {
            return None;
        }
        let hour = match hour24 % 12 {
            0 => 12,
            h => h,
        };
        Some(Self {
            hour,
            minute,
            is_pm: hour24 >= 12,
        })
    }

    /// Seconds are dropped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_naive(time: NaiveTime) -> Self {
        let hour = match time.hour12().1 {
            0 => 12,
            h => h as u8,
        };
        Self {
            hour,
            minute: time.minute() as u8,
            is_pm: time.hour12().0,
        }
    }

    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    #[must_use]
    pub const fn is_pm(self) -> bool {
        self.is_pm
    }

    /// 12 AM is hour 0, 12 PM is hour 12.
    #[must_use]
    pub const fn hour24(self) -> u8 {
        match (self.is_pm, self.hour) {
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, 12) => 0,
            (false, h) => h,
        }
    }

    /// Canonical zero-padded 24-hour `HH:MM`.
    #[must_use]
    pub fn to_hhmm(self) -> String {
        format!("{:02}:{:02}", self.hour24(), self.minute)
    }

    /// Parse a 24-hour `H:MM` or `HH:MM` value.
    ///
    /// # Errors
    ///
    /// [`TimeParseError::Format`] unless both sides are one or two digits,
    /// [`TimeParseError::OutOfRange`] for an hour above 23 or minute above 59.
    pub fn parse_hhmm(raw: &str) -> Result<Self, TimeParseError> {
        let format_err = || TimeParseError::Format {
            input: raw.to_string(),
        };
        let (hour, minute) = raw.trim().split_once(':').ok_or_else(format_err)?;
        let digits = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(hour) || !digits(minute) {
            return Err(format_err());
        }
        let hour: u8 = hour.parse().map_err(|_| format_err())?;
        let minute: u8 = minute.parse().map_err(|_| format_err())?;
        Self::from_24h(hour, minute).ok_or_else(|| TimeParseError::OutOfRange {
            input: raw.to_string(),
        })
    }

    const fn with_hour(self, hour: u8) -> Self {
        Self { hour, ..self }
    }

    const fn with_minute(self, minute: u8) -> Self {
        Self { minute, ..self }
    }

    const fn value(self, field: DialMode) -> u8 {
        match field {
            DialMode::Hour => self.hour,
            DialMode::Minute => self.minute,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hhmm())
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

/// Dial lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialState {
    Closed,
    OpenHourMode,
    OpenMinuteMode,
}

impl DialState {
    #[must_use]
    pub const fn mode(self) -> Option<DialMode> {
        match self {
            Self::Closed => None,
            Self::OpenHourMode => Some(DialMode::Hour),
            Self::OpenMinuteMode => Some(DialMode::Minute),
        }
    }

    const fn open_in(mode: DialMode) -> Self {
        match mode {
            DialMode::Hour => Self::OpenHourMode,
            DialMode::Minute => Self::OpenMinuteMode,
        }
    }
}

/// Digits typed into the hour or minute field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    field: DialMode,
    buffer: String,
}

impl TextEdit {
    fn seeded(field: DialMode, time: ClockTime) -> Self {
        let buffer = match field {
            DialMode::Hour => time.hour.to_string(),
            DialMode::Minute => format!("{:02}", time.minute),
        };
        Self { field, buffer }
    }

    #[must_use]
    pub const fn field(&self) -> DialMode {
        self.field
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Digits only, at most [`EDIT_MAX_DIGITS`]. Returns whether `ch` was kept.
    fn push(&mut self, ch: char) -> bool {
        if !ch.is_ascii_digit() || self.buffer.len() >= EDIT_MAX_DIGITS {
            return false;
        }
        self.buffer.push(ch);
        true
    }

    /// Clamp the buffer into the field's range.
    fn resolve(&self) -> u8 {
        let (min, max) = match self.field {
            DialMode::Hour => (1, 12),
            DialMode::Minute => (0, 59),
        };
        clamp_entry(&self.buffer, min, max)
    }
}

/// Out-of-range input clamps to the nearer bound. An empty entry takes the
/// lower bound; a digit run too long for `u32` takes the upper one.
fn clamp_entry(raw: &str, min: u8, max: u8) -> u8 {
    if raw.is_empty() {
        return min;
    }
    raw.parse::<u32>().map_or(max, |value| {
        u8::try_from(value.clamp(u32::from(min), u32::from(max))).unwrap_or(max)
    })
}

/// The dial state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSelectionState {
    state: DialState,
    /// Value as of the last `open` or `apply`; `cancel` returns here.
    committed: ClockTime,
    pending: ClockTime,
    editing: Option<TextEdit>,
}

impl ClockSelectionState {
    #[must_use]
    pub const fn new(initial: ClockTime) -> Self {
        Self {
            state: DialState::Closed,
            committed: initial,
            pending: initial,
            editing: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> DialState {
        self.state
    }

    #[must_use]
    pub const fn mode(&self) -> Option<DialMode> {
        self.state.mode()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.state, DialState::Closed)
    }

    /// The selection as currently shown, including uncommitted changes.
    #[must_use]
    pub const fn pending(&self) -> ClockTime {
        self.pending
    }

    #[must_use]
    pub const fn committed(&self) -> ClockTime {
        self.committed
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&TextEdit> {
        self.editing.as_ref()
    }

    /// Replace the committed value from outside. Only allowed while closed,
    /// so a host update never clobbers an interaction in progress.
    ///
    /// # Errors
    ///
    /// [`DialError::AlreadyOpen`] while the dial is open.
    pub fn reset(&mut self, value: ClockTime) -> Result<(), DialError> {
        if self.is_open() {
            return Err(DialError::AlreadyOpen);
        }
        self.committed = value;
        self.pending = value;
        Ok(())
    }

    /// `Closed -> OpenHourMode`. Always starts on the hour ring with no edit.
    ///
    /// # Errors
    ///
    /// [`DialError::AlreadyOpen`] if the dial is open.
    pub fn open(&mut self) -> Result<(), DialError> {
        if self.is_open() {
            return Err(DialError::AlreadyOpen);
        }
        self.state = DialState::OpenHourMode;
        self.pending = self.committed;
        self.editing = None;
        tracing::debug!(value = %self.committed, "clock dial opened");
        Ok(())
    }

    /// Switch between the hour and minute rings. Values are untouched.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn toggle_mode(&mut self) -> Result<DialMode, DialError> {
        let mode = self.require_open("toggle mode")?.toggled();
        self.state = DialState::open_in(mode);
        Ok(mode)
    }

    /// Jump to a specific ring.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn set_mode(&mut self, mode: DialMode) -> Result<(), DialError> {
        self.require_open("set mode")?;
        self.state = DialState::open_in(mode);
        Ok(())
    }

    /// Snap `angle` onto the active ring and store it. Returns the new value.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn select_angle(&mut self, angle: f64) -> Result<u8, DialError> {
        let value = match self.require_open("select on the dial")? {
            DialMode::Hour => {
                let hour = angle_to_hour(angle);
                self.pending = self.pending.with_hour(hour);
                hour
            }
            DialMode::Minute => {
                let minute = angle_to_minute(angle);
                self.pending = self.pending.with_minute(minute);
                minute
            }
        };
        tracing::trace!(angle, value, "dial snapped");
        Ok(value)
    }

    /// Pointer at offset `(dx, dy)` from the dial center.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn select_point(&mut self, dx: f64, dy: f64) -> Result<u8, DialError> {
        self.select_angle(point_to_angle(dx, dy))
    }

    /// Arrow-key stepping of the active ring, wrapping at the ends.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn step(&mut self, delta: i32) -> Result<u8, DialError> {
        let mode = self.require_open("step")?;
        let value = match mode {
            DialMode::Hour => {
                // 1..=12 stepped as 0..=11.
                let hour = wrap(i32::from(self.pending.hour) - 1 + delta.rem_euclid(12), 12) + 1;
                self.pending = self.pending.with_hour(hour);
                hour
            }
            DialMode::Minute => {
                let minute = wrap(i32::from(self.pending.minute) + delta.rem_euclid(60), 60);
                self.pending = self.pending.with_minute(minute);
                minute
            }
        };
        Ok(value)
    }

    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn set_period(&mut self, is_pm: bool) -> Result<(), DialError> {
        self.require_open("set AM/PM")?;
        self.pending.is_pm = is_pm;
        Ok(())
    }

    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn toggle_period(&mut self) -> Result<bool, DialError> {
        self.require_open("toggle AM/PM")?;
        self.pending.is_pm = !self.pending.is_pm;
        Ok(self.pending.is_pm)
    }

    /// Double-click on a field: start a text edit seeded with its value.
    /// Replaces any edit already in progress without committing it.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn begin_edit(&mut self, field: DialMode) -> Result<(), DialError> {
        self.require_open("edit")?;
        self.editing = Some(TextEdit::seeded(field, self.pending));
        Ok(())
    }

    /// Type one character. Non-digits and digits past the limit are dropped;
    /// returns whether `ch` was kept.
    ///
    /// # Errors
    ///
    /// [`DialError::NotEditing`] with no edit in progress.
    pub fn edit_input(&mut self, ch: char) -> Result<bool, DialError> {
        Ok(self.require_edit()?.push(ch))
    }

    /// Replace the whole buffer, keeping only what typing would have kept.
    ///
    /// # Errors
    ///
    /// [`DialError::NotEditing`] with no edit in progress.
    pub fn edit_replace(&mut self, text: &str) -> Result<(), DialError> {
        let edit = self.require_edit()?;
        edit.buffer.clear();
        for ch in text.chars() {
            edit.push(ch);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// [`DialError::NotEditing`] with no edit in progress.
    pub fn edit_backspace(&mut self) -> Result<(), DialError> {
        self.require_edit()?.buffer.pop();
        Ok(())
    }

    /// Enter: clamp the typed value into range and store it.
    ///
    /// # Errors
    ///
    /// [`DialError::NotEditing`] with no edit in progress.
    pub fn commit_edit(&mut self) -> Result<u8, DialError> {
        let edit = self.editing.take().ok_or(DialError::NotEditing)?;
        let value = edit.resolve();
        self.pending = match edit.field {
            DialMode::Hour => self.pending.with_hour(value),
            DialMode::Minute => self.pending.with_minute(value),
        };
        Ok(value)
    }

    /// Escape: drop the typed text; the field keeps its value from before
    /// the edit began.
    ///
    /// # Errors
    ///
    /// [`DialError::NotEditing`] with no edit in progress.
    pub fn discard_edit(&mut self) -> Result<u8, DialError> {
        let edit = self.editing.take().ok_or(DialError::NotEditing)?;
        Ok(self.pending.value(edit.field))
    }

    /// Commit and close, returning the `HH:MM` value.
    ///
    /// A text edit still in progress is committed first, so the result
    /// reflects the last thing the user did.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn apply(&mut self) -> Result<String, DialError> {
        self.require_open("apply")?;
        if self.editing.is_some() {
            self.commit_edit()?;
        }
        self.committed = self.pending;
        self.state = DialState::Closed;
        let value = self.committed.to_hhmm();
        tracing::debug!(%value, "clock dial applied");
        Ok(value)
    }

    /// Close and revert to the value held when the dial was opened.
    ///
    /// # Errors
    ///
    /// [`DialError::Closed`] while closed.
    pub fn cancel(&mut self) -> Result<(), DialError> {
        self.require_open("cancel")?;
        self.pending = self.committed;
        self.editing = None;
        self.state = DialState::Closed;
        tracing::debug!(value = %self.committed, "clock dial cancelled");
        Ok(())
    }

    const fn require_open(&self, action: &'static str) -> Result<DialMode, DialError> {
        match self.state.mode() {
            Some(mode) => Ok(mode),
            None => Err(DialError::Closed { action }),
        }
    }

    fn require_edit(&mut self) -> Result<&mut TextEdit, DialError> {
        self.editing.as_mut().ok_or(DialError::NotEditing)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn wrap(value: i32, modulus: i32) -> u8 {
    value.rem_euclid(modulus) as u8
}
