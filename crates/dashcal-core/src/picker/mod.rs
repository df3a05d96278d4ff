//! Picker controllers: open/close, navigation, and commit for the date-grid
//! and analog-clock widgets.
//!
//! Both controllers report a new value to the host only at their commit
//! point (selecting a day, or `apply` on the clock). While open they hold a
//! dismissal [`Subscription`](listener::Subscription) that is released on
//! every exit path.

pub mod date;
pub mod listener;
pub mod time;

pub use date::{DatePicker, DateView};
pub use listener::{DismissEvent, ListenerHub, ListenerKind, Subscription};
pub use time::TimePicker;

use crate::calendar::{CalendarDate, DateParseError};
use crate::dial::{DialError, TimeParseError};
use crate::error::ErrorCode;

/// Host change callback.
pub type OnChange = Box<dyn FnMut(&str)>;

/// Errors from picker controller actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    #[error("picker is disabled")]
    Disabled,

    #[error("picker is not open")]
    NotOpen,

    #[error("{date} cannot be selected")]
    NotSelectable { date: CalendarDate },

    #[error("month index {0} is outside 0..=11")]
    InvalidMonth(u32),

    #[error(transparent)]
    Dial(#[from] DialError),

    #[error(transparent)]
    Date(#[from] DateParseError),

    #[error(transparent)]
    Time(#[from] TimeParseError),
}

impl PickerError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Disabled => ErrorCode::PickerDisabled,
            Self::NotOpen | Self::Dial(_) => ErrorCode::InvalidPickerAction,
            Self::NotSelectable { .. } => ErrorCode::DateNotSelectable,
            Self::InvalidMonth(_) => ErrorCode::InvalidMonth,
            Self::Date(_) => ErrorCode::InvalidDate,
            Self::Time(_) => ErrorCode::InvalidTime,
        }
    }
}
