//! Analog clock dial: angle geometry and the selection state machine.

pub mod angle;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use angle::{
    DialMark, angle_to_hour, angle_to_minute, angle_to_point, dial_marks, hour_to_angle,
    minute_to_angle, point_to_angle,
};
pub use selection::{ClockSelectionState, ClockTime, DialError, DialState, TextEdit, TimeParseError};

use crate::geometry::Point;

/// Which ring of the dial is active. Also names the text field being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialMode {
    Hour,
    Minute,
}

impl DialMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Hour => Self::Minute,
            Self::Minute => Self::Hour,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }
}

/// Tip of the hand for `time` on the `mode` ring.
#[must_use]
pub fn hand_position(time: ClockTime, mode: DialMode, center: Point, radius: f64) -> Point {
    let angle = match mode {
        DialMode::Hour => hour_to_angle(time.hour()),
        DialMode::Minute => minute_to_angle(time.minute()),
    };
    angle_to_point(center, radius, angle)
}
