use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidOutputMode,
    EventSourceUnreadable,
    InvalidDate,
    InvalidMonth,
    InvalidTime,
    PickerDisabled,
    InvalidPickerAction,
    DateNotSelectable,
    InternalUnexpected,
}

impl ErrorCode {
    pub const ALL: [Self; 10] = [
        Self::ConfigParseError,
        Self::InvalidOutputMode,
        Self::EventSourceUnreadable,
        Self::InvalidDate,
        Self::InvalidMonth,
        Self::InvalidTime,
        Self::PickerDisabled,
        Self::InvalidPickerAction,
        Self::DateNotSelectable,
        Self::InternalUnexpected,
    ];

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidOutputMode => "E1002",
            Self::EventSourceUnreadable => "E1003",
            Self::InvalidDate => "E2001",
            Self::InvalidMonth => "E2002",
            Self::InvalidTime => "E2003",
            Self::PickerDisabled => "E3001",
            Self::InvalidPickerAction => "E3002",
            Self::DateNotSelectable => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidOutputMode => "Invalid output mode",
            Self::EventSourceUnreadable => "Event source could not be read",
            Self::InvalidDate => "Invalid date",
            Self::InvalidMonth => "Invalid month",
            Self::InvalidTime => "Invalid time",
            Self::PickerDisabled => "Picker is disabled",
            Self::InvalidPickerAction => "Action not valid in the current picker state",
            Self::DateNotSelectable => "Date is not selectable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .dashcal/config.toml and retry."),
            Self::InvalidOutputMode => Some("Use one of: pretty, text, json."),
            Self::EventSourceUnreadable => {
                Some("Pass a JSON array of {date, status, id} objects.")
            }
            Self::InvalidDate => Some("Use YYYY-MM-DD (event sources use DD/MM/YYYY)."),
            Self::InvalidMonth => Some("Use YYYY-MM with a month between 01 and 12."),
            Self::InvalidTime => Some("Use 24-hour HH:MM, for example 14:05."),
            Self::PickerDisabled => Some("Enable the picker before interacting with it."),
            Self::InvalidPickerAction => Some("Open the picker first; edit actions need begin-edit."),
            Self::DateNotSelectable => {
                Some("Pick an in-month day on or after today and the minimum date.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
