//! Month grids, date keys, and date-keyed events.

pub mod cursor;
pub mod date_math;
pub mod events;
pub mod grid;
pub mod page;

pub use cursor::{MONTH_NAMES, MonthCursor, WEEKDAY_LABELS, month_name};
pub use date_math::{
    CalendarDate, DateKey, DateParseError, ToDateKey, days_in_month, first_weekday_of_month,
    from_date_key, is_leap_year, is_same_calendar_day, parse_event_date, to_date_key,
};
pub use events::{
    CellEvents, Event, EventIndex, EventRecord, EventStatus, MAX_VISIBLE_EVENTS, SkipReport,
    SkippedEvent, decorate,
};
pub use grid::{CalendarCell, DAYS_PER_WEEK, GridBuilder, MonthGrid};
pub use page::CalendarPage;
