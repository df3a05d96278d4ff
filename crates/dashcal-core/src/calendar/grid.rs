//! Month grid construction.
//!
//! A grid always covers whole weeks: it starts on the Sunday on or before the
//! 1st and ends on the Saturday on or after the last day, so its length is a
//! multiple of seven. Cells are plain values; any change of cursor, selection,
//! or event set means building a new grid, never patching an old one.
//!
//! `is_today` is evaluated once against the `today` handed to the builder.
//! A grid built just before local midnight stays stale until the next build.

use serde::Serialize;

use super::cursor::MonthCursor;
use super::date_math::{CalendarDate, DateKey};
use super::events::{CellEvents, Event, EventIndex, decorate};

pub const DAYS_PER_WEEK: usize = 7;

/// One day in a [`MonthGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell<'a> {
    pub date: CalendarDate,
    pub key: DateKey,
    /// `false` for the leading and trailing days of neighbouring months.
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    /// Before the grid's earliest selectable day.
    pub is_disabled: bool,
    pub events: &'a [Event<'a>],
}

impl<'a> CalendarCell<'a> {
    /// Only in-month, enabled cells accept a select action.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.in_current_month && !self.is_disabled
    }

    #[must_use]
    pub fn decorated(&self, max_visible: usize) -> CellEvents<'a> {
        decorate(self.events, max_visible)
    }
}

/// The cells for one month, row-major, Sunday first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid<'a> {
    pub cursor: MonthCursor,
    pub today: CalendarDate,
    pub cells: Vec<CalendarCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell<'a>]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.cells.len() / DAYS_PER_WEEK
    }

    #[must_use]
    pub fn cell(&self, date: CalendarDate) -> Option<&CalendarCell<'a>> {
        self.cells.iter().find(|cell| cell.date == date)
    }

    #[must_use]
    pub fn first(&self) -> Option<&CalendarCell<'a>> {
        self.cells.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&CalendarCell<'a>> {
        self.cells.last()
    }
}

/// Builds a [`MonthGrid`] from a cursor plus decoration inputs.
///
/// ```
/// use dashcal_core::calendar::{CalendarDate, GridBuilder, MonthCursor};
///
/// let cursor = MonthCursor::new(2025, 1).expect("february");
/// let today = CalendarDate::new(2025, 2, 10).expect("valid date");
/// let grid = GridBuilder::new(cursor, today).build();
/// assert_eq!(grid.cells.len(), 35);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GridBuilder<'a> {
    cursor: MonthCursor,
    today: CalendarDate,
    selected: Option<CalendarDate>,
    min_selectable: Option<CalendarDate>,
    events: Option<&'a EventIndex<'a>>,
}

impl<'a> GridBuilder<'a> {
    #[must_use]
    pub const fn new(cursor: MonthCursor, today: CalendarDate) -> Self {
        Self {
            cursor,
            today,
            selected: None,
            min_selectable: None,
            events: None,
        }
    }

    #[must_use]
    pub const fn selected(mut self, selected: Option<CalendarDate>) -> Self {
        self.selected = selected;
        self
    }

    /// Days strictly before `min` are marked disabled.
    #[must_use]
    pub const fn min_selectable(mut self, min: Option<CalendarDate>) -> Self {
        self.min_selectable = min;
        self
    }

    #[must_use]
    pub const fn events(mut self, index: &'a EventIndex<'a>) -> Self {
        self.events = Some(index);
        self
    }

    /// Padding days that would fall outside the `i32` year range keep the
    /// boundary year instead of wrapping to the far end of the range.
    #[must_use]
    pub fn build(&self) -> MonthGrid<'a> {
        let cursor = self.cursor;
        let lead = i64::from(cursor.first_weekday());
        let start = cursor.first_day().add_days(-lead);
        let cell_count = i64::from(cursor.row_count()) * 7;

        let cells = (0..cell_count)
            .map(|offset| {
                let date = start.add_days(offset);
                let key = date.key();
                let events = self
                    .events
                    .map(|index| index.lookup(&key))
                    .unwrap_or_default();
                CalendarCell {
                    date,
                    in_current_month: cursor.contains(date),
                    is_today: date == self.today,
                    is_selected: self.selected == Some(date),
                    is_disabled: self.min_selectable.is_some_and(|min| date < min),
                    events,
                    key,
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            cursor = %cursor,
            rows = cells.len() / DAYS_PER_WEEK,
            "built month grid"
        );

        MonthGrid {
            cursor,
            today: self.today,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::events::EventRecord;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    fn cursor(year: i32, month0: u32) -> MonthCursor {
        MonthCursor::new(year, month0).expect("valid cursor")
    }

    #[test]
    fn february_2025_spans_five_weeks() {
        let grid = GridBuilder::new(cursor(2025, 1), date(2025, 2, 10)).build();

        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.row_count(), 5);

        let first = grid.first().expect("first cell");
        assert_eq!(first.date, date(2025, 1, 26));
        assert!(!first.in_current_month);

        let last = grid.last().expect("last cell");
        assert_eq!(last.date, date(2025, 3, 1));
        assert!(!last.in_current_month);

        assert_eq!(grid.cells.iter().filter(|c| c.in_current_month).count(), 28);
    }

    #[test]
    fn rows_start_on_sunday() {
        let grid = GridBuilder::new(cursor(2025, 5), date(2025, 6, 1)).build();
        for row in grid.rows() {
            assert_eq!(row.len(), DAYS_PER_WEEK);
            assert_eq!(row[0].date.weekday(), 0);
        }
    }

    #[test]
    fn six_row_month() {
        // August 2025 starts on a Friday with 31 days.
        let grid = GridBuilder::new(cursor(2025, 7), date(2025, 8, 1)).build();
        assert_eq!(grid.row_count(), 6);
    }

    #[test]
    fn marks_today_and_selection() {
        let grid = GridBuilder::new(cursor(2025, 5), date(2025, 6, 10))
            .selected(Some(date(2025, 6, 12)))
            .build();

        let today: Vec<_> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(2025, 6, 10));

        let selected = grid.cell(date(2025, 6, 12)).expect("cell");
        assert!(selected.is_selected);
    }

    #[test]
    fn days_before_minimum_are_disabled() {
        let grid = GridBuilder::new(cursor(2025, 5), date(2025, 6, 10))
            .min_selectable(Some(date(2025, 6, 10)))
            .build();

        assert!(grid.cell(date(2025, 6, 9)).expect("cell").is_disabled);
        assert!(!grid.cell(date(2025, 6, 9)).expect("cell").is_selectable());
        assert!(grid.cell(date(2025, 6, 10)).expect("cell").is_selectable());
        // Trailing July days are enabled but still not selectable.
        let trailing = grid.cell(date(2025, 7, 1)).expect("cell");
        assert!(!trailing.is_disabled);
        assert!(!trailing.is_selectable());
    }

    #[test]
    fn cells_carry_their_events() {
        let source = vec![
            EventRecord::new("24/06/2025", "Issue Date", "a"),
            EventRecord::new("24/06/2025", "Returning Date", "b"),
            EventRecord::new("01/07/2025", "Issue Date", "c"),
        ];
        let (index, _) = EventIndex::build(&source);
        let grid = GridBuilder::new(cursor(2025, 5), date(2025, 6, 1))
            .events(&index)
            .build();

        assert_eq!(grid.cell(date(2025, 6, 24)).expect("cell").events.len(), 2);
        // Out-of-month cells are still decorated.
        assert_eq!(grid.cell(date(2025, 7, 1)).expect("cell").events.len(), 1);
        assert!(grid.cell(date(2025, 6, 23)).expect("cell").events.is_empty());
    }

    #[test]
    fn padding_days_at_the_year_range_keep_the_boundary_year() {
        let grid = GridBuilder::new(cursor(i32::MAX, 11), date(2025, 1, 1)).build();
        assert!(grid.cells.iter().all(|cell| cell.date.year == i32::MAX));

        let grid = GridBuilder::new(cursor(i32::MIN, 0), date(2025, 1, 1)).build();
        assert!(grid.cells.iter().all(|cell| cell.date.year == i32::MIN));
    }
}
