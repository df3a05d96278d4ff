//! Calendar page controller: a browsable month with an event overlay.
//!
//! Unlike the date picker, the page never disables days. Only in-month cells
//! can be selected.

use crate::picker::PickerError;
use crate::wall_clock::WallClock;

use super::cursor::MonthCursor;
use super::date_math::CalendarDate;
use super::events::{Event, EventIndex, EventRecord, MAX_VISIBLE_EVENTS, SkipReport};
use super::grid::{GridBuilder, MonthGrid};

pub struct CalendarPage<'a, C> {
    clock: C,
    cursor: MonthCursor,
    selected: Option<CalendarDate>,
    index: EventIndex<'a>,
    skipped: SkipReport,
    max_visible_events: usize,
}

impl<'a, C: WallClock> CalendarPage<'a, C> {
    /// Open on today's month with `records` indexed.
    pub fn new(clock: C, records: &'a [EventRecord]) -> Self {
        let cursor = MonthCursor::containing(clock.today());
        let (index, skipped) = EventIndex::build(records);
        Self {
            clock,
            cursor,
            selected: None,
            index,
            skipped,
            max_visible_events: MAX_VISIBLE_EVENTS,
        }
    }

    #[must_use]
    pub const fn with_max_visible_events(mut self, max: usize) -> Self {
        self.max_visible_events = max;
        self
    }

    /// Replace the event source and rebuild the index.
    pub fn set_events(&mut self, records: &'a [EventRecord]) -> &SkipReport {
        let (index, skipped) = EventIndex::build(records);
        self.index = index;
        self.skipped = skipped;
        &self.skipped
    }

    #[must_use]
    pub const fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    #[must_use]
    pub const fn selected(&self) -> Option<CalendarDate> {
        self.selected
    }

    #[must_use]
    pub const fn index(&self) -> &EventIndex<'a> {
        &self.index
    }

    /// Records left out of the current index.
    #[must_use]
    pub const fn skipped(&self) -> &SkipReport {
        &self.skipped
    }

    #[must_use]
    pub const fn max_visible_events(&self) -> usize {
        self.max_visible_events
    }

    pub fn next_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.next();
        self.cursor
    }

    pub fn prev_month(&mut self) -> MonthCursor {
        self.cursor = self.cursor.prev();
        self.cursor
    }

    pub fn jump_to(&mut self, cursor: MonthCursor) {
        self.cursor = cursor;
    }

    pub fn go_to_today(&mut self) -> MonthCursor {
        self.cursor = MonthCursor::containing(self.clock.today());
        self.cursor
    }

    /// # Errors
    ///
    /// [`PickerError::NotSelectable`] when `date` is outside the shown month.
    pub fn select(&mut self, date: CalendarDate) -> Result<&[Event<'a>], PickerError> {
        if !self.cursor.contains(date) {
            return Err(PickerError::NotSelectable { date });
        }
        self.selected = Some(date);
        Ok(self.index.lookup_date(date))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn events_on(&self, date: CalendarDate) -> &[Event<'a>] {
        self.index.lookup_date(date)
    }

    #[must_use]
    pub fn grid(&self) -> MonthGrid<'_> {
        GridBuilder::new(self.cursor, self.clock.today())
            .selected(self.selected)
            .events(&self.index)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::wall_clock::FixedClock;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date"))
    }

    fn records() -> Vec<EventRecord> {
        vec![
            EventRecord::new("24/06/2025", "Issue Date", "req-s-20012"),
            EventRecord::new("24/06/2025", "Returning Date", "req-s-20014"),
            EventRecord::new("31/02/2025", "Issue Date", "bad"),
        ]
    }

    #[test]
    fn opens_on_today_and_reports_skips() {
        let source = records();
        let page = CalendarPage::new(clock(), &source);
        assert_eq!(page.cursor().to_string(), "2025-06");
        assert_eq!(page.index().len(), 2);
        assert_eq!(page.skipped().len(), 1);
        assert_eq!(page.skipped().iter().next().map(|s| s.id.as_str()), Some("bad"));
    }

    #[test]
    fn select_returns_the_days_events() {
        let source = records();
        let mut page = CalendarPage::new(clock(), &source);
        let ids: Vec<&str> = page
            .select(date(2025, 6, 24))
            .expect("in month")
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, ["req-s-20012", "req-s-20014"]);
        assert!(page.grid().cell(date(2025, 6, 24)).expect("cell").is_selected);
    }

    #[test]
    fn past_days_stay_selectable() {
        let source = records();
        let mut page = CalendarPage::new(clock(), &source);
        assert!(page.select(date(2025, 6, 1)).is_ok());
        assert!(page.grid().cells.iter().all(|c| !c.is_disabled));
    }

    #[test]
    fn out_of_month_days_are_rejected() {
        let source = records();
        let mut page = CalendarPage::new(clock(), &source);
        assert!(page.select(date(2025, 7, 1)).is_err());
        assert_eq!(page.selected(), None);
    }

    #[test]
    fn navigation_and_today() {
        let source = records();
        let mut page = CalendarPage::new(clock(), &source);
        page.prev_month();
        page.prev_month();
        assert_eq!(page.cursor().to_string(), "2025-04");
        page.jump_to(MonthCursor::new(1999, 11).expect("cursor"));
        assert_eq!(page.next_month().to_string(), "2000-01");
        assert_eq!(page.go_to_today().to_string(), "2025-06");
    }

    #[test]
    fn replacing_events_rebuilds_the_index() {
        let first = records();
        let second = vec![EventRecord::new("01/06/2025", "other", "x")];
        let mut page = CalendarPage::new(clock(), &first);
        assert!(page.set_events(&second).is_empty());
        assert!(page.events_on(date(2025, 6, 24)).is_empty());
        assert_eq!(page.events_on(date(2025, 6, 1)).len(), 1);
    }
}
