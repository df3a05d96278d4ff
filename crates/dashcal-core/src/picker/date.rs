use serde::Serialize;

use crate::calendar::{CalendarDate, EventIndex, GridBuilder, MONTH_NAMES, MonthCursor, MonthGrid};
use crate::geometry::Rect;
use crate::wall_clock::{SystemClock, WallClock};

use super::listener::{DismissEvent, DismissGuard, ListenerHub};
use super::{OnChange, PickerError};

/// Years offered in the year list after the first selectable one.
pub const DEFAULT_YEAR_SPAN: u32 = 10;

/// Which panel an open date picker shows. The year and month lists replace
/// the day grid; they are never shown together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateView {
    Days,
    Years,
    Months,
}

/// Calendar-grid date picker bound to a host form field.
///
/// The host value is an optional `YYYY-MM-DD` string. A day is disabled when
/// it falls before today or before the optional minimum date, whichever is
/// later. Selecting an enabled in-month day commits it, closes the picker,
/// and notifies the host.
pub struct DatePicker<'a, C = SystemClock> {
    clock: C,
    hub: ListenerHub,
    value: Option<CalendarDate>,
    min_date: Option<CalendarDate>,
    disabled: bool,
    year_span: u32,
    cursor: MonthCursor,
    view: Option<DateView>,
    events: Option<&'a EventIndex<'a>>,
    bounds: Option<Rect>,
    dismiss: Option<DismissGuard>,
    on_change: Option<OnChange>,
}

impl<'a, C: WallClock> DatePicker<'a, C> {
    pub fn new(clock: C, hub: ListenerHub) -> Self {
        let cursor = MonthCursor::containing(clock.today());
        Self {
            clock,
            hub,
            value: None,
            min_date: None,
            disabled: false,
            year_span: DEFAULT_YEAR_SPAN,
            cursor,
            view: None,
            events: None,
            bounds: None,
            dismiss: None,
            on_change: None,
        }
    }

    /// # Errors
    ///
    /// [`PickerError::Date`] when `value` is not `YYYY-MM-DD`.
    pub fn with_value(mut self, value: Option<&str>) -> Result<Self, PickerError> {
        self.set_value(value)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// [`PickerError::Date`] when `min` is not `YYYY-MM-DD`.
    pub fn with_min_date(mut self, min: Option<&str>) -> Result<Self, PickerError> {
        self.set_min_date(min)?;
        Ok(self)
    }

    #[must_use]
    pub const fn with_year_span(mut self, span: u32) -> Self {
        self.year_span = span;
        self
    }

    /// Decorate grid cells with events from `index`.
    #[must_use]
    pub const fn with_events(mut self, index: &'a EventIndex<'a>) -> Self {
        self.events = Some(index);
        self
    }

    #[must_use]
    pub fn on_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// # Errors
    ///
    /// [`PickerError::Date`] when `value` is not `YYYY-MM-DD`.
    pub fn set_value(&mut self, value: Option<&str>) -> Result<(), PickerError> {
        self.value = value.map(str::parse).transpose()?;
        Ok(())
    }

    /// Inclusive lower bound on selectable days.
    ///
    /// # Errors
    ///
    /// [`PickerError::Date`] when `min` is not `YYYY-MM-DD`.
    pub fn set_min_date(&mut self, min: Option<&str>) -> Result<(), PickerError> {
        self.min_date = min.map(str::parse).transpose()?;
        Ok(())
    }

    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.value.map(|date| date.key().to_string())
    }

    /// Disabling an open picker cancels it.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled && self.is_open() {
            self.close();
        }
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.view.is_some()
    }

    /// `None` while closed.
    #[must_use]
    pub const fn view(&self) -> Option<DateView> {
        self.view
    }

    #[must_use]
    pub const fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    /// The later of today and the minimum date.
    #[must_use]
    pub fn earliest_selectable(&self) -> CalendarDate {
        let today = self.clock.today();
        self.min_date.map_or(today, |min| min.max(today))
    }

    #[must_use]
    pub fn is_date_disabled(&self, date: CalendarDate) -> bool {
        date < self.earliest_selectable()
    }

    /// Open on the day grid of the selected month, or of today's month when
    /// nothing is selected. Opening an open picker does nothing.
    ///
    /// # Errors
    ///
    /// [`PickerError::Disabled`] when disabled.
    pub fn open(&mut self) -> Result<(), PickerError> {
        if self.disabled {
            return Err(PickerError::Disabled);
        }
        if self.is_open() {
            return Ok(());
        }
        self.cursor = MonthCursor::containing(self.value.unwrap_or_else(|| self.clock.today()));
        self.view = Some(DateView::Days);
        self.dismiss = Some(DismissGuard::acquire(&self.hub));
        tracing::debug!(cursor = %self.cursor, "date picker opened");
        Ok(())
    }

    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed.
    pub fn next_month(&mut self) -> Result<MonthCursor, PickerError> {
        self.require_open()?;
        self.cursor = self.cursor.next();
        Ok(self.cursor)
    }

    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed.
    pub fn prev_month(&mut self) -> Result<MonthCursor, PickerError> {
        self.require_open()?;
        self.cursor = self.cursor.prev();
        Ok(self.cursor)
    }

    /// Show the year list, or go back to the day grid if it is showing.
    ///
    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed.
    pub fn toggle_year_list(&mut self) -> Result<DateView, PickerError> {
        self.toggle_list(DateView::Years)
    }

    /// Show the month list, or go back to the day grid if it is showing.
    ///
    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed.
    pub fn toggle_month_list(&mut self) -> Result<DateView, PickerError> {
        self.toggle_list(DateView::Months)
    }

    /// Years in the year list: the first selectable year and the
    /// `year_span` years after it.
    #[must_use]
    pub fn year_options(&self) -> Vec<i32> {
        let first = self.earliest_selectable().year;
        let span = i32::try_from(self.year_span).unwrap_or(i32::MAX);
        (first..=first.saturating_add(span)).collect()
    }

    /// `(month0, name)` pairs for the month list.
    #[must_use]
    pub fn month_options(&self) -> Vec<(u32, &'static str)> {
        (0..12u32).zip(MONTH_NAMES).collect()
    }

    /// Jump to `year` and return to the day grid.
    ///
    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed.
    pub fn pick_year(&mut self, year: i32) -> Result<MonthCursor, PickerError> {
        self.require_open()?;
        self.cursor = self.cursor.with_year(year);
        self.view = Some(DateView::Days);
        Ok(self.cursor)
    }

    /// Jump to `month0` (0-based) and return to the day grid.
    ///
    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed, [`PickerError::InvalidMonth`]
    /// outside `0..=11`.
    pub fn pick_month(&mut self, month0: u32) -> Result<MonthCursor, PickerError> {
        self.require_open()?;
        self.cursor = self
            .cursor
            .with_month(month0)
            .ok_or(PickerError::InvalidMonth(month0))?;
        self.view = Some(DateView::Days);
        Ok(self.cursor)
    }

    /// Day grid for the current cursor, with disablement applied.
    #[must_use]
    pub fn grid(&self) -> MonthGrid<'a> {
        let builder = GridBuilder::new(self.cursor, self.clock.today())
            .selected(self.value)
            .min_selectable(Some(self.earliest_selectable()));
        match self.events {
            Some(index) => builder.events(index).build(),
            None => builder.build(),
        }
    }

    /// Commit `date`, close, and notify the host. Returns the `YYYY-MM-DD`
    /// value.
    ///
    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed; [`PickerError::NotSelectable`]
    /// for a day outside the shown month or a disabled day.
    pub fn select(&mut self, date: CalendarDate) -> Result<String, PickerError> {
        self.require_open()?;
        if !self.cursor.contains(date) || self.is_date_disabled(date) {
            return Err(PickerError::NotSelectable { date });
        }
        self.value = Some(date);
        self.close();
        let value = date.key().to_string();
        tracing::debug!(%value, "date picker committed");
        if let Some(callback) = self.on_change.as_mut() {
            callback(&value);
        }
        Ok(value)
    }

    /// Close without notifying the host.
    ///
    /// # Errors
    ///
    /// [`PickerError::NotOpen`] while closed.
    pub fn cancel(&mut self) -> Result<(), PickerError> {
        self.require_open()?;
        self.close();
        Ok(())
    }

    /// Route a document-level event. A pointer-down outside the bounds or
    /// Escape cancels. Returns whether the picker acted on it.
    pub fn handle_dismiss(&mut self, event: DismissEvent) -> bool {
        if self.dismiss.is_none() {
            return false;
        }
        if let DismissEvent::PointerDown(point) = event {
            match self.bounds {
                Some(bounds) if !bounds.contains(point) => {}
                _ => return false,
            }
        }
        tracing::debug!(?event, "date picker dismissed");
        self.close();
        true
    }

    fn toggle_list(&mut self, list: DateView) -> Result<DateView, PickerError> {
        let current = self.require_open()?;
        let next = if current == list { DateView::Days } else { list };
        self.view = Some(next);
        Ok(next)
    }

    const fn require_open(&self) -> Result<DateView, PickerError> {
        match self.view {
            Some(view) => Ok(view),
            None => Err(PickerError::NotOpen),
        }
    }

    fn close(&mut self) {
        self.view = None;
        self.dismiss = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::NaiveDate;

    use super::*;
    use crate::calendar::EventRecord;
    use crate::geometry::Point;
    use crate::wall_clock::FixedClock;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date"))
    }

    #[test]
    fn opens_on_today_without_value() {
        let mut picker = DatePicker::new(clock(), ListenerHub::new());
        picker.open().expect("open");
        assert_eq!(picker.view(), Some(DateView::Days));
        assert_eq!(picker.cursor().to_string(), "2025-06");
    }

    #[test]
    fn opens_on_value_month() {
        let mut picker = DatePicker::new(clock(), ListenerHub::new())
            .with_value(Some("2025-09-03"))
            .expect("value");
        picker.open().expect("open");
        assert_eq!(picker.cursor().to_string(), "2025-09");
        let grid = picker.grid();
        assert!(grid.cell(date(2025, 9, 3)).expect("cell").is_selected);
    }

    #[test]
    fn past_days_are_disabled() {
        let mut picker = DatePicker::new(clock(), ListenerHub::new());
        picker.open().expect("open");
        let grid = picker.grid();
        assert!(grid.cell(date(2025, 6, 9)).expect("cell").is_disabled);
        assert!(!grid.cell(date(2025, 6, 10)).expect("cell").is_disabled);
        assert_eq!(
            picker.select(date(2025, 6, 9)),
            Err(PickerError::NotSelectable {
                date: date(2025, 6, 9)
            })
        );
        assert!(picker.is_open());
    }

    #[test]
    fn later_minimum_wins() {
        let picker = DatePicker::new(clock(), ListenerHub::new())
            .with_min_date(Some("2025-06-20"))
            .expect("min");
        assert_eq!(picker.earliest_selectable(), date(2025, 6, 20));
        assert!(picker.is_date_disabled(date(2025, 6, 19)));

        let picker = DatePicker::new(clock(), ListenerHub::new())
            .with_min_date(Some("2025-01-01"))
            .expect("min");
        assert_eq!(picker.earliest_selectable(), date(2025, 6, 10));
    }

    #[test]
    fn out_of_month_cells_are_not_selectable() {
        let mut picker = DatePicker::new(clock(), ListenerHub::new());
        picker.open().expect("open");
        assert!(matches!(
            picker.select(date(2025, 7, 1)),
            Err(PickerError::NotSelectable { .. })
        ));
    }

    #[test]
    fn selection_commits_and_notifies() {
        let hub = ListenerHub::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut picker = DatePicker::new(clock(), hub.clone())
            .on_change(move |value| sink.borrow_mut().push(value.to_string()));

        picker.open().expect("open");
        assert_eq!(hub.active(), 2);
        picker.next_month().expect("next");
        assert_eq!(picker.select(date(2025, 7, 4)).as_deref(), Ok("2025-07-04"));
        assert!(!picker.is_open());
        assert_eq!(hub.active(), 0);
        assert_eq!(*log.borrow(), ["2025-07-04"]);
        assert_eq!(picker.value().as_deref(), Some("2025-07-04"));
    }

    #[test]
    fn year_and_month_lists_return_to_days() {
        let mut picker = DatePicker::new(clock(), ListenerHub::new()).with_year_span(2);
        picker.open().expect("open");

        assert_eq!(picker.toggle_year_list(), Ok(DateView::Years));
        assert_eq!(picker.year_options(), [2025, 2026, 2027]);
        assert_eq!(picker.toggle_month_list(), Ok(DateView::Months));
        assert_eq!(picker.pick_month(11).map(|c| c.to_string()).as_deref(), Ok("2025-12"));
        assert_eq!(picker.view(), Some(DateView::Days));

        picker.toggle_year_list().expect("years");
        assert_eq!(picker.toggle_year_list(), Ok(DateView::Days));
        picker.toggle_year_list().expect("years");
        picker.pick_year(2027).expect("year");
        assert_eq!(picker.view(), Some(DateView::Days));
        assert_eq!(picker.cursor().to_string(), "2027-12");

        assert_eq!(picker.pick_month(12), Err(PickerError::InvalidMonth(12)));
        assert_eq!(picker.month_options()[0], (0, "January"));
    }

    #[test]
    fn navigation_requires_open() {
        let mut picker = DatePicker::new(clock(), ListenerHub::new());
        assert_eq!(picker.next_month(), Err(PickerError::NotOpen));
        assert_eq!(picker.cancel(), Err(PickerError::NotOpen));
    }

    #[test]
    fn outside_click_and_escape_cancel() {
        let hub = ListenerHub::new();
        let mut picker = DatePicker::new(clock(), hub.clone())
            .with_value(Some("2025-06-15"))
            .expect("value");
        picker.set_bounds(Rect::new(0.0, 0.0, 300.0, 300.0));

        picker.open().expect("open");
        assert!(!picker.handle_dismiss(DismissEvent::PointerDown(Point::new(10.0, 10.0))));
        assert!(picker.handle_dismiss(DismissEvent::PointerDown(Point::new(400.0, 10.0))));
        assert!(!picker.is_open());
        assert_eq!(hub.active(), 0);
        assert_eq!(picker.value().as_deref(), Some("2025-06-15"));

        picker.open().expect("open");
        assert!(picker.handle_dismiss(DismissEvent::Escape));
        assert!(!picker.is_open());
    }

    #[test]
    fn disabled_picker_is_inert() {
        let hub = ListenerHub::new();
        let mut picker = DatePicker::new(clock(), hub.clone());
        picker.open().expect("open");
        picker.set_disabled(true);
        assert!(!picker.is_open());
        assert_eq!(hub.active(), 0);
        assert_eq!(picker.open(), Err(PickerError::Disabled));
    }

    #[test]
    fn grid_carries_events() {
        let source = vec![EventRecord::new("12/06/2025", "Issue Date", "req-1")];
        let (index, _) = EventIndex::build(&source);
        let mut picker = DatePicker::new(clock(), ListenerHub::new()).with_events(&index);
        picker.open().expect("open");
        assert_eq!(picker.grid().cell(date(2025, 6, 12)).expect("cell").events.len(), 1);
    }
}
