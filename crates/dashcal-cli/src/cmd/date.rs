//! `dcal date`: drive the date picker through a scripted interaction.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::Context;
use clap::Args;
use dashcal_core::calendar::{CalendarDate, EventIndex, EventRecord};
use dashcal_core::geometry::{Point, Rect};
use dashcal_core::picker::{DatePicker, DateView, DismissEvent, ListenerHub};
use dashcal_core::wall_clock::WallClock;
use serde::Serialize;

use super::grid::{MonthReport, write_month};
use super::{ActionParseError, MonthOutOfRange, load_events, pinned_clock, split_action};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

const PICKER_BOUNDS: Rect = Rect::new(0.0, 0.0, 320.0, 360.0);
const OUTSIDE_POINT: Point = Point::new(-10.0, -10.0);

const DATE_ACTIONS: &str = "open, next, prev, years, months, year=YYYY, month=1-12, \
     select=YYYY-MM-DD, cancel, escape, outside, inside, disable, enable";

/// Arguments for `dcal date`.
#[derive(Args, Debug)]
pub struct DateArgs {
    /// Current host value.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub value: Option<CalendarDate>,

    /// Earliest selectable day. Days before today are never selectable.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub min: Option<CalendarDate>,

    /// Pin "today" instead of reading the system clock.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<CalendarDate>,

    /// Overlay events from this JSON file on the day grid.
    #[arg(long, value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// Actions to apply in order, e.g. `open next select=2025-07-04`.
    #[arg(value_name = "ACTION")]
    pub actions: Vec<String>,
}

/// One scripted interaction with the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAction {
    Open,
    Next,
    Prev,
    Years,
    Months,
    Year(i32),
    /// 1-based, as typed.
    Month(u32),
    Select(CalendarDate),
    Cancel,
    Escape,
    Outside,
    Inside,
    Disable(bool),
}

impl FromStr for DateAction {
    type Err = ActionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || ActionParseError {
            action: raw.to_string(),
            expected: DATE_ACTIONS,
        };

        let action = match split_action(raw) {
            ("open", None) => Self::Open,
            ("next", None) => Self::Next,
            ("prev", None) => Self::Prev,
            ("years", None) => Self::Years,
            ("months", None) => Self::Months,
            ("year", Some(value)) => Self::Year(value.parse().map_err(|_| unknown())?),
            ("month", Some(value)) => Self::Month(value.parse().map_err(|_| unknown())?),
            ("select", Some(value)) => Self::Select(value.parse().map_err(|_| unknown())?),
            ("cancel", None) => Self::Cancel,
            ("escape", None) => Self::Escape,
            ("outside", None) => Self::Outside,
            ("inside", None) => Self::Inside,
            ("disable", None) => Self::Disable(true),
            ("enable", None) => Self::Disable(false),
            _ => return Err(unknown()),
        };
        Ok(action)
    }
}

#[derive(Debug, Serialize)]
struct StepReport {
    action: String,
    result: String,
}

#[derive(Debug, Serialize)]
struct DateReport {
    value: Option<String>,
    open: bool,
    view: Option<DateView>,
    cursor: String,
    earliest_selectable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_options: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<MonthReport>,
    changes: Vec<String>,
    listeners: usize,
    steps: Vec<StepReport>,
}

/// Execute `dcal date`.
pub fn run_date(
    args: &DateArgs,
    year_span: u32,
    max_visible: usize,
    output: OutputMode,
) -> anyhow::Result<()> {
    let actions = args
        .actions
        .iter()
        .map(|raw| raw.parse::<DateAction>())
        .collect::<Result<Vec<_>, _>>()?;

    let records: Vec<EventRecord> = match &args.events {
        Some(path) => load_events(path)?,
        None => Vec::new(),
    };
    let (index, skipped) = EventIndex::build(&records);
    if !skipped.is_empty() {
        tracing::warn!(count = skipped.len(), "skipped events with malformed dates");
    }

    let hub = ListenerHub::new();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);

    let clock = pinned_clock(args.today, None);
    let mut picker = DatePicker::new(clock, hub.clone())
        .with_year_span(year_span)
        .with_events(&index)
        .on_change(move |value| sink.borrow_mut().push(value.to_string()));
    let value = args.value.map(|d| d.key().to_string());
    let min = args.min.map(|d| d.key().to_string());
    picker.set_value(value.as_deref())?;
    picker.set_min_date(min.as_deref())?;
    picker.set_bounds(PICKER_BOUNDS);

    let mut steps = Vec::with_capacity(actions.len());
    for (i, (raw, action)) in args.actions.iter().zip(&actions).enumerate() {
        let result = apply_action(&mut picker, *action)
            .with_context(|| format!("action {} ('{raw}') failed", i + 1))?;
        tracing::debug!(step = i + 1, action = %raw, %result, "date picker step");
        steps.push(StepReport {
            action: raw.clone(),
            result,
        });
    }

    let view = picker.view();
    let report = DateReport {
        value: picker.value(),
        open: picker.is_open(),
        view,
        cursor: picker.cursor().to_string(),
        earliest_selectable: picker.earliest_selectable().key().to_string(),
        year_options: (view == Some(DateView::Years)).then(|| picker.year_options()),
        month: (view == Some(DateView::Days))
            .then(|| MonthReport::new(&picker.grid(), max_visible)),
        changes: changes.borrow().clone(),
        listeners: hub.active(),
        steps,
    };
    render_mode(output, &report, render_date_text, render_date_pretty)
}

fn apply_action<C: WallClock>(picker: &mut DatePicker<'_, C>, action: DateAction) -> anyhow::Result<String> {
    let result = match action {
        DateAction::Open => {
            picker.open()?;
            format!("open on {}", picker.cursor())
        }
        DateAction::Next => format!("showing {}", picker.next_month()?),
        DateAction::Prev => format!("showing {}", picker.prev_month()?),
        DateAction::Years => view_label(picker.toggle_year_list()?).to_string(),
        DateAction::Months => view_label(picker.toggle_month_list()?).to_string(),
        DateAction::Year(year) => format!("showing {}", picker.pick_year(year)?),
        DateAction::Month(month) => {
            let month0 = month
                .checked_sub(1)
                .filter(|month0| *month0 < 12)
                .ok_or(MonthOutOfRange { month })?;
            format!("showing {}", picker.pick_month(month0)?)
        }
        DateAction::Select(date) => format!("selected {}", picker.select(date)?),
        DateAction::Cancel => {
            picker.cancel()?;
            "cancelled".to_string()
        }
        DateAction::Escape => dismissal(picker.handle_dismiss(DismissEvent::Escape)),
        DateAction::Outside => dismissal(picker.handle_dismiss(DismissEvent::PointerDown(OUTSIDE_POINT))),
        DateAction::Inside => dismissal(
            picker.handle_dismiss(DismissEvent::PointerDown(PICKER_BOUNDS.center())),
        ),
        DateAction::Disable(disabled) => {
            picker.set_disabled(disabled);
            let label = if disabled { "disabled" } else { "enabled" };
            label.to_string()
        }
    };
    Ok(result)
}

const fn view_label(view: DateView) -> &'static str {
    match view {
        DateView::Days => "day grid",
        DateView::Years => "year list",
        DateView::Months => "month list",
    }
}

fn dismissal(handled: bool) -> String {
    let label = if handled { "handled" } else { "ignored" };
    label.to_string()
}

fn render_date_text(report: &DateReport, w: &mut dyn Write) -> io::Result<()> {
    let view = report.view.map_or("closed", view_label);
    writeln!(
        w,
        "value={} view={view} cursor={}",
        report.value.as_deref().unwrap_or("-"),
        report.cursor
    )?;
    for change in &report.changes {
        writeln!(w, "change {change}")?;
    }
    Ok(())
}

fn render_date_pretty(report: &DateReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Date picker")?;
    for (i, step) in report.steps.iter().enumerate() {
        writeln!(w, "{:>3}. {:<20} {}", i + 1, step.action, step.result)?;
    }
    if !report.steps.is_empty() {
        writeln!(w)?;
    }
    pretty_kv(w, "Value", report.value.as_deref().unwrap_or("(none)"))?;
    pretty_kv(w, "View", report.view.map_or("closed", view_label))?;
    pretty_kv(w, "Earliest", &report.earliest_selectable)?;
    let changes = if report.changes.is_empty() {
        "(none)".to_string()
    } else {
        report.changes.join(", ")
    };
    pretty_kv(w, "onChange", changes)?;

    if let Some(years) = &report.year_options {
        writeln!(w)?;
        let years: Vec<String> = years.iter().map(ToString::to_string).collect();
        writeln!(w, "{}", years.join(" "))?;
    }
    if let Some(month) = &report.month {
        writeln!(w)?;
        write_month(w, month)?;
    }
    Ok(())
}
