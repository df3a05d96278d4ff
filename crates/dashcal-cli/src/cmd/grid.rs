//! `dcal grid`: one month of the calendar page with its event overlay.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use dashcal_core::calendar::{
    CalendarCell, CalendarDate, CalendarPage, MonthCursor, MonthGrid, SkippedEvent,
    WEEKDAY_LABELS,
};
use serde::Serialize;

use super::{EventReport, load_events, pinned_clock};
use crate::output::{OutputMode, pretty_rule, pretty_section, render_mode};

/// Arguments for `dcal grid`.
#[derive(Args, Debug)]
pub struct GridArgs {
    /// Month to show, as YYYY-MM. Defaults to the current month.
    #[arg(long, value_name = "YYYY-MM")]
    pub month: Option<MonthCursor>,

    /// JSON file with an array of {date: "DD/MM/YYYY", status, id} events.
    #[arg(long, value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// Pin "today" instead of reading the system clock.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<CalendarDate>,

    /// Select a day in the shown month.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub select: Option<CalendarDate>,

    /// Events listed per day before the rest are counted [default: from config].
    #[arg(long, value_name = "N")]
    pub max_visible: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CellReport {
    pub date: String,
    pub day: u32,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub events: Vec<EventReport>,
    pub overflow: usize,
}

impl CellReport {
    pub fn new(cell: &CalendarCell<'_>, max_visible: usize) -> Self {
        let decorated = cell.decorated(max_visible);
        Self {
            date: cell.key.to_string(),
            day: cell.date.day,
            in_current_month: cell.in_current_month,
            is_today: cell.is_today,
            is_selected: cell.is_selected,
            is_disabled: cell.is_disabled,
            events: decorated.shown.iter().map(EventReport::from).collect(),
            overflow: decorated.overflow,
        }
    }

    fn event_count(&self) -> usize {
        self.events.len() + self.overflow
    }
}

/// A month grid as printed by the CLI. Rows are Sunday first.
#[derive(Debug, Serialize)]
pub struct MonthReport {
    pub month: String,
    pub name: String,
    pub today: String,
    pub weekdays: [&'static str; 7],
    pub rows: Vec<Vec<CellReport>>,
}

impl MonthReport {
    pub fn new(grid: &MonthGrid<'_>, max_visible: usize) -> Self {
        Self {
            month: grid.cursor.to_string(),
            name: format!("{} {}", grid.cursor.name(), grid.cursor.year()),
            today: grid.today.key().to_string(),
            weekdays: WEEKDAY_LABELS,
            rows: grid
                .rows()
                .map(|row| row.iter().map(|cell| CellReport::new(cell, max_visible)).collect())
                .collect(),
        }
    }

    fn cells(&self) -> impl Iterator<Item = &CellReport> {
        self.rows.iter().flatten()
    }
}

#[derive(Debug, Serialize)]
struct GridReport {
    #[serde(flatten)]
    grid: MonthReport,
    selected: Option<String>,
    skipped: Vec<SkippedEvent>,
}

/// Execute `dcal grid`.
pub fn run_grid(args: &GridArgs, default_max_visible: usize, output: OutputMode) -> anyhow::Result<()> {
    let records = match &args.events {
        Some(path) => load_events(path)?,
        None => Vec::new(),
    };

    let clock = pinned_clock(args.today, None);
    let max_visible = args.max_visible.unwrap_or(default_max_visible);
    let mut page = CalendarPage::new(clock, &records).with_max_visible_events(max_visible);
    if let Some(month) = args.month {
        page.jump_to(month);
    }
    if let Some(date) = args.select {
        page.select(date)?;
    }

    let report = GridReport {
        grid: MonthReport::new(&page.grid(), page.max_visible_events()),
        selected: page.selected().map(|d| d.key().to_string()),
        skipped: page.skipped().iter().cloned().collect(),
    };

    render_mode(output, &report, render_grid_text, render_grid_pretty)
}

fn render_grid_text(report: &GridReport, w: &mut dyn Write) -> io::Result<()> {
    for cell in report.grid.cells().filter(|c| c.in_current_month) {
        write!(w, "{}", cell.date)?;
        if cell.is_today {
            write!(w, " today")?;
        }
        if cell.is_selected {
            write!(w, " selected")?;
        }
        if cell.event_count() > 0 {
            let ids: Vec<&str> = cell.events.iter().map(|e| e.id.as_str()).collect();
            write!(w, " events={}", ids.join(","))?;
            if cell.overflow > 0 {
                write!(w, " +{}", cell.overflow)?;
            }
        }
        writeln!(w)?;
    }
    write_skipped(w, &report.skipped)
}

fn render_grid_pretty(report: &GridReport, w: &mut dyn Write) -> io::Result<()> {
    write_month(w, &report.grid)?;
    writeln!(w)?;

    let busy: Vec<&CellReport> = report.grid.cells().filter(|c| c.event_count() > 0).collect();
    if !busy.is_empty() {
        pretty_section(w, "Events")?;
        for cell in busy {
            for event in &cell.events {
                writeln!(w, "{}  {:<15} {}", cell.date, event.status, event.id)?;
            }
            if cell.overflow > 0 {
                writeln!(w, "{}  +{} more", cell.date, cell.overflow)?;
            }
        }
    }
    write_skipped(w, &report.skipped)
}

/// Calendar layout: `>` marks today, `[..]` the selection, `*` a day with
/// events, `x` a disabled day. Days of neighbouring months are dimmed with
/// a `.` prefix.
pub fn write_month(w: &mut dyn Write, month: &MonthReport) -> io::Result<()> {
    pretty_section(w, &month.name)?;
    for label in month.weekdays {
        write!(w, "{label:>6}")?;
    }
    writeln!(w)?;
    for row in &month.rows {
        for cell in row {
            write!(w, "{:>6}", cell_label(cell))?;
        }
        writeln!(w)?;
    }
    pretty_rule(w)
}

fn cell_label(cell: &CellReport) -> String {
    if !cell.in_current_month {
        return format!(".{}", cell.day);
    }
    let (open, close) = if cell.is_selected {
        ("[", "]")
    } else if cell.is_today {
        (">", " ")
    } else {
        ("", " ")
    };
    let mark = if cell.is_disabled {
        "x"
    } else if cell.event_count() > 0 {
        "*"
    } else {
        ""
    };
    format!("{open}{}{mark}{close}", cell.day)
}

fn write_skipped(w: &mut dyn Write, skipped: &[SkippedEvent]) -> io::Result<()> {
    for entry in skipped {
        writeln!(w, "skipped {} ({}): {}", entry.id, entry.date, entry.reason)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashcal_core::calendar::{EventIndex, EventRecord, GridBuilder};

    fn report() -> MonthReport {
        let source = vec![
            EventRecord::new("24/06/2025", "Issue Date", "a"),
            EventRecord::new("24/06/2025", "Returning Date", "b"),
        ];
        let (index, _) = EventIndex::build(&source);
        let cursor = MonthCursor::new(2025, 5).expect("june");
        let today = CalendarDate::new(2025, 6, 10).expect("valid date");
        let grid = GridBuilder::new(cursor, today)
            .selected(CalendarDate::new(2025, 6, 12))
            .events(&index)
            .build();
        MonthReport::new(&grid, 1)
    }

    #[test]
    fn report_rows_are_weeks() {
        let report = report();
        assert_eq!(report.name, "June 2025");
        assert!(report.rows.iter().all(|row| row.len() == 7));
        let busy = report.cells().find(|c| c.date == "2025-06-24").expect("cell");
        assert_eq!(busy.events.len(), 1);
        assert_eq!(busy.overflow, 1);
    }

    #[test]
    fn pretty_month_marks_days() {
        let mut buf = Vec::new();
        write_month(&mut buf, &report()).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("June 2025"));
        assert!(text.contains("[12]"));
        assert!(text.contains(">10"));
        assert!(text.contains("24*"));
        assert!(text.contains(".1"));
    }
}
