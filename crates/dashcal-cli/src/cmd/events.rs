//! `dcal events`: index an event file and look days up in it.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use dashcal_core::calendar::{CalendarDate, EventIndex, SkippedEvent};
use serde::Serialize;

use super::{EventReport, load_events};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dcal events`.
#[derive(Args, Debug)]
pub struct EventsArgs {
    /// JSON file with an array of {date: "DD/MM/YYYY", status, id} events.
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Only show this day. A day with no events is reported as empty.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<CalendarDate>,
}

#[derive(Debug, Serialize)]
struct DayReport {
    date: String,
    events: Vec<EventReport>,
}

#[derive(Debug, Serialize)]
struct EventsReport {
    total: usize,
    days: usize,
    by_day: Vec<DayReport>,
    skipped: Vec<SkippedEvent>,
}

/// Execute `dcal events`.
pub fn run_events(args: &EventsArgs, output: OutputMode) -> anyhow::Result<()> {
    let records = load_events(&args.file)?;
    let (index, skipped) = EventIndex::build(&records);

    let by_day = match args.date {
        Some(date) => vec![DayReport {
            date: date.key().to_string(),
            events: index.lookup_date(date).iter().map(EventReport::from).collect(),
        }],
        None => index
            .iter()
            .map(|(key, events)| DayReport {
                date: key.to_string(),
                events: events.iter().map(EventReport::from).collect(),
            })
            .collect(),
    };

    let report = EventsReport {
        total: index.len(),
        days: index.day_count(),
        by_day,
        skipped: skipped.skipped,
    };

    render_mode(output, &report, render_events_text, render_events_pretty)
}

fn render_events_text(report: &EventsReport, w: &mut dyn Write) -> io::Result<()> {
    for day in &report.by_day {
        for event in &day.events {
            writeln!(w, "{}  {}  {}", day.date, event.status, event.id)?;
        }
    }
    for entry in &report.skipped {
        writeln!(w, "skipped  {}  {}  {}", entry.id, entry.date, entry.reason)?;
    }
    Ok(())
}

fn render_events_pretty(report: &EventsReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Event index")?;
    pretty_kv(w, "Events", report.total.to_string())?;
    pretty_kv(w, "Days", report.days.to_string())?;
    pretty_kv(w, "Skipped", report.skipped.len().to_string())?;
    writeln!(w)?;

    for day in &report.by_day {
        writeln!(w, "{}", day.date)?;
        if day.events.is_empty() {
            writeln!(w, "  (no events)")?;
        }
        for event in &day.events {
            writeln!(w, "  {:<15} {}", event.status, event.id)?;
        }
    }

    if !report.skipped.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Skipped")?;
        for entry in &report.skipped {
            writeln!(w, "{} ({}): {}", entry.id, entry.date, entry.reason)?;
        }
    }
    Ok(())
}
