//! `dcal time`: drive the clock picker through a scripted interaction.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::str::FromStr;

use anyhow::Context;
use clap::Args;
use dashcal_core::dial::{ClockTime, DialMode, DialState, TextEdit};
use dashcal_core::geometry::{Point, Rect};
use dashcal_core::picker::{DismissEvent, ListenerHub, TimePicker};
use dashcal_core::wall_clock::WallClock;
use serde::Serialize;

use super::{ActionParseError, pinned_clock, split_action};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Where the picker is drawn for scripted pointer events.
pub const PICKER_BOUNDS: Rect = Rect::new(0.0, 0.0, 240.0, 320.0);
const OUTSIDE_POINT: Point = Point::new(-10.0, -10.0);

const TIME_ACTIONS: &str = "open, hour, minute, toggle, angle=DEG, point=DX,DY, step=N, am, pm, \
     period, edit=hour|minute, type=TEXT, key=C, backspace, enter, escape, outside, inside, \
     apply, cancel, disable, enable";

/// Arguments for `dcal time`.
#[derive(Args, Debug)]
pub struct TimeArgs {
    /// Current host value (24-hour HH:MM).
    #[arg(long, value_name = "HH:MM")]
    pub value: Option<ClockTime>,

    /// Pin the wall-clock time used when there is no value.
    #[arg(long, value_name = "HH:MM")]
    pub now: Option<ClockTime>,

    /// Actions to apply in order, e.g. `open angle=90 pm apply`.
    #[arg(value_name = "ACTION", allow_hyphen_values = true)]
    pub actions: Vec<String>,
}

/// One scripted interaction with the clock picker.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeAction {
    Open,
    Mode(DialMode),
    Toggle,
    Angle(f64),
    Point(f64, f64),
    Step(i32),
    Period(bool),
    TogglePeriod,
    Edit(DialMode),
    Type(String),
    Key(char),
    Backspace,
    Enter,
    Escape,
    Outside,
    Inside,
    Apply,
    Cancel,
    Disable(bool),
}

impl FromStr for TimeAction {
    type Err = ActionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || ActionParseError {
            action: raw.to_string(),
            expected: TIME_ACTIONS,
        };
        let number = |v: Option<&str>| v.and_then(|v| v.parse::<f64>().ok()).ok_or_else(unknown);
        let field = |v: Option<&str>| match v {
            Some("hour") => Ok(DialMode::Hour),
            Some("minute") => Ok(DialMode::Minute),
            _ => Err(unknown()),
        };

        let action = match split_action(raw) {
            ("open", None) => Self::Open,
            ("hour", None) => Self::Mode(DialMode::Hour),
            ("minute", None) => Self::Mode(DialMode::Minute),
            ("toggle", None) => Self::Toggle,
            ("angle", value) => Self::Angle(number(value)?),
            ("point", Some(value)) => {
                let (dx, dy) = value.split_once(',').ok_or_else(unknown)?;
                Self::Point(number(Some(dx.trim()))?, number(Some(dy.trim()))?)
            }
            ("step", value) => Self::Step(
                value
                    .map(|v| v.trim_start_matches('+'))
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(unknown)?,
            ),
            ("am", None) => Self::Period(false),
            ("pm", None) => Self::Period(true),
            ("period", None) => Self::TogglePeriod,
            ("edit", value) => Self::Edit(field(value)?),
            ("type", Some(value)) => Self::Type(value.to_string()),
            ("key", Some(value)) => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Self::Key(ch),
                    _ => return Err(unknown()),
                }
            }
            ("backspace", None) => Self::Backspace,
            ("enter", None) => Self::Enter,
            ("escape", None) => Self::Escape,
            ("outside", None) => Self::Outside,
            ("inside", None) => Self::Inside,
            ("apply", None) => Self::Apply,
            ("cancel", None) => Self::Cancel,
            ("disable", None) => Self::Disable(true),
            ("enable", None) => Self::Disable(false),
            _ => return Err(unknown()),
        };
        Ok(action)
    }
}

#[derive(Debug, Serialize)]
struct EditReport {
    field: DialMode,
    text: String,
}

#[derive(Debug, Serialize)]
struct StepReport {
    action: String,
    result: String,
}

#[derive(Debug, Serialize)]
struct TimeReport {
    value: Option<String>,
    state: DialState,
    pending: String,
    editing: Option<EditReport>,
    changes: Vec<String>,
    listeners: usize,
    steps: Vec<StepReport>,
}

/// Execute `dcal time`.
pub fn run_time(args: &TimeArgs, output: OutputMode) -> anyhow::Result<()> {
    let actions = args
        .actions
        .iter()
        .map(|raw| raw.parse::<TimeAction>())
        .collect::<Result<Vec<_>, _>>()?;

    let hub = ListenerHub::new();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);

    let clock = pinned_clock(None, args.now);
    tracing::debug!(now = %clock.now(), "time picker clock");
    let mut picker = TimePicker::new(clock, hub.clone())
        .on_change(move |value| sink.borrow_mut().push(value.to_string()));
    picker.set_value(args.value.map(ClockTime::to_hhmm).as_deref())?;
    picker.set_bounds(PICKER_BOUNDS);

    let mut steps = Vec::with_capacity(actions.len());
    for (i, (raw, action)) in args.actions.iter().zip(&actions).enumerate() {
        let result = apply_action(&mut picker, action)
            .with_context(|| format!("action {} ('{raw}') failed", i + 1))?;
        tracing::debug!(step = i + 1, action = %raw, %result, "time picker step");
        steps.push(StepReport {
            action: raw.clone(),
            result,
        });
    }

    let report = TimeReport {
        value: picker.value(),
        state: picker.state(),
        pending: picker.pending().to_hhmm(),
        editing: picker.editing().map(|edit| EditReport {
            field: edit.field(),
            text: edit.text().to_string(),
        }),
        changes: changes.borrow().clone(),
        listeners: hub.active(),
        steps,
    };
    render_mode(output, &report, render_time_text, render_time_pretty)
}

fn apply_action<C: WallClock>(picker: &mut TimePicker<C>, action: &TimeAction) -> anyhow::Result<String> {
    let result = match action {
        TimeAction::Open => {
            picker.open()?;
            format!("open at {}", picker.pending())
        }
        TimeAction::Mode(mode) => {
            picker.set_mode(*mode)?;
            format!("{} ring", mode.as_str())
        }
        TimeAction::Toggle => format!("{} ring", picker.toggle_mode()?.as_str()),
        TimeAction::Angle(angle) => format!("snapped to {}", picker.select_angle(*angle)?),
        TimeAction::Point(dx, dy) => format!("snapped to {}", picker.pointer(*dx, *dy)?),
        TimeAction::Step(delta) => format!("stepped to {}", picker.step(*delta)?),
        TimeAction::Period(is_pm) => {
            picker.set_period(*is_pm)?;
            period_label(*is_pm).to_string()
        }
        TimeAction::TogglePeriod => period_label(picker.toggle_period()?).to_string(),
        TimeAction::Edit(field) => {
            picker.begin_edit(*field)?;
            format!("editing {}", field.as_str())
        }
        TimeAction::Type(text) => {
            picker.edit_replace(text)?;
            format!("buffer '{}'", picker.editing().map_or("", TextEdit::text))
        }
        TimeAction::Key(ch) => {
            if picker.edit_input(*ch)? {
                format!("buffer '{}'", picker.editing().map_or("", TextEdit::text))
            } else {
                format!("dropped '{ch}'")
            }
        }
        TimeAction::Backspace => {
            picker.edit_backspace()?;
            format!("buffer '{}'", picker.editing().map_or("", TextEdit::text))
        }
        TimeAction::Enter => format!("committed {}", picker.commit_edit()?),
        TimeAction::Escape => dismissal(picker.handle_dismiss(DismissEvent::Escape)),
        TimeAction::Outside => dismissal(picker.handle_dismiss(DismissEvent::PointerDown(OUTSIDE_POINT))),
        TimeAction::Inside => dismissal(
            picker.handle_dismiss(DismissEvent::PointerDown(PICKER_BOUNDS.center())),
        ),
        TimeAction::Apply => format!("applied {}", picker.apply()?),
        TimeAction::Cancel => {
            picker.cancel()?;
            "cancelled".to_string()
        }
        TimeAction::Disable(disabled) => {
            picker.set_disabled(*disabled);
            let label = if *disabled { "disabled" } else { "enabled" };
            label.to_string()
        }
    };
    Ok(result)
}

const fn period_label(is_pm: bool) -> &'static str {
    if is_pm { "PM" } else { "AM" }
}

fn dismissal(handled: bool) -> String {
    let label = if handled { "handled" } else { "ignored" };
    label.to_string()
}

fn render_time_text(report: &TimeReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "value={} state={} pending={}",
        report.value.as_deref().unwrap_or("-"),
        state_label(report.state),
        report.pending
    )?;
    for change in &report.changes {
        writeln!(w, "change {change}")?;
    }
    Ok(())
}

fn render_time_pretty(report: &TimeReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Time picker")?;
    for (i, step) in report.steps.iter().enumerate() {
        writeln!(w, "{:>3}. {:<16} {}", i + 1, step.action, step.result)?;
    }
    if !report.steps.is_empty() {
        writeln!(w)?;
    }
    pretty_kv(w, "Value", report.value.as_deref().unwrap_or("(none)"))?;
    pretty_kv(w, "State", state_label(report.state))?;
    pretty_kv(w, "Pending", &report.pending)?;
    if let Some(edit) = &report.editing {
        pretty_kv(w, "Editing", format!("{} '{}'", edit.field.as_str(), edit.text))?;
    }
    let changes = if report.changes.is_empty() {
        "(none)".to_string()
    } else {
        report.changes.join(", ")
    };
    pretty_kv(w, "onChange", changes)
}

const fn state_label(state: DialState) -> &'static str {
    match state {
        DialState::Closed => "closed",
        DialState::OpenHourMode => "hour",
        DialState::OpenMinuteMode => "minute",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_parse() {
        assert_eq!("open".parse(), Ok(TimeAction::Open));
        assert_eq!("angle=45".parse(), Ok(TimeAction::Angle(45.0)));
        assert_eq!("point=-3, 4".parse(), Ok(TimeAction::Point(-3.0, 4.0)));
        assert_eq!("step=+2".parse(), Ok(TimeAction::Step(2)));
        assert_eq!("step=-1".parse(), Ok(TimeAction::Step(-1)));
        assert_eq!("edit=minute".parse(), Ok(TimeAction::Edit(DialMode::Minute)));
        assert_eq!("key=7".parse(), Ok(TimeAction::Key('7')));
        assert_eq!("type=".parse(), Ok(TimeAction::Type(String::new())));
    }

    #[test]
    fn bad_actions_are_rejected() {
        for raw in ["", "angle", "angle=north", "edit=second", "key=12", "open=1", "fly"] {
            assert!(raw.parse::<TimeAction>().is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn scripted_apply_emits_once() {
        let clock = pinned_clock(None, ClockTime::parse_hhmm("09:00").ok());
        let mut picker = TimePicker::new(clock, ListenerHub::new());
        for action in ["open", "angle=45", "pm", "toggle", "edit=minute", "type=5"] {
            let action: TimeAction = action.parse().expect("valid action");
            apply_action(&mut picker, &action).expect("action applies");
        }
        let applied = apply_action(&mut picker, &TimeAction::Apply).expect("apply");
        assert_eq!(applied, "applied 14:05");
    }
}
