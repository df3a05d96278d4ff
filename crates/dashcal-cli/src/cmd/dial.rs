//! `dcal dial`: snap an angle or pointer offset onto the clock face.

use std::io::{self, Write};

use clap::{Args, ValueEnum};
use dashcal_core::dial::{DialMark, DialMode, angle_to_hour, angle_to_minute, dial_marks, point_to_angle};
use dashcal_core::geometry::Point;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Ring {
    Hour,
    Minute,
}

impl From<Ring> for DialMode {
    fn from(ring: Ring) -> Self {
        match ring {
            Ring::Hour => Self::Hour,
            Ring::Minute => Self::Minute,
        }
    }
}

/// Arguments for `dcal dial`.
#[derive(Args, Debug)]
pub struct DialArgs {
    /// Angle in degrees, clockwise from 12 o'clock.
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["x", "y"], required_unless_present_all = ["x", "y"])]
    pub angle: Option<f64>,

    /// Pointer offset from the dial center, positive to the right.
    #[arg(long, allow_hyphen_values = true, requires = "y")]
    pub x: Option<f64>,

    /// Pointer offset from the dial center, positive downward.
    #[arg(long, allow_hyphen_values = true, requires = "x")]
    pub y: Option<f64>,

    /// Which ring to snap onto.
    #[arg(long, value_enum, default_value_t = Ring::Hour)]
    pub mode: Ring,

    /// Also list the ring's labelled marks on a dial of this radius.
    #[arg(long, value_name = "RADIUS")]
    pub marks: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DialReport {
    mode: DialMode,
    angle: f64,
    value: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    marks: Vec<DialMark>,
}

/// Execute `dcal dial`.
pub fn run_dial(args: &DialArgs, output: OutputMode) -> anyhow::Result<()> {
    let angle = match (args.angle, args.x, args.y) {
        (Some(angle), _, _) => angle,
        (None, Some(dx), Some(dy)) => point_to_angle(dx, dy),
        _ => anyhow::bail!("pass --angle, or both --x and --y"),
    };
    let mode = DialMode::from(args.mode);
    let value = match mode {
        DialMode::Hour => angle_to_hour(angle),
        DialMode::Minute => angle_to_minute(angle),
    };
    let marks = args
        .marks
        .map(|radius| dial_marks(mode, Point::default(), radius))
        .unwrap_or_default();

    let report = DialReport {
        mode,
        angle,
        value,
        marks,
    };
    render_mode(output, &report, render_dial_text, render_dial_pretty)
}

fn render_dial_text(report: &DialReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{} {} angle={:.2}", report.mode.as_str(), report.value, report.angle)?;
    for mark in &report.marks {
        writeln!(w, "mark {} {:.3},{:.3}", mark.value, mark.position.x, mark.position.y)?;
    }
    Ok(())
}

fn render_dial_pretty(report: &DialReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Dial")?;
    pretty_kv(w, "Ring", report.mode.as_str())?;
    pretty_kv(w, "Angle", format!("{:.2}°", report.angle))?;
    pretty_kv(w, "Value", report.value.to_string())?;
    for mark in &report.marks {
        writeln!(
            w,
            "  {:>2} at {:>6.1}° ({:.2}, {:.2})",
            mark.value, mark.angle, mark.position.x, mark.position.y
        )?;
    }
    Ok(())
}
