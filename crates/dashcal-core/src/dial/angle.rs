//! Clock-face geometry.
//!
//! Angles are degrees in `[0, 360)`, measured clockwise from 12 o'clock.
//! Pointer offsets use screen coordinates (`dy` grows downward), so a point
//! straight above the center is 0° and one to its right is 90°.
//!
//! Snapping divides the face into twelve 30° hour sectors or sixty 6° minute
//! sectors and rounds half-up to the nearest one. Minutes snap to the nearest
//! whole minute even though only every fifth minute carries a label.

use serde::Serialize;

use crate::geometry::Point;

use super::DialMode;

pub const DEGREES_PER_HOUR: f64 = 30.0;
pub const DEGREES_PER_MINUTE: f64 = 6.0;

/// Angle of an offset from the dial center.
#[must_use]
pub fn point_to_angle(dx: f64, dy: f64) -> f64 {
    normalize(dy.atan2(dx).to_degrees() + 90.0)
}

/// Snap to one of twelve hour sectors; the top sector is 12.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn angle_to_hour(angle: f64) -> u8 {
    let hour = (normalize(angle) / DEGREES_PER_HOUR).round() as u8;
    if hour == 0 { 12 } else { hour }
}

/// Snap to one of sixty minute sectors.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn angle_to_minute(angle: f64) -> u8 {
    ((normalize(angle) / DEGREES_PER_MINUTE).round() as u8) % 60
}

#[must_use]
pub fn hour_to_angle(hour: u8) -> f64 {
    f64::from(hour) * DEGREES_PER_HOUR
}

#[must_use]
pub fn minute_to_angle(minute: u8) -> f64 {
    f64::from(minute) * DEGREES_PER_MINUTE
}

/// Point on a circle of `radius` around `center` at `angle`.
#[must_use]
pub fn angle_to_point(center: Point, radius: f64, angle: f64) -> Point {
    let rad = angle.to_radians();
    Point::new(center.x + radius * rad.sin(), center.y - radius * rad.cos())
}

fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// A labelled position on the dial face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DialMark {
    pub value: u8,
    pub angle: f64,
    pub position: Point,
}

/// The twelve labels of a ring: hours 1 through 12, or minutes 0, 5, .., 55.
#[must_use]
pub fn dial_marks(mode: DialMode, center: Point, radius: f64) -> Vec<DialMark> {
    (1..=12u8)
        .map(|n| {
            let (value, angle) = match mode {
                DialMode::Hour => (n, hour_to_angle(n)),
                DialMode::Minute => {
                    let minute = (n % 12) * 5;
                    (minute, minute_to_angle(minute))
                }
            };
            DialMark {
                value,
                angle,
                position: angle_to_point(center, radius, angle),
            }
        })
        .collect()
}
