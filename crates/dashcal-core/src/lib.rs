//! dashcal-core: the date/time selection engine behind dashcal's calendar
//! page and its date and clock pickers.
//!
//! - [`calendar`]: date keys, month cursors, whole-week month grids, and the
//!   date-keyed event index.
//! - [`dial`]: clock-face angle math and the hour/minute selection state
//!   machine.
//! - [`picker`]: open/close, navigation, and commit controllers for the two
//!   picker widgets, plus scoped dismissal subscriptions.
//!
//! Everything here produces plain data; rendering belongs to the host.
//!
//! # Conventions
//!
//! - **Errors**: one `thiserror` enum per concern, each mapping to an
//!   [`error::ErrorCode`]. Config loading returns `anyhow::Result`.
//! - **Logging**: `tracing` macros only; the binary installs the subscriber.
//! - **Time**: "today" and "now" come from a [`wall_clock::WallClock`].

pub mod calendar;
pub mod config;
pub mod dial;
pub mod error;
pub mod geometry;
pub mod picker;
pub mod wall_clock;
