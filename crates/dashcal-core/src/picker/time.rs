use crate::dial::{ClockSelectionState, ClockTime, DialMode, DialState, TextEdit};
use crate::geometry::{Point, Rect};
use crate::wall_clock::{SystemClock, WallClock};

use super::listener::{DismissEvent, DismissGuard, ListenerHub};
use super::{OnChange, PickerError};

/// Analog-clock time picker bound to a host form field.
///
/// The host value is an optional 24-hour `HH:MM` string. When it is absent,
/// opening the picker starts from the wall clock's current time. The host
/// hears about a new value only through `on_change` on [`apply`](Self::apply).
pub struct TimePicker<C = SystemClock> {
    clock: C,
    hub: ListenerHub,
    dial: ClockSelectionState,
    value: Option<ClockTime>,
    disabled: bool,
    bounds: Option<Rect>,
    dismiss: Option<DismissGuard>,
    on_change: Option<OnChange>,
}

impl<C: WallClock> TimePicker<C> {
    pub fn new(clock: C, hub: ListenerHub) -> Self {
        let seed = ClockTime::from_naive(clock.now().time());
        Self {
            clock,
            hub,
            dial: ClockSelectionState::new(seed),
            value: None,
            disabled: false,
            bounds: None,
            dismiss: None,
            on_change: None,
        }
    }

    /// # Errors
    ///
    /// [`PickerError::Time`] when `value` is not `HH:MM`.
    pub fn with_value(mut self, value: Option<&str>) -> Result<Self, PickerError> {
        self.set_value(value)?;
        Ok(self)
    }

    #[must_use]
    pub fn on_change(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Host-driven value update. Ignored by the dial until the next `open`
    /// when an interaction is in progress.
    ///
    /// # Errors
    ///
    /// [`PickerError::Time`] when `value` is not `HH:MM`.
    pub fn set_value(&mut self, value: Option<&str>) -> Result<(), PickerError> {
        self.value = value.map(ClockTime::parse_hhmm).transpose()?;
        Ok(())
    }

    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.value.map(ClockTime::to_hhmm)
    }

    /// Disabling an open picker cancels it.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled && self.is_open() {
            self.close_reverting();
        }
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Layout bounds of the widget, used for outside-click detection.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.dial.is_open()
    }

    #[must_use]
    pub const fn state(&self) -> DialState {
        self.dial.state()
    }

    /// Selection as currently shown on the dial.
    #[must_use]
    pub const fn pending(&self) -> ClockTime {
        self.dial.pending()
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&TextEdit> {
        self.dial.editing()
    }

    /// Open on the hour ring and start listening for dismissal.
    /// Opening an open picker does nothing.
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
        let seed = self
            .value
            .unwrap_or_else(|| ClockTime::from_naive(self.clock.now().time()));
        self.dial.reset(seed)?;
        self.dial.open()?;
        self.dismiss = Some(DismissGuard::acquire(&self.hub));
        Ok(())
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn toggle_mode(&mut self) -> Result<DialMode, PickerError> {
        Ok(self.dial.toggle_mode()?)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn set_mode(&mut self, mode: DialMode) -> Result<(), PickerError> {
        Ok(self.dial.set_mode(mode)?)
    }

    /// Pointer at offset `(dx, dy)` from the dial center.
    ///
    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn pointer(&mut self, dx: f64, dy: f64) -> Result<u8, PickerError> {
        Ok(self.dial.select_point(dx, dy)?)
    }

    /// Pointer at an absolute position, given the dial's center.
    ///
    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn pointer_at(&mut self, point: Point, center: Point) -> Result<u8, PickerError> {
        let (dx, dy) = point.relative_to(center);
        self.pointer(dx, dy)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn select_angle(&mut self, angle: f64) -> Result<u8, PickerError> {
        Ok(self.dial.select_angle(angle)?)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn step(&mut self, delta: i32) -> Result<u8, PickerError> {
        Ok(self.dial.step(delta)?)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn set_period(&mut self, is_pm: bool) -> Result<(), PickerError> {
        Ok(self.dial.set_period(is_pm)?)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn toggle_period(&mut self) -> Result<bool, PickerError> {
        Ok(self.dial.toggle_period()?)
    }

    /// Double-click on the hour or minute field.
    ///
    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn begin_edit(&mut self, field: DialMode) -> Result<(), PickerError> {
        Ok(self.dial.begin_edit(field)?)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] with no edit in progress.
    pub fn edit_input(&mut self, ch: char) -> Result<bool, PickerError> {
        Ok(self.dial.edit_input(ch)?)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] with no edit in progress.
    pub fn edit_replace(&mut self, text: &str) -> Result<(), PickerError> {
        Ok(self.dial.edit_replace(text)?)
    }

    /// # Errors
    ///
    /// [`PickerError::Dial`] with no edit in progress.
    pub fn edit_backspace(&mut self) -> Result<(), PickerError> {
        Ok(self.dial.edit_backspace()?)
    }

    /// Enter key in the edit field.
    ///
    /// # Errors
    ///
    /// [`PickerError::Dial`] with no edit in progress.
    pub fn commit_edit(&mut self) -> Result<u8, PickerError> {
        Ok(self.dial.commit_edit()?)
    }

    /// Escape key in the edit field.
    ///
    /// # Errors
    ///
    /// [`PickerError::Dial`] with no edit in progress.
    pub fn discard_edit(&mut self) -> Result<u8, PickerError> {
        Ok(self.dial.discard_edit()?)
    }

    /// Commit, close, and notify the host. Returns the new `HH:MM` value.
    ///
    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn apply(&mut self) -> Result<String, PickerError> {
        let value = self.dial.apply()?;
        self.value = Some(self.dial.committed());
        self.dismiss = None;
        if let Some(callback) = self.on_change.as_mut() {
            callback(&value);
        }
        Ok(value)
    }

    /// Close without notifying the host; the value stays as it was.
    ///
    /// # Errors
    ///
    /// [`PickerError::Dial`] while closed.
    pub fn cancel(&mut self) -> Result<(), PickerError> {
        self.dial.cancel()?;
        self.dismiss = None;
        Ok(())
    }

    /// Route a document-level event. Returns whether the picker acted on it.
    ///
    /// A pointer-down outside the bounds cancels. Escape discards a text edit
    /// in progress, or cancels when there is none. Nothing is handled while
    /// closed, or for pointer-downs before bounds are known.
    pub fn handle_dismiss(&mut self, event: DismissEvent) -> bool {
        if self.dismiss.is_none() {
            return false;
        }
        match event {
            DismissEvent::PointerDown(point) => {
                let Some(bounds) = self.bounds else {
                    return false;
                };
                if bounds.contains(point) {
                    return false;
                }
                tracing::debug!(x = point.x, y = point.y, "time picker dismissed by outside click");
                self.close_reverting();
                true
            }
            DismissEvent::Escape => {
                if self.dial.editing().is_some() {
                    self.dial.discard_edit().is_ok()
                } else {
                    self.close_reverting();
                    true
                }
            }
        }
    }

    fn close_reverting(&mut self) {
        if let Err(err) = self.dial.cancel() {
            tracing::debug!("time picker was already closed: {err}");
        }
        self.dismiss = None;
    }
}
