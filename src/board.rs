//! Board-level ports: button input, indicator signals, restart request.
//!
//! Board bring-up itself (GPIO configuration, debouncing hardware, the
//! concrete reboot mechanism) stays with the integrator. This module defines
//! the narrow interfaces the event loop consumes, plus ready-made adapters
//! over `embedded-hal` digital pins for boards where a button and two LEDs
//! are plain GPIOs.

use crate::consts::TOGGLE_BUTTON_MASK;
use embedded_hal::digital::{InputPin, OutputPin};

/// Snapshot of the board button levels at sample time.
///
/// One bit per button, set while the button reads pressed. Only level
/// changes matter to the event loop; see
/// [`EdgeDetector`](crate::event::EdgeDetector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState(
    /// Raw bitmask of pressed buttons.
    pub u8,
);

impl ButtonState {
    /// Returns whether any button selected by `mask` reads pressed in this
    /// snapshot.
    pub fn pressed(self, mask: u8) -> bool {
        self.0 & mask != 0
    }
}

/// Input port delivering button level snapshots.
pub trait Buttons {
    /// Samples the current button levels.
    fn read_state(&mut self) -> ButtonState;
}

/// Indicator port with two independent signals.
///
/// The field-presence signal may lag the reader field by up to one poll
/// interval; the system-running signal is set once during startup.
pub trait Indicators {
    /// Sets or clears the field-presence indicator.
    fn set_field_present(&mut self, on: bool);

    /// Sets or clears the system-running indicator.
    fn set_system_running(&mut self, on: bool);
}

/// Fatal-failure port.
///
/// Invoked only from the event-loop fail path once an unrecoverable error
/// has been reported.
pub trait Restart {
    /// Requests a cold system restart. Does not return.
    fn restart(&mut self) -> !;
}

/// Adapts one active-high input pin to the [`Buttons`] port.
///
/// The pin level is reported in the [`TOGGLE_BUTTON_MASK`] bit. A pin read
/// error is treated as released.
#[derive(Debug)]
pub struct SingleButton<P: InputPin> {
    /// The sampled pin.
    pub pin: P,
}

impl<P: InputPin> SingleButton<P> {
    /// Wraps `pin` as the toggle button.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> Buttons for SingleButton<P> {
    fn read_state(&mut self) -> ButtonState {
        match self.pin.is_high() {
            Ok(true) => ButtonState(TOGGLE_BUTTON_MASK),
            _ => ButtonState(0),
        }
    }
}

/// Drives the two indicator signals through output pins (active high).
///
/// Pin errors are ignored; indication is best-effort.
#[derive(Debug)]
pub struct LedIndicators<F: OutputPin, S: OutputPin> {
    /// LED reflecting field presence.
    pub field_led: F,
    /// LED reflecting that the system is up.
    pub run_led: S,
}

impl<F: OutputPin, S: OutputPin> LedIndicators<F, S> {
    /// Wraps the field-presence and system-running LED pins.
    pub fn new(field_led: F, run_led: S) -> Self {
        Self { field_led, run_led }
    }
}

impl<F: OutputPin, S: OutputPin> Indicators for LedIndicators<F, S> {
    fn set_field_present(&mut self, on: bool) {
        let _ = if on {
            self.field_led.set_high()
        } else {
            self.field_led.set_low()
        };
    }

    fn set_system_running(&mut self, on: bool) {
        let _ = if on {
            self.run_led.set_high()
        } else {
            self.run_led.set_low()
        };
    }
}
