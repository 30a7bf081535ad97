//! Event loop: button polling, edge detection, dispatch.
//!
//! The demo runs as a single cooperative control loop: sample the buttons,
//! decide, act, sleep. There is no interrupt-driven input handling at this
//! layer; the only asynchronous context is the field-event callback, which
//! communicates through the [`FieldFlag`] alone.
//!
//! Toggles are not reentrant by construction: the loop issues at most one
//! toggle per iteration and the next sample is not taken until the previous
//! toggle has completed or failed.

use crate::board::{ButtonState, Buttons, Indicators, Restart};
use crate::consts::{POLL_INTERVAL_MS, TOGGLE_BUTTON_MASK};
use crate::driver::PayloadDriver;
use crate::tag::{FieldEvent, FieldFlag, TagEmulator};
use embedded_hal::delay::DelayNs;

/// Rising-edge detector over consecutive button samples.
///
/// Only the transition from released to pressed fires; a button held across
/// any number of samples fires exactly once. Buttons outside `mask` are
/// ignored.
///
/// ```
/// use tagflip::board::ButtonState;
/// use tagflip::event::EdgeDetector;
///
/// let mut edges = EdgeDetector::new(0x01);
/// assert!(edges.rising_edge(ButtonState(0x01)));
/// assert!(!edges.rising_edge(ButtonState(0x01))); // held
/// assert!(!edges.rising_edge(ButtonState(0x00)));
/// assert!(edges.rising_edge(ButtonState(0x01)));
/// ```
#[derive(Debug)]
pub struct EdgeDetector {
    mask: u8,
    last: ButtonState,
}

impl EdgeDetector {
    /// Creates a detector for the buttons in `mask`.
    ///
    /// The first sample is compared against an all-released state, so a
    /// button already held at startup registers one edge.
    pub fn new(mask: u8) -> Self {
        Self {
            mask,
            last: ButtonState::default(),
        }
    }

    /// Feeds one sample and returns whether a masked button went from
    /// released to pressed since the previous sample.
    pub fn rising_edge(&mut self, sample: ButtonState) -> bool {
        let was_pressed = self.last.pressed(self.mask);
        let is_pressed = sample.pressed(self.mask);
        self.last = sample;
        is_pressed && !was_pressed
    }
}

/// Runs the demo control loop. Never returns.
///
/// Startup turns on the system-running indicator, registers the field-event
/// callback and activates the initial payload mode. Each iteration then
/// samples the buttons, toggles the payload once per rising edge of the
/// [`TOGGLE_BUTTON_MASK`] button, relays the field flag to the field
/// indicator, and sleeps for [`POLL_INTERVAL_MS`].
///
/// There is no local recovery: any setup or activation failure, at startup
/// or mid-run, is reported and routed to `restart` as a cold-reboot request.
pub fn run_event_loop<T, B, I, D, R>(
    driver: &mut PayloadDriver<T>,
    on_field_event: fn(FieldEvent),
    buttons: &mut B,
    indicators: &mut I,
    field: &FieldFlag,
    delay: &mut D,
    restart: &mut R,
) -> !
where
    T: TagEmulator,
    B: Buttons,
    I: Indicators,
    D: DelayNs,
    R: Restart,
{
    indicators.set_system_running(true);

    if driver.setup(on_field_event).is_err() {
        error!("cannot set up tag emulation");
        restart.restart();
    }
    let initial = driver.mode;
    if driver.activate(initial).is_err() {
        error!("cannot activate initial payload");
        restart.restart();
    }

    let mut edges = EdgeDetector::new(TOGGLE_BUTTON_MASK);
    loop {
        let sample = buttons.read_state();
        if edges.rising_edge(sample) {
            if driver.toggle().is_err() {
                error!("payload switch failed");
                restart.restart();
            }
        }
        indicators.set_field_present(field.is_present());
        delay.delay_ms(POLL_INTERVAL_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_button_fires_exactly_once() {
        let mut edges = EdgeDetector::new(TOGGLE_BUTTON_MASK);
        let held = ButtonState(TOGGLE_BUTTON_MASK);

        let fired = [
            edges.rising_edge(held),
            edges.rising_edge(held),
            edges.rising_edge(held),
        ];
        assert_eq!(fired, [true, false, false]);
    }

    #[test]
    fn test_each_press_fires_again() {
        let mut edges = EdgeDetector::new(TOGGLE_BUTTON_MASK);
        assert!(edges.rising_edge(ButtonState(TOGGLE_BUTTON_MASK)));
        assert!(!edges.rising_edge(ButtonState(0)));
        assert!(edges.rising_edge(ButtonState(TOGGLE_BUTTON_MASK)));
        assert!(!edges.rising_edge(ButtonState(0)));
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut edges = EdgeDetector::new(TOGGLE_BUTTON_MASK);
        assert!(!edges.rising_edge(ButtonState(0x02)));
        assert!(!edges.rising_edge(ButtonState(0x80)));
        // The masked button still works with other bits set.
        assert!(edges.rising_edge(ButtonState(0x80 | TOGGLE_BUTTON_MASK)));
    }
}
