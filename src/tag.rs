//! Tag-emulation port and field-presence signalling.
//!
//! The NFC link layer lives outside this crate. A platform tag-emulation
//! engine (NFCT peripheral driver, external frontend chip, or a test double)
//! is adapted to the [`TagEmulator`] trait and owns field sensing and the
//! reader-facing protocol. This module also provides [`FieldFlag`], the one
//! piece of state shared between the engine's asynchronous field events and
//! the poll loop.

use core::sync::atomic::{AtomicBool, Ordering};

/// Field event reported by the tag-emulation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// A reader field is now coupled to the antenna.
    On,
    /// The reader field disappeared.
    Off,
}

/// Interface to the platform tag-emulation engine.
///
/// Implementations must apply [`set_payload`](TagEmulator::set_payload)
/// atomically: the whole buffer is accepted or the call fails, so a reader
/// never observes a partially updated message. The engine keeps using the
/// payload it latched until the next successful `set_payload`, which only
/// happens while emulation is stopped.
pub trait TagEmulator {
    /// Error reported by the engine. Collapsed to the failing stage by the
    /// payload driver.
    type Error;

    /// Registers the callback invoked on field events.
    ///
    /// The callback may run in interrupt context and must confine itself to
    /// signalling, typically via [`FieldFlag::on_event`].
    fn setup(&mut self, on_field_event: fn(FieldEvent)) -> Result<(), Self::Error>;

    /// Installs `msg` as the emulated tag content.
    fn set_payload(&mut self, msg: &[u8]) -> Result<(), Self::Error>;

    /// Starts sensing for a reader field and serving the installed payload.
    fn start_emulation(&mut self) -> Result<(), Self::Error>;

    /// Stops field sensing. The installed payload stays latched.
    fn stop_emulation(&mut self) -> Result<(), Self::Error>;
}

/// Lock-free field-presence flag.
///
/// One writer per direction: the field-event callback stores, the poll loop
/// loads and relays the value to the field indicator. Both sides may run in
/// different execution contexts, so the flag is a plain relaxed atomic.
///
/// ```
/// use tagflip::tag::{FieldEvent, FieldFlag};
///
/// static FIELD: FieldFlag = FieldFlag::new();
///
/// FIELD.on_event(FieldEvent::On);
/// assert!(FIELD.is_present());
/// FIELD.on_event(FieldEvent::Off);
/// assert!(!FIELD.is_present());
/// ```
#[derive(Debug)]
pub struct FieldFlag(AtomicBool);

impl FieldFlag {
    /// Creates a flag with no field present.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Records a field event. Safe to call from interrupt context.
    pub fn on_event(&self, event: FieldEvent) {
        self.0.store(event == FieldEvent::On, Ordering::Relaxed);
    }

    /// Returns whether a reader field is currently present.
    pub fn is_present(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_flag_follows_events() {
        let flag = FieldFlag::new();
        assert!(!flag.is_present());

        flag.on_event(FieldEvent::On);
        assert!(flag.is_present());

        flag.on_event(FieldEvent::On);
        assert!(flag.is_present());

        flag.on_event(FieldEvent::Off);
        assert!(!flag.is_present());
    }
}
