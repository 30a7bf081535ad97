//! Payload driver for the emulated NFC tag.
//!
//! This module provides the [`PayloadDriver`] struct, which owns the payload
//! mode state machine of the demo: it encodes the payload selected by the
//! current [`PayloadMode`] into a fixed-capacity message buffer, installs the
//! buffer as the active tag content, and cycles field emulation around mode
//! switches.
//!
//! The driver is deliberately small. It has exactly two states, the
//! transitions between them are symmetric, and the only trigger for a
//! transition is [`toggle()`](PayloadDriver::toggle), invoked by the event
//! loop on a button edge.
//!
//! ## Buffer ownership
//!
//! Each mode has its own message buffer, reused in place across activations.
//! The driver owns a buffer exclusively while encoding into it and hands the
//! engine a read-only view on
//! [`set_payload`](crate::tag::TagEmulator::set_payload); the engine must
//! latch that content, because the next activation of the same mode encodes
//! over it.
//!
//! ## Failure behavior
//!
//! Every stage failure short-circuits and names the stage. A failed
//! stop-emulation aborts a toggle outright, leaving the previous mode and its
//! payload active, so a reader can never observe a torn or half-switched
//! message.
//!
//! ## Example
//!
//! ```rust
//! use tagflip::driver::{PayloadDriver, PayloadMode};
//! use tagflip::tag::{FieldEvent, TagEmulator};
//!
//! #[derive(Debug, Default)]
//! struct LoopbackTag {
//!     payload: Vec<u8>,
//!     emulating: bool,
//! }
//!
//! impl TagEmulator for LoopbackTag {
//!     type Error = ();
//!     fn setup(&mut self, _cb: fn(FieldEvent)) -> Result<(), ()> {
//!         Ok(())
//!     }
//!     fn set_payload(&mut self, msg: &[u8]) -> Result<(), ()> {
//!         self.payload = msg.to_vec();
//!         Ok(())
//!     }
//!     fn start_emulation(&mut self) -> Result<(), ()> {
//!         self.emulating = true;
//!         Ok(())
//!     }
//!     fn stop_emulation(&mut self) -> Result<(), ()> {
//!         self.emulating = false;
//!         Ok(())
//!     }
//! }
//!
//! let mut driver = PayloadDriver::new(LoopbackTag::default());
//! assert_eq!(driver.mode, PayloadMode::LaunchApp);
//!
//! driver.activate(driver.mode).unwrap();
//! assert!(driver.tag.emulating);
//!
//! driver.toggle().unwrap();
//! assert_eq!(driver.mode, PayloadMode::Text);
//! ```

use crate::consts::{ANDROID_PACKAGE, NDEF_MSG_BUF_SIZE, TEXT_LANGUAGE_CODE, TEXT_PAYLOAD};
use crate::ndef::{self, EncodeError};
use crate::tag::{FieldEvent, TagEmulator};
use thiserror::Error;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// The payload currently presented by the emulated tag.
///
/// Exactly one mode is active at any time. The initial mode is
/// [`LaunchApp`](PayloadMode::LaunchApp); only
/// [`PayloadDriver::toggle`] moves between modes.
///
/// ```
/// use tagflip::driver::PayloadMode;
///
/// assert_eq!(PayloadMode::Text.complement(), PayloadMode::LaunchApp);
/// assert_eq!(PayloadMode::LaunchApp.complement(), PayloadMode::Text);
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub enum PayloadMode {
    /// Well-known Text record carrying the fixed greeting.
    Text,
    /// Android launch-app record naming the fixed package.
    #[default]
    LaunchApp,
}

impl PayloadMode {
    /// Returns the other payload mode.
    pub fn complement(self) -> Self {
        match self {
            Self::Text => Self::LaunchApp,
            Self::LaunchApp => Self::Text,
        }
    }
}

/// Error returned when registering with the tag-emulation engine fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The engine rejected the field-event callback registration.
    #[error("field-event callback registration rejected")]
    CallbackRejected,
}

/// Error returned when activating a payload fails, naming the failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// Encoding the payload into its message buffer failed.
    #[error("payload encoding failed: {0}")]
    Encode(#[from] EncodeError),
    /// The engine rejected the encoded payload buffer.
    #[error("tag engine rejected the payload")]
    SetPayload,
    /// The engine failed to start emulation.
    #[error("tag engine failed to start emulation")]
    StartEmulation,
    /// The engine failed to stop emulation.
    #[error("tag engine failed to stop emulation")]
    StopEmulation,
}

/// Fixed-capacity message buffer, reused in place across activations.
#[derive(Debug)]
struct MessageBuf {
    #[cfg(not(feature = "std"))]
    bytes: Vec<u8, NDEF_MSG_BUF_SIZE>,
    #[cfg(feature = "std")]
    bytes: Vec<u8>,
}

impl MessageBuf {
    fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Opens the buffer at full capacity for `encode`, then truncates to the
    /// encoded length. A failed encode leaves the buffer empty.
    fn fill<F>(&mut self, encode: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut [u8]) -> Result<usize, EncodeError>,
    {
        self.bytes.clear();
        #[cfg(not(feature = "std"))]
        self.bytes
            .resize(NDEF_MSG_BUF_SIZE, 0)
            .map_err(|_| EncodeError::Capacity)?;
        #[cfg(feature = "std")]
        self.bytes.resize(NDEF_MSG_BUF_SIZE, 0);
        match encode(&mut self.bytes) {
            Ok(len) => {
                self.bytes.truncate(len);
                Ok(())
            }
            Err(err) => {
                self.bytes.clear();
                Err(err)
            }
        }
    }
}

/// Owns the payload mode state machine and drives the tag-emulation engine.
///
/// Construct one driver at startup, register the field-event callback with
/// [`setup`](PayloadDriver::setup), activate the initial mode, and hand the
/// driver to the event loop. There are no ambient globals; all mutable state
/// lives in this struct.
#[derive(Debug)]
pub struct PayloadDriver<T: TagEmulator> {
    /// The currently selected payload mode.
    pub mode: PayloadMode,
    /// The tag-emulation engine.
    pub tag: T,
    text_buf: MessageBuf,
    launch_buf: MessageBuf,
}

impl<T: TagEmulator> PayloadDriver<T> {
    /// Creates a driver in the initial [`PayloadMode::LaunchApp`] mode.
    ///
    /// Nothing is encoded or installed until the first
    /// [`activate`](PayloadDriver::activate).
    pub fn new(tag: T) -> Self {
        Self {
            mode: PayloadMode::default(),
            tag,
            text_buf: MessageBuf::new(),
            launch_buf: MessageBuf::new(),
        }
    }

    /// Registers the field-event callback with the tag engine.
    pub fn setup(&mut self, on_field_event: fn(FieldEvent)) -> Result<(), SetupError> {
        self.tag
            .setup(on_field_event)
            .map_err(|_| SetupError::CallbackRejected)
    }

    /// Returns the most recently encoded message for `mode`.
    ///
    /// Empty until the mode has been activated at least once.
    pub fn encoded(&self, mode: PayloadMode) -> &[u8] {
        match mode {
            PayloadMode::Text => self.text_buf.bytes(),
            PayloadMode::LaunchApp => self.launch_buf.bytes(),
        }
    }

    /// Encodes the payload for `mode`, installs it as the active tag content
    /// and starts emulation.
    ///
    /// Any failure at the encode, set-payload or start-emulation stage
    /// short-circuits, so the engine is never handed a partial buffer.
    /// Activating the same mode repeatedly re-encodes byte-identical content.
    pub fn activate(&mut self, mode: PayloadMode) -> Result<(), ActivationError> {
        let buf = match mode {
            PayloadMode::Text => {
                self.text_buf.fill(|out| {
                    ndef::encode_text_message(TEXT_LANGUAGE_CODE, TEXT_PAYLOAD, out)
                })?;
                &self.text_buf
            }
            PayloadMode::LaunchApp => {
                self.launch_buf
                    .fill(|out| ndef::encode_launch_app_message(ANDROID_PACKAGE, out))?;
                &self.launch_buf
            }
        };
        self.tag
            .set_payload(buf.bytes())
            .map_err(|_| ActivationError::SetPayload)?;
        self.tag
            .start_emulation()
            .map_err(|_| ActivationError::StartEmulation)?;
        info!("NFC configuration done");
        Ok(())
    }

    /// Switches to the complementary payload.
    ///
    /// Emulation is stopped before anything else happens, so a reader never
    /// observes a buffer update mid-flight. If the stop fails the toggle is
    /// aborted and the previous mode stays active with its payload installed;
    /// otherwise the mode flips and the new payload is activated.
    pub fn toggle(&mut self) -> Result<(), ActivationError> {
        self.tag
            .stop_emulation()
            .map_err(|_| ActivationError::StopEmulation)?;
        self.mode = self.mode.complement();
        match self.mode {
            PayloadMode::Text => info!("switching to text"),
            PayloadMode::LaunchApp => info!("switching to app"),
        }
        self.activate(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::FieldFlag;

    #[derive(Debug, Default)]
    struct MockTag {
        payloads: Vec<Vec<u8>>,
        emulating: bool,
        stop_calls: usize,
        fail_setup: bool,
        fail_set_payload: bool,
        fail_start: bool,
        fail_stop: bool,
        callback: Option<fn(FieldEvent)>,
    }

    impl TagEmulator for MockTag {
        type Error = ();

        fn setup(&mut self, on_field_event: fn(FieldEvent)) -> Result<(), ()> {
            if self.fail_setup {
                return Err(());
            }
            self.callback = Some(on_field_event);
            Ok(())
        }

        fn set_payload(&mut self, msg: &[u8]) -> Result<(), ()> {
            if self.fail_set_payload {
                return Err(());
            }
            self.payloads.push(msg.to_vec());
            Ok(())
        }

        fn start_emulation(&mut self) -> Result<(), ()> {
            if self.fail_start {
                return Err(());
            }
            self.emulating = true;
            Ok(())
        }

        fn stop_emulation(&mut self) -> Result<(), ()> {
            self.stop_calls += 1;
            if self.fail_stop {
                return Err(());
            }
            self.emulating = false;
            Ok(())
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_initial_mode_is_launch_app() {
        let driver = PayloadDriver::new(MockTag::default());
        assert_eq!(driver.mode, PayloadMode::LaunchApp);
        assert!(driver.encoded(PayloadMode::Text).is_empty());
        assert!(driver.encoded(PayloadMode::LaunchApp).is_empty());
    }

    #[test]
    fn test_activate_installs_launch_app_payload() {
        let mut driver = PayloadDriver::new(MockTag::default());
        driver.activate(driver.mode).unwrap();

        assert!(driver.tag.emulating);
        assert_eq!(driver.tag.payloads.len(), 1);
        let installed = &driver.tag.payloads[0];
        assert!(!installed.is_empty());
        assert!(installed.len() <= NDEF_MSG_BUF_SIZE);
        assert!(contains(installed, b"com.hypergryph.arknights"));
        assert!(contains(installed, ndef::ANDROID_PKG_RECORD_TYPE));
        assert_eq!(installed.as_slice(), driver.encoded(PayloadMode::LaunchApp));
    }

    #[test]
    fn test_activate_same_mode_is_byte_identical() {
        let mut driver = PayloadDriver::new(MockTag::default());
        driver.activate(driver.mode).unwrap();
        driver.activate(driver.mode).unwrap();

        assert_eq!(driver.tag.payloads.len(), 2);
        assert_eq!(driver.tag.payloads[0], driver.tag.payloads[1]);
    }

    #[test]
    fn test_toggle_switches_to_text_payload() {
        let mut driver = PayloadDriver::new(MockTag::default());
        driver.activate(driver.mode).unwrap();
        driver.toggle().unwrap();

        assert_eq!(driver.mode, PayloadMode::Text);
        assert_eq!(driver.tag.stop_calls, 1);
        assert!(driver.tag.emulating);
        let installed = driver.tag.payloads.last().unwrap();
        assert!(contains(installed, b"en"));
        assert!(contains(installed, b"Hello World!"));
    }

    #[test]
    fn test_toggle_twice_restores_mode_and_content() {
        let mut driver = PayloadDriver::new(MockTag::default());
        driver.activate(driver.mode).unwrap();
        let original = driver.tag.payloads[0].clone();

        driver.toggle().unwrap();
        driver.toggle().unwrap();

        assert_eq!(driver.mode, PayloadMode::LaunchApp);
        assert_eq!(driver.tag.payloads.last().unwrap(), &original);
    }

    #[test]
    fn test_failed_stop_aborts_toggle() {
        let mut driver = PayloadDriver::new(MockTag::default());
        driver.activate(driver.mode).unwrap();
        driver.tag.fail_stop = true;

        assert_eq!(driver.toggle(), Err(ActivationError::StopEmulation));
        assert_eq!(driver.mode, PayloadMode::LaunchApp);
        // No new payload was installed and emulation kept running.
        assert_eq!(driver.tag.payloads.len(), 1);
        assert!(driver.tag.emulating);
    }

    #[test]
    fn test_setup_failure_is_reported() {
        let mut driver = PayloadDriver::new(MockTag {
            fail_setup: true,
            ..MockTag::default()
        });
        assert_eq!(
            driver.setup(|_| ()),
            Err(SetupError::CallbackRejected)
        );
    }

    #[test]
    fn test_set_payload_failure_names_the_stage() {
        let mut driver = PayloadDriver::new(MockTag {
            fail_set_payload: true,
            ..MockTag::default()
        });
        assert_eq!(
            driver.activate(driver.mode),
            Err(ActivationError::SetPayload)
        );
        assert!(!driver.tag.emulating);
    }

    #[test]
    fn test_start_failure_names_the_stage() {
        let mut driver = PayloadDriver::new(MockTag {
            fail_start: true,
            ..MockTag::default()
        });
        assert_eq!(
            driver.activate(driver.mode),
            Err(ActivationError::StartEmulation)
        );
        assert_eq!(driver.tag.payloads.len(), 1);
    }

    static FIELD: FieldFlag = FieldFlag::new();

    fn record_field_event(event: FieldEvent) {
        FIELD.on_event(event);
    }

    #[test]
    fn test_field_events_only_touch_the_flag() {
        let mut driver = PayloadDriver::new(MockTag::default());
        driver.setup(record_field_event).unwrap();
        driver.activate(driver.mode).unwrap();

        let callback = driver.tag.callback.unwrap();
        callback(FieldEvent::On);
        assert!(FIELD.is_present());
        assert_eq!(driver.mode, PayloadMode::LaunchApp);

        callback(FieldEvent::Off);
        assert!(!FIELD.is_present());
        assert_eq!(driver.mode, PayloadMode::LaunchApp);
    }
}
