//! Constants used across the tag-toggle demo.
//!
//! This module defines the fixed payload contents, buffer sizing, input
//! mapping, poll cadence, and reset-reason register masks shared by the
//! encoder, the payload driver, and the event loop.
//!
//! ## Key Concepts
//!
//! - **Payloads**: both tag contents are compile-time constants; nothing is
//!   composed at runtime beyond NDEF framing.
//! - **Buffer Sizing**: every encoded message must fit a 256-byte buffer;
//!   the encoder fails instead of overflowing it.
//! - **Input Mapping**: buttons are sampled as a bitmask and only one
//!   designated bit drives the payload toggle.
//! - **Reset Reasons**: mask values follow the RESETREAS register layout of
//!   NFC-wake-capable nRF devices.

/// Capacity (in bytes) of an encoded NDEF message buffer.
///
/// The tag-emulation engine is handed at most this many bytes. Encoding a
/// message that would not fit fails with a capacity error.
pub const NDEF_MSG_BUF_SIZE: usize = 256;

/// Maximum number of records in an NDEF message container.
///
/// Both demo payloads are single-record messages; multi-record composition
/// is not supported.
pub const MAX_REC_COUNT: usize = 1;

/// ISO 639 language code carried by the text record.
pub const TEXT_LANGUAGE_CODE: &[u8] = b"en";

/// UTF-8 text carried by the text record.
pub const TEXT_PAYLOAD: &[u8] = b"Hello World!";

/// Android package name carried by the launch-app record.
///
/// A reader that understands the `android.com:pkg` record type opens (or
/// offers to install) this application.
pub const ANDROID_PACKAGE: &[u8] = b"com.hypergryph.arknights";

/// Bit of the [`ButtonState`](crate::board::ButtonState) bitmask that toggles
/// the active payload on a rising edge.
pub const TOGGLE_BUTTON_MASK: u8 = 0x01;

/// Interval (in milliseconds) between two button samples of the event loop.
///
/// Bounds input latency; chosen as a power/responsiveness trade-off rather
/// than a correctness requirement.
pub const POLL_INTERVAL_MS: u32 = 200;

/// RESETREAS bit indicating a wake-up caused by an NFC field.
pub const RESET_REASON_NFC_MASK: u32 = 0x0008_0000;

/// RESETREAS bit indicating a reset from the dedicated reset pin.
pub const RESET_REASON_PIN_MASK: u32 = 0x0000_0001;

/// RESETREAS bit indicating a software-requested reset.
pub const RESET_REASON_SOFT_MASK: u32 = 0x0000_0004;
