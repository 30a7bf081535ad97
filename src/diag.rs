//! Reset-reason diagnostics.
//!
//! Queried once at startup and reported to the log sink. On NFC-wake-capable
//! parts this confirms that a reader field, rather than a power cycle or a
//! reset pin, brought the system up. The hardware register access stays
//! behind [`ResetDiagnostics`]; this module owns the decoding and wording.

use crate::consts::{RESET_REASON_NFC_MASK, RESET_REASON_PIN_MASK, RESET_REASON_SOFT_MASK};

/// Reason the last system reset occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    /// Wake-up caused by an NFC field at the antenna.
    NfcWake,
    /// Reset from the dedicated reset pin.
    PinReset,
    /// Software-requested reset.
    SoftReset,
    /// Any other reported source, carrying the raw register bits.
    Other(u32),
    /// No cause bits set: plain power-on.
    PowerOn,
}

impl ResetCause {
    /// Decodes a raw RESETREAS-style register word.
    ///
    /// NFC wake takes precedence over the reset pin, which takes precedence
    /// over a soft reset; any remaining nonzero word is reported raw.
    pub fn from_bits(bits: u32) -> Self {
        if bits & RESET_REASON_NFC_MASK != 0 {
            Self::NfcWake
        } else if bits & RESET_REASON_PIN_MASK != 0 {
            Self::PinReset
        } else if bits & RESET_REASON_SOFT_MASK != 0 {
            Self::SoftReset
        } else if bits != 0 {
            Self::Other(bits)
        } else {
            Self::PowerOn
        }
    }
}

/// Diagnostics port reading the hardware reset reason.
pub trait ResetDiagnostics {
    /// Returns the cause of the last reset and clears the underlying cause
    /// bits, so that an immediate second query reports
    /// [`ResetCause::PowerOn`].
    fn get_and_clear_reset_cause(&mut self) -> ResetCause;
}

/// Reports `cause` to the log sink, one line per query.
pub fn report_reset_cause(cause: ResetCause) {
    match cause {
        ResetCause::NfcWake => info!("wake up by NFC field detect"),
        ResetCause::PinReset => info!("reset by pin-reset"),
        ResetCause::SoftReset => info!("reset by soft-reset"),
        ResetCause::Other(bits) => info!("reset by a different source ({})", bits),
        ResetCause::PowerOn => info!("power-on-reset"),
    }
}
