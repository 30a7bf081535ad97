//! NDEF record encoding for the emulated tag payloads.
//!
//! This module implements the small slice of the NFC Data Exchange Format
//! needed by the demo: composing one record into a message container and
//! serializing it into a caller-provided byte buffer. It provides record
//! descriptors for the two payload kinds, a bounded message container, and
//! message-level encode entry points.
//!
//! ## Purpose
//!
//! A tag reader expects the emulated tag content to be a well-formed NDEF
//! message. The encoder here is pure with respect to program state: it reads
//! only its arguments and writes only the output buffer, so repeated encodes
//! of the same payload are byte-identical.
//!
//! ## Wire Layout
//!
//! Every record is emitted in the short-record form:
//!
//! ```text
//! [flags+TNF] [type length] [payload length] [type bytes] [payload bytes]
//! ```
//!
//! The first record of a message carries the message-begin flag and the last
//! record the message-end flag. A Text record payload is a UTF-8 status byte
//! (low bits holding the language code length), the language code, then the
//! text. A launch-app record payload is the bare Android package name under
//! the external `android.com:pkg` type.
//!
//! ## Functions
//!
//! - [`encode_text_message`]: one Text record in a one-record container
//! - [`encode_launch_app_message`]: one launch-app record in a one-record
//!   container
//!
//! ## Limitations
//!
//! - At most [`MAX_REC_COUNT`] records per message; multi-record composition
//!   is out of scope.
//! - Only the short-record form is emitted; a record payload above 255 bytes
//!   is rejected rather than promoted to the long form.

use crate::consts::MAX_REC_COUNT;
use thiserror::Error;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Record type of an NFC Forum well-known Text record.
pub const TEXT_RECORD_TYPE: &[u8] = b"T";

/// Record type of an Android Application Record.
pub const ANDROID_PKG_RECORD_TYPE: &[u8] = b"android.com:pkg";

const FLAG_MESSAGE_BEGIN: u8 = 0x80;
const FLAG_MESSAGE_END: u8 = 0x40;
const FLAG_SHORT_RECORD: u8 = 0x10;

/// Language codes longer than this cannot be described by the low bits of
/// the Text record status byte.
const LANGUAGE_CODE_MAX: usize = 63;

/// Largest payload expressible in the short-record form.
const SHORT_RECORD_MAX: usize = 255;

/// Type Name Format field of an NDEF record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tnf {
    /// NFC Forum well-known type, e.g. the `T` Text record.
    WellKnown = 0x01,
    /// NFC Forum external type, e.g. `android.com:pkg`.
    External = 0x04,
}

/// Errors raised while constructing records or filling a message container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The message container already holds its maximum number of records.
    #[error("message container is full")]
    MessageFull,
    /// The record type field must be between 1 and 255 bytes long.
    #[error("record type length out of range")]
    TypeLength,
    /// The language code must be between 1 and 63 bytes long.
    #[error("language code length out of range")]
    LanguageLength,
    /// The launch-app package name must not be empty.
    #[error("application package name is empty")]
    EmptyPackage,
}

/// Errors raised while serializing a message into its output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A record could not be constructed or appended.
    #[error("record construction failed: {0}")]
    Record(#[from] RecordError),
    /// The encoded message would exceed the output buffer.
    #[error("encoded message does not fit the output buffer")]
    Capacity,
    /// A record payload exceeds the short-record length limit.
    #[error("record payload exceeds the short-record limit")]
    PayloadLength,
}

/// Payload shape of a record descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordPayload<'a> {
    /// Status byte, language code, then UTF-8 text.
    Text { language: &'a [u8], text: &'a [u8] },
    /// Payload emitted verbatim.
    Opaque(&'a [u8]),
}

/// Describes a single NDEF record prior to serialization.
///
/// Descriptors borrow their content; nothing is copied until
/// [`MessageDesc::encode`] writes the record into the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDesc<'a> {
    tnf: Tnf,
    record_type: &'a [u8],
    payload: RecordPayload<'a>,
}

impl<'a> RecordDesc<'a> {
    /// Describes a well-known Text record with the given language code and
    /// UTF-8 text.
    pub fn text(language: &'a [u8], text: &'a [u8]) -> Result<Self, RecordError> {
        if language.is_empty() || language.len() > LANGUAGE_CODE_MAX {
            return Err(RecordError::LanguageLength);
        }
        Ok(Self {
            tnf: Tnf::WellKnown,
            record_type: TEXT_RECORD_TYPE,
            payload: RecordPayload::Text { language, text },
        })
    }

    /// Describes an external-type record with a verbatim payload.
    pub fn external(record_type: &'a [u8], payload: &'a [u8]) -> Result<Self, RecordError> {
        if record_type.is_empty() || record_type.len() > SHORT_RECORD_MAX {
            return Err(RecordError::TypeLength);
        }
        Ok(Self {
            tnf: Tnf::External,
            record_type,
            payload: RecordPayload::Opaque(payload),
        })
    }

    /// Describes an Android Application Record naming the package a reader
    /// should launch.
    pub fn launch_android_app(package: &'a [u8]) -> Result<Self, RecordError> {
        if package.is_empty() {
            return Err(RecordError::EmptyPackage);
        }
        Self::external(ANDROID_PKG_RECORD_TYPE, package)
    }

    fn payload_len(&self) -> usize {
        match self.payload {
            RecordPayload::Text { language, text } => 1 + language.len() + text.len(),
            RecordPayload::Opaque(bytes) => bytes.len(),
        }
    }
}

/// Bounded output writer used during serialization.
struct Writer<'b> {
    out: &'b mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        let end = self.pos.checked_add(bytes.len()).ok_or(EncodeError::Capacity)?;
        if end > self.out.len() {
            return Err(EncodeError::Capacity);
        }
        self.out[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// A message container holding at most [`MAX_REC_COUNT`] record descriptors.
#[derive(Debug)]
pub struct MessageDesc<'a> {
    /// Records in serialization order.
    #[cfg(not(feature = "std"))]
    records: Vec<RecordDesc<'a>, MAX_REC_COUNT>,
    /// Records in serialization order.
    #[cfg(feature = "std")]
    records: Vec<RecordDesc<'a>>,
}

impl<'a> MessageDesc<'a> {
    /// Creates an empty message container.
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Appends a record to the container.
    ///
    /// Fails with [`RecordError::MessageFull`] once [`MAX_REC_COUNT`] records
    /// are held.
    pub fn add_record(&mut self, record: RecordDesc<'a>) -> Result<(), RecordError> {
        if self.records.len() >= MAX_REC_COUNT {
            return Err(RecordError::MessageFull);
        }
        #[cfg(not(feature = "std"))]
        self.records
            .push(record)
            .map_err(|_| RecordError::MessageFull)?;
        #[cfg(feature = "std")]
        self.records.push(record);
        Ok(())
    }

    /// Serializes the message into `out` and returns the encoded length.
    ///
    /// The output buffer is written from the start; bytes past the returned
    /// length are untouched. An empty container encodes zero bytes.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, EncodeError> {
        let mut writer = Writer { out, pos: 0 };
        let record_count = self.records.len();
        for (index, record) in self.records.iter().enumerate() {
            let payload_len = record.payload_len();
            if payload_len > SHORT_RECORD_MAX {
                return Err(EncodeError::PayloadLength);
            }
            let mut header = FLAG_SHORT_RECORD | record.tnf as u8;
            if index == 0 {
                header |= FLAG_MESSAGE_BEGIN;
            }
            if index + 1 == record_count {
                header |= FLAG_MESSAGE_END;
            }
            writer.put(&[header, record.record_type.len() as u8, payload_len as u8])?;
            writer.put(record.record_type)?;
            match record.payload {
                RecordPayload::Text { language, text } => {
                    // UTF-8 status byte: bit 7 clear, low bits hold the
                    // language code length.
                    writer.put(&[language.len() as u8])?;
                    writer.put(language)?;
                    writer.put(text)?;
                }
                RecordPayload::Opaque(bytes) => writer.put(bytes)?,
            }
        }
        Ok(writer.pos)
    }
}

/// Encodes a one-record message holding a Text record into `out`.
///
/// Returns the encoded length. Fails with a [`RecordError`] if the record
/// descriptor is malformed and with [`EncodeError::Capacity`] if the message
/// does not fit `out`.
pub fn encode_text_message(
    language: &[u8],
    text: &[u8],
    out: &mut [u8],
) -> Result<usize, EncodeError> {
    let mut message = MessageDesc::new();
    message.add_record(RecordDesc::text(language, text)?)?;
    message.encode(out)
}

/// Encodes a one-record message holding an Android launch-app record into
/// `out`.
///
/// The message carries the Android record alone; there is no secondary
/// platform identifier in this system. Returns the encoded length, failing
/// under the same conditions as [`encode_text_message`].
pub fn encode_launch_app_message(package: &[u8], out: &mut [u8]) -> Result<usize, EncodeError> {
    let mut message = MessageDesc::new();
    message.add_record(RecordDesc::launch_android_app(package)?)?;
    message.encode(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ANDROID_PACKAGE, NDEF_MSG_BUF_SIZE, TEXT_LANGUAGE_CODE, TEXT_PAYLOAD};

    #[test]
    fn test_text_message_layout() {
        let mut buf = [0u8; NDEF_MSG_BUF_SIZE];
        let len = encode_text_message(TEXT_LANGUAGE_CODE, TEXT_PAYLOAD, &mut buf).unwrap();

        let mut expected = Vec::new();
        // MB | ME | SR | well-known, type "T", payload = status + "en" + text
        expected.extend_from_slice(&[0xd1, 0x01, 0x0f, b'T', 0x02]);
        expected.extend_from_slice(b"en");
        expected.extend_from_slice(b"Hello World!");

        assert_eq!(&buf[..len], expected.as_slice());
        assert!(len <= NDEF_MSG_BUF_SIZE);
    }

    #[test]
    fn test_launch_app_message_layout() {
        let mut buf = [0u8; NDEF_MSG_BUF_SIZE];
        let len = encode_launch_app_message(ANDROID_PACKAGE, &mut buf).unwrap();

        let mut expected = Vec::new();
        // MB | ME | SR | external, type "android.com:pkg", payload = package
        expected.extend_from_slice(&[0xd4, 0x0f, 0x18]);
        expected.extend_from_slice(b"android.com:pkg");
        expected.extend_from_slice(b"com.hypergryph.arknights");

        assert_eq!(&buf[..len], expected.as_slice());
        assert!(len > 0 && len <= NDEF_MSG_BUF_SIZE);
    }

    #[test]
    fn test_encode_is_repeatable() {
        let mut first = [0u8; NDEF_MSG_BUF_SIZE];
        let mut second = [0u8; NDEF_MSG_BUF_SIZE];
        let len_a = encode_text_message(TEXT_LANGUAGE_CODE, TEXT_PAYLOAD, &mut first).unwrap();
        let len_b = encode_text_message(TEXT_LANGUAGE_CODE, TEXT_PAYLOAD, &mut second).unwrap();
        assert_eq!(len_a, len_b);
        assert_eq!(&first[..len_a], &second[..len_b]);
    }

    #[test]
    fn test_capacity_failure_leaves_no_overflow() {
        let mut buf = [0u8; 8];
        assert_eq!(
            encode_text_message(TEXT_LANGUAGE_CODE, TEXT_PAYLOAD, &mut buf),
            Err(EncodeError::Capacity)
        );
    }

    #[test]
    fn test_language_code_length_is_checked() {
        let long_code = [b'x'; 64];
        assert_eq!(
            RecordDesc::text(&long_code, b"hi"),
            Err(RecordError::LanguageLength)
        );
        assert_eq!(RecordDesc::text(b"", b"hi"), Err(RecordError::LanguageLength));
    }

    #[test]
    fn test_empty_package_is_rejected() {
        assert_eq!(
            RecordDesc::launch_android_app(b""),
            Err(RecordError::EmptyPackage)
        );
    }

    #[test]
    fn test_external_type_length_is_checked() {
        assert_eq!(
            RecordDesc::external(b"", b"payload"),
            Err(RecordError::TypeLength)
        );
    }

    #[test]
    fn test_message_container_is_bounded() {
        let mut message = MessageDesc::new();
        message
            .add_record(RecordDesc::text(b"en", b"one").unwrap())
            .unwrap();
        assert_eq!(
            message.add_record(RecordDesc::text(b"en", b"two").unwrap()),
            Err(RecordError::MessageFull)
        );
    }

    #[test]
    fn test_short_record_limit_is_enforced() {
        let oversized = [0u8; 300];
        let record = RecordDesc::external(b"t", &oversized).unwrap();
        let mut message = MessageDesc::new();
        message.add_record(record).unwrap();
        let mut buf = [0u8; 512];
        assert_eq!(message.encode(&mut buf), Err(EncodeError::PayloadLength));
    }
}
