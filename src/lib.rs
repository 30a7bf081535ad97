//! # tagflip
//!
//! A portable, no_std Rust driver for a button-toggled NFC tag-emulation demo,
//! in the style of the classic "text or launch-app" development-kit samples.
//!
//! The crate emulates a passive NFC tag whose content can be flipped between
//! two fixed payloads at runtime:
//!
//! - a well-known **Text record** ("Hello World!" in English), and
//! - an Android **launch-app record** naming a package to open on the reader.
//!
//! This driver implements the payload state machine in pure software using:
//! - `embedded-hal` traits for button sampling, LED indication and poll timing
//! - a pure NDEF record encoder writing into fixed 256-byte buffers
//! - an interrupt-safe field-presence flag based on a core atomic
//!
//! The NFC link layer itself is not implemented here. A platform tag-emulation
//! engine (for example the NFCT peripheral driver on nRF devices) is wired in
//! through the [`tag::TagEmulator`] trait and delivers field events back
//! through a registered callback.
//!
//! ## Crate features
//! | Feature     | Description |
//! |-------------|-------------|
//! | `std`       | Disables `#![no_std]` support and replaces `heapless::Vec`s with `std::vec::Vec`s |
//! | `defmt-0-3` | Uses `defmt` logging |
//! | `log`       | Uses `log` logging |
//!
//! ## Software Features
//!
//! - **Two-payload mode machine** with an explicit complement operation
//! - **Bounded NDEF encoding**: a one-record message container that fails
//!   cleanly instead of overflowing its 256-byte buffer
//! - **Edge-detected button handling**: a held button toggles exactly once
//! - **Single fatal-failure policy**: any setup or activation error is routed
//!   to a cold-restart request
//! - Fully portable across Cortex-M targets; hosted test suite under `std`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagflip::driver::PayloadDriver;
//! use tagflip::event::run_event_loop;
//! use tagflip::tag::{FieldEvent, FieldFlag};
//!
//! static FIELD: FieldFlag = FieldFlag::new();
//!
//! fn on_field_event(event: FieldEvent) {
//!     FIELD.on_event(event);
//! }
//!
//! let mut driver = PayloadDriver::new(nfct);
//! run_event_loop(
//!     &mut driver,
//!     on_field_event,
//!     &mut buttons,
//!     &mut indicators,
//!     &FIELD,
//!     &mut delay,
//!     &mut restart,
//! );
//! ```
//!
//! ## Integration Notes
//!
//! - The poll loop samples the button every 200 ms; input latency is bounded
//!   by that interval.
//! - The field-event callback may run in interrupt context. It must only
//!   touch the [`tag::FieldFlag`]; the poll loop relays the flag to the
//!   field indicator.
//! - The tag-emulation engine must latch the payload buffer it is handed in
//!   [`tag::TagEmulator::set_payload`]; the driver reuses its buffers on the
//!   next activation.
//!
//! ## Status
//!
//! This crate is a demonstration driver. Contributions welcome!
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod fmt;

pub mod board;
pub mod consts;
pub mod diag;
pub mod driver;
pub mod event;
pub mod ndef;
pub mod tag;
