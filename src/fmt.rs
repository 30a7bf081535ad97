//! Logging shim for the optional `defmt-0-3` and `log` crate features.
//!
//! Call sites use these macros unconditionally. With `defmt-0-3` enabled they
//! forward to `defmt`, with `log` enabled they forward to `log`, and with
//! neither they evaluate their arguments and discard them so that format
//! arguments never become unused bindings.
//!
//! Format strings are restricted to plain `{}` placeholders over primitives,
//! which both backends accept.

macro_rules! info {
    ($($x:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::info!($($x)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::info!($($x)*);
        #[cfg(not(any(feature = "defmt-0-3", feature = "log")))]
        {
            let _ = ($($x)*,);
        }
    }};
}

macro_rules! error {
    ($($x:tt)*) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::error!($($x)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::error!($($x)*);
        #[cfg(not(any(feature = "defmt-0-3", feature = "log")))]
        {
            let _ = ($($x)*,);
        }
    }};
}
