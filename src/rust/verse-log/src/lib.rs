// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Logging for the VERSE crates.
//!
//! Records go through the `log` facade under the target
//! `verse.rust::<module path>`, so a host such as `pyo3-log` can attach them to
//! one logger hierarchy. Per-sample diagnostics of the transformation are
//! off by default and switched on with [`init_logging`].

use std::sync::atomic::{AtomicBool, Ordering};

#[doc(hidden)]
pub use log as _log;

/// Prefix of the target of every record logged through this crate.
pub const TARGET_PREFIX: &str = "verse.rust::";

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:ident, $($arg:tt)+) => {
        $crate::_log::$level!(target: concat!("verse.rust::", module_path!()), $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::__log!(debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::__log!(warn, $($arg)+)
    };
}

/// Intermediate values of the transformation, logged at info level only
/// while diagnostics are enabled.
#[macro_export]
macro_rules! diagnostic {
    ($($arg:tt)+) => {
        if $crate::is_diagnostics_enabled() {
            $crate::__log!(info, $($arg)+)
        }
    };
}

static DIAGNOSTICS: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS.load(Ordering::Relaxed)
}

/// Enable or disable diagnostics.
///
/// No logger is installed here; the host decides where records end up.
pub fn init_logging(with_diagnostics: bool) {
    DIAGNOSTICS.store(with_diagnostics, Ordering::Relaxed);
}
