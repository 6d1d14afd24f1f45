// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

//! Line oriented logging to the system console.
//!
//! Every macro takes a `core::fmt` format string and writes a single
//! `[TAG] message` line.  Nothing is buffered or allocated, so the macros are
//! usable from interrupt handlers and from the fault path.
//!
//! Lines go to [`console::Console`], so the final binary must link a console
//! backend.

mod colors;

/// Severity of a log line.
///
/// Values match the Pigweed log protobuf definition.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum LogLevel {
    /// Developer detail.
    Debug = 1,
    /// Normal operation.
    Info = 2,
    /// Unexpected but handled.
    Warn = 3,
    /// An operation failed.
    Error = 4,
    /// The system is degraded.
    Critical = 5,
    // Level 6 is not defined in order to match the protobuf definition.
    /// The system is about to halt.
    Fatal = 7,
}

impl LogLevel {
    /// Short tag printed in front of each line.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        colors::log_level_tag(self)
    }
}

#[doc(hidden)]
pub mod __private {
    use core::fmt::{self, Write};

    use console::Console;

    use crate::LogLevel;

    #[inline(never)]
    pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
        // Output is best effort; a console error drops the line.
        let _ = write!(Console::new(), "[{}] {}\n", level.tag(), args);
    }
}

/// Logs a formatted line at `level`.
#[macro_export]
macro_rules! log {
  ($level:expr, $($args:tt)+) => {
      $crate::__private::log($level, ::core::format_args!($($args)+))
  };
}

/// Logs at [`LogLevel::Debug`].
#[macro_export]
macro_rules! debug {
  ($($args:tt)+) => { $crate::log!($crate::LogLevel::Debug, $($args)+) };
}

/// Logs at [`LogLevel::Info`].
#[macro_export]
macro_rules! info {
  ($($args:tt)+) => { $crate::log!($crate::LogLevel::Info, $($args)+) };
}

/// Logs at [`LogLevel::Warn`].
#[macro_export]
macro_rules! warn {
  ($($args:tt)+) => { $crate::log!($crate::LogLevel::Warn, $($args)+) };
}

/// Logs at [`LogLevel::Error`].
#[macro_export]
macro_rules! error {
  ($($args:tt)+) => { $crate::log!($crate::LogLevel::Error, $($args)+) };
}

/// Logs at [`LogLevel::Critical`].
#[macro_export]
macro_rules! critical {
  ($($args:tt)+) => { $crate::log!($crate::LogLevel::Critical, $($args)+) };
}

/// Logs at [`LogLevel::Fatal`].
///
/// Only logs; halting is up to the caller.
#[macro_export]
macro_rules! fatal {
  ($($args:tt)+) => { $crate::log!($crate::LogLevel::Fatal, $($args)+) };
}
