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

//! Best-effort character output used for diagnostics.
//!
//! The bytes are handed to `console_backend_write_all`, which each target
//! defines at link time.  A backend that has no usable device reports
//! [`ConsoleError::Unavailable`]; callers on fault paths ignore errors.

use core::fmt;

use embedded_io::{ErrorKind, ErrorType};

/// Reasons a console write can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConsoleError {
    /// No output device is attached or initialized.
    Unavailable,
    /// The device rejected the write.
    Io,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => f.write_str("console unavailable"),
            Self::Io => f.write_str("console write failed"),
        }
    }
}

impl embedded_io::Error for ConsoleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable => ErrorKind::NotConnected,
            Self::Io => ErrorKind::Other,
        }
    }
}

pub type Result<T> = core::result::Result<T, ConsoleError>;

unsafe extern "Rust" {
    fn console_backend_write_all(buf: &[u8]) -> Result<()>;
}

pub struct Console {}

impl ErrorType for Console {
    type Error = ConsoleError;
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self {}
    }

    #[inline]
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        unsafe { console_backend_write_all(buf) }
    }
}

impl fmt::Write for Console {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl embedded_io::Write for Console {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Console::write_all(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::fmt::Write as _;

    use embedded_io::Error as _;

    use super::*;

    thread_local! {
        static OUTPUT: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
        static FAILURE: Cell<Option<ConsoleError>> = const { Cell::new(None) };
    }

    #[unsafe(no_mangle)]
    fn console_backend_write_all(buf: &[u8]) -> Result<()> {
        if let Some(error) = FAILURE.with(Cell::get) {
            return Err(error);
        }
        OUTPUT.with(|output| output.borrow_mut().extend_from_slice(buf));
        Ok(())
    }

    fn take_output() -> String {
        OUTPUT.with(|output| String::from_utf8(output.take()).unwrap())
    }

    #[test]
    fn formatted_text_reaches_backend() {
        write!(Console::new(), "fault at {:#x}", 0x1234).unwrap();
        assert_eq!(take_output(), "fault at 0x1234");
    }

    #[test]
    fn embedded_io_write_reports_full_length() {
        let written = embedded_io::Write::write(&mut Console::new(), b"abc").unwrap();
        assert_eq!(written, 3);
        assert_eq!(take_output(), "abc");
    }

    #[test]
    fn backend_errors_are_propagated() {
        FAILURE.with(|failure| failure.set(Some(ConsoleError::Unavailable)));
        let result = Console::new().write_all(b"lost");
        FAILURE.with(|failure| failure.set(None));

        assert_eq!(result, Err(ConsoleError::Unavailable));
        assert_eq!(take_output(), "");
        assert!(write!(Console::new(), "{}", 1).is_ok());
        assert_eq!(take_output(), "1");
    }

    #[test]
    fn errors_map_to_embedded_io_kinds() {
        assert_eq!(ConsoleError::Unavailable.kind(), ErrorKind::NotConnected);
        assert_eq!(ConsoleError::Io.kind(), ErrorKind::Other);
    }
}
