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

use std::sync::Mutex;

use pw_log::LogLevel;
use serial_test::serial;

static CAPTURE: Mutex<Vec<u8>> = Mutex::new(Vec::new());

#[unsafe(no_mangle)]
fn console_backend_write_all(buf: &[u8]) -> console::Result<()> {
    CAPTURE
        .lock()
        .map_err(|_| console::ConsoleError::Io)?
        .extend_from_slice(buf);
    Ok(())
}

fn run_with_capture(f: impl FnOnce()) -> String {
    CAPTURE.lock().unwrap().clear();
    f();
    String::from_utf8(std::mem::take(&mut *CAPTURE.lock().unwrap())).unwrap()
}

fn line(level: LogLevel, message: &str) -> String {
    format!("[{}] {message}\n", level.tag())
}

#[test]
#[serial]
fn no_argument_log_line_prints_to_console() {
    assert_eq!(
        run_with_capture(|| pw_log::info!("test")),
        line(LogLevel::Info, "test")
    );
}

#[test]
#[serial]
fn arguments_are_formatted() {
    assert_eq!(
        run_with_capture(|| pw_log::error!("test {} {:#x} {}", -1, 255u32, "str")),
        line(LogLevel::Error, "test -1 0xff str")
    );
}

#[test]
#[serial]
fn each_macro_uses_its_level() {
    let output = run_with_capture(|| {
        pw_log::debug!("d");
        pw_log::warn!("w");
        pw_log::critical!("c");
        pw_log::fatal!("f");
    });
    let expected = [
        line(LogLevel::Debug, "d"),
        line(LogLevel::Warn, "w"),
        line(LogLevel::Critical, "c"),
        line(LogLevel::Fatal, "f"),
    ]
    .concat();
    assert_eq!(output, expected);
}

#[test]
#[serial]
fn explicit_level_and_trailing_comma() {
    assert_eq!(
        run_with_capture(|| pw_log::log!(LogLevel::Warn, "stack at {}%", 91,)),
        line(LogLevel::Warn, "stack at 91%")
    );
}
