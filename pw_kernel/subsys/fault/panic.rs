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

//! Core panic handler for bare metal images.
//!
//! Language panics (overflow checks, slice bounds, `unwrap`) take the same
//! report and halt path as a failed assertion.

#![cfg(all(feature = "panic_handler", not(any(test, feature = "std"))))]

use core::panic::PanicInfo;

use crate::report::{begin_fault, print_backtrace, print_banner};

#[panic_handler]
fn panic_handler(info: &PanicInfo) -> ! {
    if begin_fault() {
        match info.location() {
            Some(location) => pw_log::fatal!(
                "{}:{} => {}",
                location.file(),
                location.line(),
                info.message()
            ),
            None => pw_log::fatal!("{}", info.message()),
        }
        print_banner();
        print_backtrace();
    }
    crate::halt()
}
