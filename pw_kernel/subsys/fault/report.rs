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

#[cfg(feature = "backtrace")]
use backtrace::FrameLayout;
#[cfg(any(feature = "backtrace", feature = "ndebug", not(feature = "verbose")))]
use fault_config::{FaultConfig, FaultConfigInterface};

#[cfg(feature = "backtrace")]
use crate::arch::FrameRecord;
use crate::arch::{Arch, ArchInterface};

/// Masks interrupts and moves `Armed -> Faulted`.
///
/// Returns false when a fault is already being handled, in which case the
/// caller must halt without printing anything.
#[inline(always)]
pub(crate) fn begin_fault() -> bool {
    Arch::disable_interrupts();
    crate::FAULT_STATE.fault()
}

pub(crate) fn print_banner() {
    pw_log::fatal!("*** kernel panic:");
    pw_log::fatal!("FAILED ASSERTION.");
}

#[cfg(feature = "backtrace")]
const fn frame_layout(record: FrameRecord) -> FrameLayout {
    match record {
        FrameRecord::AtFramePointer => FrameLayout::RECORD_AT_FRAME_POINTER,
        FrameRecord::BelowFramePointer => FrameLayout::RECORD_BELOW_FRAME_POINTER,
    }
}

// Inlined so the walk starts at the frame of the reporter that called it.
#[cfg(feature = "backtrace")]
#[inline(always)]
pub(crate) fn print_backtrace() {
    let Some(frame_pointer) = Arch::frame_pointer() else {
        return;
    };
    // SAFETY: the frame pointer was read from the running stack and the walk
    // stays within the configured span above it.
    let trace = unsafe {
        backtrace::walk::<{ <FaultConfig as FaultConfigInterface>::BACKTRACE_DEPTH }>(
            frame_pointer,
            frame_layout(Arch::FRAME_RECORD),
            FaultConfig::BACKTRACE_STACK_SPAN_BYTES,
            FaultConfig::BACKTRACE_SKIP,
        )
    };
    if !trace.is_empty() {
        pw_log::fatal!("backtrace: {}", trace);
    }
}

#[cfg(not(feature = "backtrace"))]
#[inline(always)]
pub(crate) fn print_backtrace() {}

/// Minimal reporter, entered from the `pw_assert_HandleFailure` trampoline
/// with the return address of the failed check.
///
/// Prints no per call site text: the address is resolved offline.
#[cfg(any(feature = "ndebug", not(feature = "verbose")))]
pub(crate) extern "C" fn minimal_failure(return_address: usize) -> ! {
    if begin_fault() {
        if return_address != 0 {
            pw_log::fatal!("fault address: {:#x}", return_address);
        }
        if FaultConfig::REPORT_IMAGE_BASE {
            if let Some(base) = Arch::image_base(return_address) {
                pw_log::fatal!("image base: {:#x}", base);
            }
        }
        print_banner();
        print_backtrace();
    }
    crate::halt()
}

/// Verbose reporter.
#[cfg(all(feature = "verbose", not(feature = "ndebug")))]
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub fn pw_assert_HandleFailureWithLocation(
    location: &pw_assert::SourceLocation<'_>,
    message: Option<core::fmt::Arguments<'_>>,
) -> ! {
    if begin_fault() {
        match message {
            Some(message) => pw_log::fatal!("{} => {}", location, message),
            None => pw_log::fatal!("{}", location),
        }
        print_banner();
        print_backtrace();
    }
    crate::halt()
}
