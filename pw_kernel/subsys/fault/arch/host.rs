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

use fault_config::{FaultConfig, FaultConfigInterface};

use super::{ArchInterface, FrameRecord};

/// Exit status of a host process stopped by [`crate::halt`].
///
/// Matches a shell's report of `SIGABRT`.
pub const HOST_HALT_EXIT_CODE: i32 = 134;

#[derive(Copy, Clone, Default)]
pub struct Arch;

impl ArchInterface for Arch {
    const FRAME_RECORD: FrameRecord = FrameRecord::AtFramePointer;

    // Host processes have no interrupts to mask.
    fn disable_interrupts() {}

    fn halt() -> ! {
        // Ends every thread in the process, not just the faulting one.
        std::process::exit(HOST_HALT_EXIT_CODE)
    }

    #[inline(always)]
    fn frame_pointer() -> Option<usize> {
        let (fp, sp) = frame_and_stack_pointer()?;
        // Without forced frame pointers the register may hold anything.  Only
        // trust it if it lies in the part of the stack the walk may read.
        (fp >= sp && fp - sp < FaultConfig::BACKTRACE_STACK_SPAN_BYTES).then_some(fp)
    }

    fn image_base(address: usize) -> Option<usize> {
        dladdr_base(address)
    }
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn frame_and_stack_pointer() -> Option<(usize, usize)> {
    let (fp, sp): (usize, usize);
    unsafe {
        core::arch::asm!(
            "mov {fp}, rbp",
            "mov {sp}, rsp",
            fp = out(reg) fp,
            sp = out(reg) sp,
            options(nomem, nostack, preserves_flags),
        );
    }
    Some((fp, sp))
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn frame_and_stack_pointer() -> Option<(usize, usize)> {
    let (fp, sp): (usize, usize);
    unsafe {
        core::arch::asm!(
            "mov {fp}, x29",
            "mov {sp}, sp",
            fp = out(reg) fp,
            sp = out(reg) sp,
            options(nomem, nostack, preserves_flags),
        );
    }
    Some((fp, sp))
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn frame_and_stack_pointer() -> Option<(usize, usize)> {
    None
}

#[cfg(unix)]
fn dladdr_base(address: usize) -> Option<usize> {
    let mut info = core::mem::MaybeUninit::<libc::Dl_info>::zeroed();
    // SAFETY: `dladdr` only inspects the loader's tables and fills `info`.
    let found = unsafe { libc::dladdr(address as *const libc::c_void, info.as_mut_ptr()) };
    if found == 0 {
        return None;
    }
    // SAFETY: a non-zero return means `info` was filled in.
    let base = unsafe { info.assume_init() }.dli_fbase as usize;
    (base != 0).then_some(base)
}

#[cfg(not(unix))]
fn dladdr_base(_address: usize) -> Option<usize> {
    None
}
