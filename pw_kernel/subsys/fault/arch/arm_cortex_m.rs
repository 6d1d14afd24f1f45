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

use core::arch::asm;

#[cfg(not(armv6m))]
use cortex_m::peripheral::DCB;

use super::{ArchInterface, FrameRecord};

#[derive(Copy, Clone, Default)]
pub struct Arch;

impl ArchInterface for Arch {
    const FRAME_RECORD: FrameRecord = FrameRecord::AtFramePointer;

    #[inline(always)]
    fn disable_interrupts() {
        cortex_m::interrupt::disable();
    }

    fn halt() -> ! {
        // A breakpoint with no debugger attached escalates to HardFault.
        // Armv6-M cannot reliably tell, so it never breaks.
        #[cfg(not(armv6m))]
        if DCB::is_debugger_attached() {
            cortex_m::asm::bkpt();
        }
        loop {
            cortex_m::asm::wfi();
        }
    }

    #[inline(always)]
    fn frame_pointer() -> Option<usize> {
        let fp: usize;
        // Thumb code keeps its frame pointer in r7.
        unsafe {
            asm!("mov {}, r7", out(reg) fp, options(nomem, nostack, preserves_flags));
        }
        Some(fp)
    }
}
