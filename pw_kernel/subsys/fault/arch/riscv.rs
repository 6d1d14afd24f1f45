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

use super::{ArchInterface, FrameRecord};

#[derive(Copy, Clone, Default)]
pub struct Arch;

impl ArchInterface for Arch {
    const FRAME_RECORD: FrameRecord = FrameRecord::BelowFramePointer;

    #[inline(always)]
    fn disable_interrupts() {
        unsafe { riscv::register::mstatus::clear_mie() }
    }

    fn halt() -> ! {
        unsafe {
            asm!("ebreak");
        }
        loop {
            unsafe {
                asm!("wfi", options(nomem, nostack));
            }
        }
    }

    #[inline(always)]
    fn frame_pointer() -> Option<usize> {
        let fp: usize;
        unsafe {
            asm!("mv {}, s0", out(reg) fp, options(nomem, nostack, preserves_flags));
        }
        Some(fp)
    }
}
