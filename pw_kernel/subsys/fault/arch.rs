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

#[cfg(feature = "arch_arm_cortex_m")]
mod arm_cortex_m;
#[cfg(feature = "arch_arm_cortex_m")]
pub use arm_cortex_m::Arch;

#[cfg(feature = "arch_riscv")]
mod riscv;
#[cfg(feature = "arch_riscv")]
pub use riscv::Arch;

#[cfg(feature = "arch_host")]
mod host;
#[cfg(feature = "arch_host")]
pub use host::{Arch, HOST_HALT_EXIT_CODE};

#[cfg(not(any(feature = "arch_arm_cortex_m", feature = "arch_riscv", feature = "arch_host")))]
compile_error!("fault requires one of the arch_arm_cortex_m, arch_riscv or arch_host features");

/// Frame record placement used by the backtrace walker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameRecord {
    /// `{previous frame pointer, return address}` at the frame pointer.
    AtFramePointer,
    /// The same record just below the frame pointer.
    BelowFramePointer,
}

/// Architecture hooks used on the fault path.
///
/// Every method must be callable with interrupts masked, on a damaged stack
/// and without a heap.
pub trait ArchInterface {
    /// Frame record layout of code built with frame pointers.
    const FRAME_RECORD: FrameRecord;

    /// Masks every maskable interrupt on the current core.
    fn disable_interrupts();

    /// Stops execution for good.
    fn halt() -> !;

    /// Frame pointer of the calling function, if it can be trusted.
    ///
    /// Implementations must be `#[inline(always)]` so that the register is
    /// read in the caller's frame.
    fn frame_pointer() -> Option<usize>;

    /// Load address of the image containing `address`.
    ///
    /// Only meaningful for position independent images.
    fn image_base(_address: usize) -> Option<usize> {
        None
    }
}
