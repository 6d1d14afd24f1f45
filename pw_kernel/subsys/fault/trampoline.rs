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

//! Entry point of the minimal reporter.
//!
//! `pw_assert_HandleFailure` takes no arguments.  The trampoline hands its
//! own return address, which points just past the failed check, to the
//! reporter as the first argument and jumps there without pushing a frame.

#![cfg(any(feature = "ndebug", not(feature = "verbose")))]

macro_rules! trampoline {
    ($($instruction:literal),+ $(,)?) => {
        #[unsafe(naked)]
        #[unsafe(no_mangle)]
        #[allow(non_snake_case)]
        pub extern "C" fn pw_assert_HandleFailure() -> ! {
            core::arch::naked_asm!(
                $($instruction,)+
                report = sym crate::report::minimal_failure,
            )
        }
    };
}

#[cfg(all(target_arch = "x86_64", not(windows)))]
trampoline!("mov rdi, [rsp]", "jmp {report}");

#[cfg(all(target_arch = "x86_64", windows))]
trampoline!("mov rcx, [rsp]", "jmp {report}");

#[cfg(target_arch = "aarch64")]
trampoline!("mov x0, x30", "b {report}");

// `b` cannot reach far enough on Armv6-M.  Clobbering lr is harmless since
// the reporter never returns.
#[cfg(target_arch = "arm")]
trampoline!("mov r0, lr", "bl {report}");

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
trampoline!("mv a0, ra", "tail {report}");

#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "arm",
    target_arch = "riscv32",
    target_arch = "riscv64"
)))]
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn pw_assert_HandleFailure() -> ! {
    // Unknown caller; the report carries no address.
    crate::report::minimal_failure(0)
}
