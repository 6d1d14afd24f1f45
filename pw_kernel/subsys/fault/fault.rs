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
#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Fault reporting and the fatal terminator.
//!
//! Defines the reporter hook that `pw_assert` calls when a check fails, and
//! [`halt`], the one primitive that stops the whole system.  Build modes are
//! selected through this crate's `verbose` and `ndebug` features, which are
//! forwarded to `pw_assert` so that the gate and the reporter always agree.
//!
//! Every live failure walks the same path:
//!
//! 1. interrupts are masked and the system moves from [`FaultState::Armed`]
//!    to [`FaultState::Faulted`],
//! 2. the report is written to the console,
//! 3. [`halt`] moves to [`FaultState::Halted`] and stops the core.
//!
//! A failure raised while another one is being reported skips straight to
//! step 3.

pub mod arch;
mod panic;
mod report;
mod state;
mod trampoline;
#[cfg(test)]
mod target_cfg;

pub use arch::{Arch, ArchInterface};
#[cfg(feature = "arch_host")]
pub use arch::HOST_HALT_EXIT_CODE;
pub use pw_assert::{AssertMode, MODE};
pub use state::{FaultState, FaultStateMachine};

static FAULT_STATE: FaultStateMachine = FaultStateMachine::new();

/// Current state of the system wide fault state machine.
#[must_use]
pub fn state() -> FaultState {
    FAULT_STATE.state()
}

/// Stops the system and never returns.
///
/// The canonical way to abort on a fatal error that is not an assertion.
/// Safe to call from any context, including interrupt handlers and the
/// reporter itself.
pub fn halt() -> ! {
    Arch::disable_interrupts();
    FAULT_STATE.halt();
    Arch::halt()
}

#[cfg(test)]
mod tests {
    #[unsafe(no_mangle)]
    fn console_backend_write_all(_buf: &[u8]) -> console::Result<()> {
        Ok(())
    }

    #[test]
    fn system_starts_armed() {
        assert_eq!(super::state(), super::FaultState::Armed);
    }

    #[test]
    fn mode_follows_forwarded_features() {
        let expected = if cfg!(feature = "ndebug") {
            super::AssertMode::Disabled
        } else if cfg!(feature = "verbose") {
            super::AssertMode::VerboseReport
        } else {
            super::AssertMode::MinimalReport
        };
        assert_eq!(super::MODE, expected);
    }
}
