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

use core::sync::atomic::{AtomicU8, Ordering};

/// States of the fault state machine.
///
/// `Armed -> Faulted -> Halted`, with `Halted` terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum FaultState {
    /// Normal operation.
    Armed = 0,
    /// A failure is being reported.
    Faulted = 1,
    /// The terminator has run.  Nothing executes past this point.
    Halted = 2,
}

impl FaultState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Armed,
            1 => Self::Faulted,
            _ => Self::Halted,
        }
    }
}

/// Fault state stored in a single byte.
///
/// Transitions are made with interrupts masked.  Where the core has no
/// compare-and-swap only loads and stores are used, which is enough on a
/// single core once interrupts are off.
pub struct FaultStateMachine {
    state: AtomicU8,
}

impl Default for FaultStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl FaultStateMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(FaultState::Armed as u8),
        }
    }

    #[must_use]
    pub fn state(&self) -> FaultState {
        FaultState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Moves `Armed -> Faulted`.
    ///
    /// Returns false, leaving the state untouched, if the system is not
    /// armed.  The caller must then skip reporting and halt.
    #[cfg(target_has_atomic = "8")]
    pub fn fault(&self) -> bool {
        self.state
            .compare_exchange(
                FaultState::Armed as u8,
                FaultState::Faulted as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Moves `Armed -> Faulted`.
    ///
    /// Returns false, leaving the state untouched, if the system is not
    /// armed.  The caller must then skip reporting and halt.
    #[cfg(not(target_has_atomic = "8"))]
    pub fn fault(&self) -> bool {
        if self.state() != FaultState::Armed {
            return false;
        }
        self.state.store(FaultState::Faulted as u8, Ordering::Release);
        true
    }

    /// Moves to `Halted` from any state.
    pub fn halt(&self) {
        self.state.store(FaultState::Halted as u8, Ordering::Release);
    }
}
