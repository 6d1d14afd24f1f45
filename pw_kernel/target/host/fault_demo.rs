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

//! Drives the assertion gate, reporter and terminator end to end.
//!
//! Each scenario logs what it is about to do and then trips one check.  A
//! live failure ends the process with [`fault::HOST_HALT_EXIT_CODE`]; a
//! scenario that returns prints `check skipped` and exits cleanly.

use core::fmt;
use std::hint::black_box;

use clap::{Parser, ValueEnum};
use fault as _;
use target_host as _;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scenario {
    /// Every check holds.
    Pass,
    /// `assert!` on a false condition.
    Assert,
    /// `eq!` on unequal values.
    Eq,
    /// Unconditional `panic!`.
    Panic,
    /// Direct call to the terminator.
    Halt,
    /// A failure raised while reporting another one.
    Nested,
}

#[derive(Debug, Parser)]
struct Args {
    #[arg(value_enum)]
    scenario: Scenario,
}

#[inline(never)]
fn scenario_pass(value: u32) {
    pw_assert::assert!(value == 2);
    pw_assert::assert!(value > 1, "value {} too small", value);
    pw_assert::eq!(value, 2);
    pw_assert::ne!(value, 3);
    pw_log::info!("all checks passed");
}

#[inline(never)]
fn scenario_assert(value: u32) {
    pw_assert::assert!(value == 2);
}

#[inline(never)]
fn scenario_eq(value: u32) {
    pw_assert::eq!(value, 3);
}

#[inline(never)]
fn scenario_panic(value: u32) -> ! {
    pw_assert::panic!("demo panic {}", value)
}

/// Fails a check of its own when it is formatted.
#[derive(PartialEq)]
struct Tripwire(u32);

impl fmt::Debug for Tripwire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        pw_assert::assert!(self.0 == 0, "formatting tripwire {}", self.0);
        write!(f, "Tripwire({})", self.0)
    }
}

#[inline(never)]
fn scenario_nested(value: u32) {
    pw_assert::eq!(Tripwire(value), Tripwire(value + 1));
}

fn main() {
    let args = Args::parse();
    pw_log::info!("scenario {:?}, mode {:?}", args.scenario, fault::MODE);

    let value = black_box(2);
    match args.scenario {
        Scenario::Pass => scenario_pass(value),
        Scenario::Assert => scenario_assert(value - 1),
        Scenario::Eq => scenario_eq(value),
        Scenario::Panic => scenario_panic(value + 5),
        Scenario::Halt => fault::halt(),
        Scenario::Nested => scenario_nested(value),
    }

    pw_log::info!("check skipped, state {:?}", fault::state());
}
