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
#![no_std]

/// Fault reporting configuration common to all architectures.
pub trait FaultConfigInterface {
    /// Maximum number of return addresses printed with a fault report.
    const BACKTRACE_DEPTH: usize = 8;
    /// Frames dropped from the top of the walk before printing.
    const BACKTRACE_SKIP: usize = 0;
    /// How far above the reporter's frame the walk may follow frame pointers.
    const BACKTRACE_STACK_SPAN_BYTES: usize = 2048;
    /// Whether the host target prints its image load address.  Needed to
    /// symbolize addresses from position independent executables.
    const REPORT_IMAGE_BASE: bool = true;
}

/// Default configuration used when a target does not supply its own.
pub struct FaultConfig;

impl FaultConfigInterface for FaultConfig {}
