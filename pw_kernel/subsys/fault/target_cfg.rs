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

//! Target properties the build script turns into `cfg`s.

/// Armv6-M cores may not let software read the debug halting status
/// register, and Cortex-M0+ does not let it at all.
pub fn is_armv6m(target: &str) -> bool {
    target.starts_with("thumbv6m-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_armv6m_targets_match() {
        assert!(is_armv6m("thumbv6m-none-eabi"));
        assert!(!is_armv6m("thumbv7m-none-eabi"));
        assert!(!is_armv6m("thumbv7em-none-eabihf"));
        assert!(!is_armv6m("thumbv8m.main-none-eabihf"));
        assert!(!is_armv6m("x86_64-unknown-linux-gnu"));
    }
}
