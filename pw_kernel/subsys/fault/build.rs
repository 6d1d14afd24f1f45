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

#[path = "target_cfg.rs"]
mod target_cfg;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=target_cfg.rs");
    println!("cargo:rustc-check-cfg=cfg(armv6m)");

    let target = std::env::var("TARGET").unwrap_or_default();
    if target_cfg::is_armv6m(&target) {
        println!("cargo:rustc-cfg=armv6m");
    }
}
