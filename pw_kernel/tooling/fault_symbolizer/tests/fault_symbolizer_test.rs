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

#[test]
fn image_is_required() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("fault_symbolizer");
    cmd.arg("0x1234");
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("--image"), "unexpected stderr: {stderr:?}");
}

#[test]
fn missing_image_is_reported() {
    let mut cmd = assert_cmd::cargo_bin_cmd!("fault_symbolizer");
    cmd.args(["--image", "/nonexistent/image.elf", "0x1234"]);
    let assert = cmd.assert().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(
        stderr.contains("In image file /nonexistent/image.elf"),
        "unexpected stderr: {stderr:?}"
    );
}

#[cfg(target_os = "linux")]
#[test]
fn unknown_address_prints_placeholder() {
    let image = std::env::current_exe().unwrap();
    let mut cmd = assert_cmd::cargo_bin_cmd!("fault_symbolizer");
    cmd.arg("--image").arg(&image).arg("0x1");
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_eq!(stdout, "0x1: ??\n");
}

#[cfg(target_os = "linux")]
#[test]
fn log_without_report_fails() {
    let dir = std::env::temp_dir().join(format!("fault_symbolizer_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let log = dir.join("console.log");
    std::fs::write(&log, "[INF] nothing to see\n").unwrap();

    let image = std::env::current_exe().unwrap();
    let mut cmd = assert_cmd::cargo_bin_cmd!("fault_symbolizer");
    cmd.arg("--image").arg(&image).arg("--log").arg(&log);
    let assert = cmd.assert().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("No fault report found"), "unexpected stderr: {stderr:?}");

    std::fs::remove_dir_all(&dir).unwrap();
}
