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

use crate::LogLevel;

macro_rules! dim {
    ($color:literal, $tag:literal) => {
        concat!("\x1b[2m", $color, $tag, "\x1b[0m")
    };
}

#[must_use]
pub(crate) const fn log_level_tag(level: LogLevel) -> &'static str {
    if cfg!(feature = "color") {
        match level {
            LogLevel::Debug => dim!("\x1b[37m", "DBG"),
            LogLevel::Info => dim!("\x1b[36m", "INF"),
            LogLevel::Warn => dim!("\x1b[33m", "WRN"),
            LogLevel::Error => dim!("\x1b[31m", "ERR"),
            LogLevel::Critical => dim!("\x1b[31m", "CRT"),
            LogLevel::Fatal => dim!("\x1b[31m", "FTL"),
        }
    } else {
        match level {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WRN",
            LogLevel::Error => "ERR",
            LogLevel::Critical => "CRT",
            LogLevel::Fatal => "FTL",
        }
    }
}
