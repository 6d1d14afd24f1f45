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

use core::fmt;

/// Call site of a failed check.
///
/// Only built by verbose builds and only borrowed for the duration of a
/// single report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SourceLocation<'a> {
    file: &'a str,
    line: u32,
    function: Option<&'a str>,
}

impl<'a> SourceLocation<'a> {
    #[must_use]
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self {
            file,
            line,
            function: None,
        }
    }

    #[must_use]
    pub const fn with_function(self, function: &'a str) -> Self {
        Self {
            function: Some(function),
            ..self
        }
    }

    #[must_use]
    pub const fn file(&self) -> &'a str {
        self.file
    }

    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub const fn function(&self) -> Option<&'a str> {
        self.function
    }
}

impl fmt::Display for SourceLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(function) = self.function {
            write!(f, " ({function})")?;
        }
        Ok(())
    }
}

/// Strips `prefix` from the front of `file`.
///
/// Used at compile time by [`source_location!`](crate::source_location) to
/// drop the build directory from `file!()`.  `file` is returned unchanged when
/// `prefix` is absent, empty or does not match.
#[must_use]
pub const fn relative_file<'a>(file: &'a str, prefix: Option<&str>) -> &'a str {
    let Some(prefix) = prefix else {
        return file;
    };
    let file_bytes = file.as_bytes();
    let prefix_bytes = prefix.as_bytes();
    if prefix_bytes.is_empty() || prefix_bytes.len() > file_bytes.len() {
        return file;
    }

    // Using while loop as for loops are not allowed in `const` functions.
    let mut i = 0;
    while i < prefix_bytes.len() {
        if file_bytes[i] != prefix_bytes[i] {
            return file;
        }
        i += 1;
    }

    // A byte-for-byte match of a whole `str` ends on a character boundary.
    let (_, rest) = file.split_at(prefix_bytes.len());
    rest
}

#[doc(hidden)]
#[must_use]
pub fn enclosing_function(item_path: &'static str) -> &'static str {
    let mut path = item_path
        .strip_suffix("::__pw_assert_location")
        .unwrap_or(item_path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path
}

/// Expands to the path of the enclosing function as a `&'static str`.
///
/// ```
/// fn who_am_i() -> &'static str {
///     pw_assert::function_name!()
/// }
/// assert!(who_am_i().ends_with("who_am_i"));
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __pw_assert_location() {}
        $crate::__private::enclosing_function(::core::any::type_name_of_val(
            &__pw_assert_location,
        ))
    }};
}

/// Expands to the [`SourceLocation`] of the invocation site.
///
/// The file is `file!()` with the build-time `PW_ASSERT_FILE_PREFIX`
/// environment variable removed from its front.
#[macro_export]
macro_rules! source_location {
    () => {
        $crate::SourceLocation::new(
            const { $crate::relative_file(file!(), option_env!("PW_ASSERT_FILE_PREFIX")) },
            line!(),
        )
        .with_function($crate::function_name!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_stripped() {
        assert_eq!(relative_file("/build/src/x.c", Some("/build/src/")), "x.c");
    }

    #[test]
    fn missing_or_empty_prefix_keeps_file() {
        assert_eq!(relative_file("src/x.c", None), "src/x.c");
        assert_eq!(relative_file("src/x.c", Some("")), "src/x.c");
    }

    #[test]
    fn mismatched_prefix_keeps_file() {
        assert_eq!(relative_file("src/x.c", Some("lib/")), "src/x.c");
        assert_eq!(relative_file("x.c", Some("longer/than/file/")), "x.c");
    }

    #[test]
    fn prefix_is_applied_in_const_context() {
        const FILE: &str = relative_file("/work/kernel/sched.rs", Some("/work/"));
        assert_eq!(FILE, "kernel/sched.rs");
    }

    #[test]
    fn multibyte_paths_split_on_prefix_boundary() {
        assert_eq!(relative_file("/bäu/ß/x.rs", Some("/bäu/")), "ß/x.rs");
        assert_eq!(relative_file("/bäu/ß/x.rs", Some("/bäu/ß")), "/x.rs");
        // Shares a leading byte with `ä` but is a different character.
        assert_eq!(relative_file("/bäu/x.rs", Some("/bå")), "/bäu/x.rs");
    }

    #[test]
    fn closure_segments_are_dropped() {
        assert_eq!(
            enclosing_function("kernel::sched::tick::{{closure}}::{{closure}}::__pw_assert_location"),
            "kernel::sched::tick"
        );
        assert_eq!(
            enclosing_function("kernel::sched::tick::__pw_assert_location"),
            "kernel::sched::tick"
        );
    }

    #[test]
    fn location_displays_file_line_and_function() {
        let location = SourceLocation::new("x.c", 42);
        let mut buffer = String::new();
        fmt::write(&mut buffer, format_args!("{location}")).unwrap();
        assert_eq!(buffer, "x.c:42");

        buffer.clear();
        fmt::write(
            &mut buffer,
            format_args!("{}", location.with_function("kernel::main")),
        )
        .unwrap();
        assert_eq!(buffer, "x.c:42 (kernel::main)");
    }
}
