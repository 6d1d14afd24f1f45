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
#![cfg_attr(not(test), no_std)]

//! Assertion gate.
//!
//! The checks in this crate are compiled in one of three modes, chosen by
//! Cargo features when the binary is built:
//!
//! | Features            | Mode                          |
//! |---------------------|-------------------------------|
//! | `ndebug`            | [`AssertMode::Disabled`]      |
//! | `verbose`           | [`AssertMode::VerboseReport`] |
//! | neither             | [`AssertMode::MinimalReport`] |
//!
//! A failed check never returns.  It calls the reporter hook of the active
//! mode, which is defined at link time by the fault subsystem.  Only one of
//! the two hooks is ever referenced by a build.

use core::fmt;

mod location;

pub use location::{SourceLocation, relative_file};

/// Build configuration of the assertion gate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssertMode {
    /// Checks are compiled out and their conditions are never evaluated.
    Disabled,
    /// Failed checks report only their return address.
    MinimalReport,
    /// Failed checks report file, line, function and message.
    VerboseReport,
}

impl AssertMode {
    /// Returns true if conditions are evaluated in this mode.
    #[must_use]
    pub const fn is_checked(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// The mode this build was compiled with.
pub const MODE: AssertMode = if cfg!(feature = "ndebug") {
    AssertMode::Disabled
} else if cfg!(feature = "verbose") {
    AssertMode::VerboseReport
} else {
    AssertMode::MinimalReport
};

unsafe extern "C" {
    /// Minimal failure hook.
    ///
    /// Takes no arguments: the caller is recovered from the return address.
    ///
    /// # Safety
    ///
    /// Never returns.  Must be called directly from the failing call site.
    #[allow(non_snake_case)]
    pub fn pw_assert_HandleFailure() -> !;
}

unsafe extern "Rust" {
    /// Verbose failure hook.
    ///
    /// # Safety
    ///
    /// Never returns.
    #[allow(non_snake_case)]
    pub fn pw_assert_HandleFailureWithLocation(
        location: &SourceLocation<'_>,
        message: Option<fmt::Arguments<'_>>,
    ) -> !;
}

#[doc(hidden)]
pub mod __private {
    use core::fmt;

    pub use crate::location::enclosing_function;
    use crate::SourceLocation;

    // Inlined so the hook is called from the failing call site and the
    // return address it sees belongs to that site.  Keeping both entry points
    // inline also means a hook is only referenced by binaries that use it.
    #[cold]
    #[inline(always)]
    pub fn handle_failure() -> ! {
        unsafe { crate::pw_assert_HandleFailure() }
    }

    #[cold]
    #[inline(always)]
    pub fn handle_failure_at(
        location: &SourceLocation<'_>,
        message: Option<fmt::Arguments<'_>>,
    ) -> ! {
        unsafe { crate::pw_assert_HandleFailureWithLocation(location, message) }
    }

    // Keeps the `Debug` bound of `eq!`/`ne!` independent of the build mode.
    #[inline(always)]
    pub fn require_debug<A: fmt::Debug + ?Sized, B: fmt::Debug + ?Sized>(_a: &A, _b: &B) {}
}

// Gate bodies for each mode.  The public macros forward to the arm matching
// the build configuration; tests may name a mode explicitly.  Every arm
// type-checks the message, only `VerboseReport` formats it.
#[doc(hidden)]
#[macro_export]
macro_rules! __gate {
  (Disabled, $condition:expr, $($message:tt)+) => {{
      if false {
          let _: bool = $condition;
          let _ = ::core::format_args!($($message)+);
      }
  }};

  (MinimalReport, $condition:expr, $($message:tt)+) => {{
      if false {
          let _ = ::core::format_args!($($message)+);
      }
      if !$condition {
          $crate::__private::handle_failure()
      }
  }};

  (VerboseReport, $condition:expr, $($message:tt)+) => {{
      if !$condition {
          $crate::__private::handle_failure_at(
              &$crate::source_location!(),
              ::core::option::Option::Some(::core::format_args!($($message)+)),
          )
      }
  }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __gate_cmp {
  (Disabled, $left:expr, $op:tt, $right:expr, $name:literal $(, $($message:tt)+)?) => {{
      if false {
          let (left, right) = (&$left, &$right);
          $crate::__private::require_debug(left, right);
          let _: bool = *left $op *right;
          $( let _ = ::core::format_args!($($message)+); )?
      }
  }};

  (MinimalReport, $left:expr, $op:tt, $right:expr, $name:literal $(, $($message:tt)+)?) => {{
      $( if false { let _ = ::core::format_args!($($message)+); } )?
      match (&$left, &$right) {
          (left, right) => {
              $crate::__private::require_debug(left, right);
              if !(*left $op *right) {
                  $crate::__private::handle_failure()
              }
          }
      }
  }};

  (VerboseReport, $left:expr, $op:tt, $right:expr, $name:literal) => {{
      match (&$left, &$right) {
          (left, right) => {
              if !(*left $op *right) {
                  $crate::__private::handle_failure_at(
                      &$crate::source_location!(),
                      ::core::option::Option::Some(::core::format_args!(
                          "{}!({}, {}) failed, left: {:?}, right: {:?}",
                          $name,
                          ::core::stringify!($left),
                          ::core::stringify!($right),
                          left,
                          right,
                      )),
                  )
              }
          }
      }
  }};

  (VerboseReport, $left:expr, $op:tt, $right:expr, $name:literal, $($message:tt)+) => {{
      match (&$left, &$right) {
          (left, right) => {
              $crate::__private::require_debug(left, right);
              if !(*left $op *right) {
                  $crate::__private::handle_failure_at(
                      &$crate::source_location!(),
                      ::core::option::Option::Some(::core::format_args!(
                          "{}!({}, {}) failed, left: {:?}, right: {:?}: {}",
                          $name,
                          ::core::stringify!($left),
                          ::core::stringify!($right),
                          left,
                          right,
                          ::core::format_args!($($message)+),
                      )),
                  )
              }
          }
      }
  }};
}

// Unconditional failure.  Not a check, so `Disabled` still terminates, through
// the minimal hook.
#[doc(hidden)]
#[macro_export]
macro_rules! __fail {
  (Disabled, $($message:tt)+) => {{
      if false {
          let _ = ::core::format_args!($($message)+);
      }
      $crate::__private::handle_failure()
  }};

  (MinimalReport, $($message:tt)+) => {{
      if false {
          let _ = ::core::format_args!($($message)+);
      }
      $crate::__private::handle_failure()
  }};

  (VerboseReport, $($message:tt)+) => {
      $crate::__private::handle_failure_at(
          &$crate::source_location!(),
          ::core::option::Option::Some(::core::format_args!($($message)+)),
      )
  };
}

#[cfg(feature = "ndebug")]
#[doc(hidden)]
#[macro_export]
macro_rules! __active {
  ($gate:ident, $($args:tt)*) => {
      $crate::$gate!(Disabled, $($args)*)
  };
}

#[cfg(all(feature = "verbose", not(feature = "ndebug")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __active {
  ($gate:ident, $($args:tt)*) => {
      $crate::$gate!(VerboseReport, $($args)*)
  };
}

#[cfg(not(any(feature = "verbose", feature = "ndebug")))]
#[doc(hidden)]
#[macro_export]
macro_rules! __active {
  ($gate:ident, $($args:tt)*) => {
      $crate::$gate!(MinimalReport, $($args)*)
  };
}

/// Checks that `condition` holds and halts the system if it does not.
///
/// The condition must be free of side effects: it is not evaluated at all in
/// builds with the `ndebug` feature.  The optional `core::fmt` message is only
/// formatted in verbose builds, but it is type-checked in all of them:
///
/// ```compile_fail
/// pw_assert::assert!(true, "{} {}", 1);
/// ```
///
/// ```compile_fail,E0277
/// struct NotDisplay;
/// pw_assert::assert!(true, "{}", NotDisplay);
/// ```
#[macro_export]
macro_rules! assert {
  ($condition:expr $(,)?) => {
      $crate::__active!(
          __gate,
          $condition,
          "assert!({}) failed",
          ::core::stringify!($condition)
      )
  };

  ($condition:expr, $($message:tt)+) => {
      $crate::__active!(__gate, $condition, $($message)+)
  };
}

/// Checks that two values are equal and halts the system if they are not.
///
/// Both operands must implement `PartialEq` and `Debug` in every build mode.
#[macro_export]
macro_rules! eq {
  ($left:expr, $right:expr $(,)?) => {
      $crate::__active!(__gate_cmp, $left, ==, $right, "eq")
  };

  ($left:expr, $right:expr, $($message:tt)+) => {
      $crate::__active!(__gate_cmp, $left, ==, $right, "eq", $($message)+)
  };
}

/// Checks that two values differ and halts the system if they do not.
#[macro_export]
macro_rules! ne {
  ($left:expr, $right:expr $(,)?) => {
      $crate::__active!(__gate_cmp, $left, !=, $right, "ne")
  };

  ($left:expr, $right:expr, $($message:tt)+) => {
      $crate::__active!(__gate_cmp, $left, !=, $right, "ne", $($message)+)
  };
}

/// Reports a fatal error and halts the system.
///
/// Unlike the checks above this is never compiled out.
#[macro_export]
macro_rules! panic {
  () => {
      $crate::__active!(__fail, "explicit panic")
  };

  ($($message:tt)+) => {
      $crate::__active!(__fail, $($message)+)
  };
}

/// Fails the build when a constant condition is false.
///
/// Usable in item and statement position.  Has no runtime representation.
///
/// ```
/// pw_assert::static_assert!(4 / 2 == 2);
/// pw_assert::static_assert!(core::mem::size_of::<u32>() == 4, "u32 is four bytes");
/// ```
///
/// A false condition is rejected during constant evaluation:
///
/// ```compile_fail,E0080
/// pw_assert::static_assert!(4 / 2 == 3);
/// ```
///
/// ```compile_fail,E0080
/// pw_assert::static_assert!(4 / 2 == 3, "integer division is broken");
/// ```
#[macro_export]
macro_rules! static_assert {
  ($condition:expr $(,)?) => {
      #[allow(dead_code)]
      const _: () = if !($condition) {
          ::core::panic!(
              "{}",
              ::core::concat!("static assertion failed: ", ::core::stringify!($condition))
          )
      };
  };

  ($condition:expr, $message:literal $(,)?) => {
      #[allow(dead_code)]
      const _: () = if !($condition) {
          ::core::panic!("{}", $message)
      };
  };
}
