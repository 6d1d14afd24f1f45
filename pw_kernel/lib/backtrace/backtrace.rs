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

//! Frame pointer stack walking.
//!
//! Requires code to be built with frame pointers
//! (`-C force-frame-pointers=yes`).  The walk never allocates and only reads
//! memory inside the window it was given, so it can run from a fault handler
//! on a stack that may already be damaged.

use core::fmt;

const WORD: usize = core::mem::size_of::<usize>();

/// Position of a frame record relative to the frame pointer, in words.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameLayout {
    /// Offset of the caller's frame pointer.
    pub next_frame: isize,
    /// Offset of the return address into the caller.
    pub return_address: isize,
}

impl FrameLayout {
    /// `{previous frame pointer, return address}` stored at the frame pointer.
    ///
    /// Arm (`r7`/`r11`), AArch64 (`x29`) and x86_64 (`rbp`).
    pub const RECORD_AT_FRAME_POINTER: Self = Self {
        next_frame: 0,
        return_address: 1,
    };

    /// Frame pointer points just past `{previous frame pointer, return
    /// address}`.
    ///
    /// RISC-V (`s0`).
    pub const RECORD_BELOW_FRAME_POINTER: Self = Self {
        next_frame: -2,
        return_address: -1,
    };

    const fn lowest_offset(&self) -> isize {
        if self.next_frame < self.return_address {
            self.next_frame
        } else {
            self.return_address
        }
    }
}

/// Fixed capacity list of return addresses, innermost first.
#[derive(Clone, Copy)]
pub struct Backtrace<const N: usize> {
    addresses: [usize; N],
    len: usize,
}

impl<const N: usize> Backtrace<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            addresses: [0; N],
            len: 0,
        }
    }

    /// Appends `address`, returning false if the trace is already full.
    pub fn push(&mut self, address: usize) -> bool {
        if self.is_full() {
            return false;
        }
        self.addresses[self.len] = address;
        self.len += 1;
        true
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.addresses[..self.len]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }
}

impl<const N: usize> Default for Backtrace<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for Backtrace<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Space separated hex addresses, ready to paste into `addr2line -a`.
impl<const N: usize> fmt::Display for Backtrace<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, address) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{address:#x}")?;
        }
        Ok(())
    }
}

struct StackWindow {
    low: usize,
    high: usize,
}

impl StackWindow {
    fn read(&self, frame_pointer: usize, offset: isize) -> Option<usize> {
        let address = frame_pointer.checked_add_signed(offset.checked_mul(WORD as isize)?)?;
        if address < self.low || address.checked_add(WORD)? > self.high {
            return None;
        }
        // SAFETY: the caller of `walk` guarantees the window is readable and
        // `address` is word aligned because `frame_pointer` is.
        Some(unsafe { (address as *const usize).read_volatile() })
    }
}

/// Walks the frame pointer chain starting at `frame_pointer`.
///
/// The first `skip` return addresses are dropped.  The walk stops at a zero
/// return address, at a frame pointer that is misaligned, leaves the window
/// or does not move towards the caller, or when the trace is full.
///
/// # Safety
///
/// Every word from the frame record of `frame_pointer` up to
/// `frame_pointer + span_bytes` must be readable.
#[must_use]
pub unsafe fn walk<const N: usize>(
    frame_pointer: usize,
    layout: FrameLayout,
    span_bytes: usize,
    mut skip: usize,
) -> Backtrace<N> {
    let mut trace = Backtrace::new();
    let below = layout.lowest_offset().min(0).unsigned_abs() * WORD;
    let window = StackWindow {
        low: frame_pointer.saturating_sub(below),
        high: frame_pointer.saturating_add(span_bytes),
    };

    let mut fp = frame_pointer;
    while !trace.is_full() {
        if fp == 0 || fp % WORD != 0 {
            break;
        }
        let Some(return_address) = window.read(fp, layout.return_address) else {
            break;
        };
        let Some(next) = window.read(fp, layout.next_frame) else {
            break;
        };
        if return_address == 0 {
            break;
        }

        if skip > 0 {
            skip -= 1;
        } else {
            trace.push(return_address);
        }

        // Stacks grow down: callers always live at higher addresses.
        if next <= fp {
            break;
        }
        fp = next;
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeStack {
        words: [usize; 16],
    }

    impl FakeStack {
        fn new() -> Box<Self> {
            Box::new(Self { words: [0; 16] })
        }

        fn addr(&self, index: usize) -> usize {
            self.words.as_ptr() as usize + index * WORD
        }

        fn span(&self) -> usize {
            self.words.len() * WORD
        }

        fn walk<const N: usize>(&self, start: usize, layout: FrameLayout, skip: usize) -> Backtrace<N> {
            unsafe { walk(self.addr(start), layout, self.span() - start * WORD, skip) }
        }
    }

    // Three records at words 0, 3 and 6, the outermost ending the chain.
    fn three_frames() -> Box<FakeStack> {
        let mut stack = FakeStack::new();
        let (f1, f2) = (stack.addr(3), stack.addr(6));
        stack.words[0] = f1;
        stack.words[1] = 0x1001;
        stack.words[3] = f2;
        stack.words[4] = 0x2002;
        stack.words[6] = 0;
        stack.words[7] = 0x3003;
        stack
    }

    #[test]
    fn follows_chain_to_outermost_frame() {
        let stack = three_frames();
        let trace = stack.walk::<8>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 0);
        assert_eq!(trace.as_slice(), &[0x1001, 0x2002, 0x3003]);
    }

    #[test]
    fn skips_innermost_frames() {
        let stack = three_frames();
        let trace = stack.walk::<8>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 2);
        assert_eq!(trace.as_slice(), &[0x3003]);
    }

    #[test]
    fn stops_when_full() {
        let stack = three_frames();
        let trace = stack.walk::<2>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 0);
        assert!(trace.is_full());
        assert_eq!(trace.as_slice(), &[0x1001, 0x2002]);
    }

    #[test]
    fn stops_at_zero_return_address() {
        let mut stack = three_frames();
        stack.words[4] = 0;
        let trace = stack.walk::<8>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 0);
        assert_eq!(trace.as_slice(), &[0x1001]);
    }

    #[test]
    fn stops_at_frame_outside_window() {
        let mut stack = three_frames();
        stack.words[3] = stack.addr(0) + 4096;
        let trace = stack.walk::<8>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 0);
        assert_eq!(trace.as_slice(), &[0x1001, 0x2002]);
    }

    #[test]
    fn stops_at_frame_below_current() {
        let mut stack = three_frames();
        stack.words[3] = stack.addr(0);
        let trace = stack.walk::<8>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 0);
        assert_eq!(trace.as_slice(), &[0x1001, 0x2002]);
    }

    #[test]
    fn stops_at_misaligned_frame() {
        let mut stack = three_frames();
        stack.words[0] = stack.addr(3) + 1;
        let trace = stack.walk::<8>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 0);
        assert_eq!(trace.as_slice(), &[0x1001]);
    }

    #[test]
    fn null_frame_pointer_yields_empty_trace() {
        let trace = unsafe { walk::<4>(0, FrameLayout::RECORD_AT_FRAME_POINTER, 64, 0) };
        assert!(trace.is_empty());
    }

    #[test]
    fn follows_records_below_frame_pointer() {
        let mut stack = FakeStack::new();
        // Frame pointers point at words 2 and 5; records sit just below.
        stack.words[0] = stack.addr(5);
        stack.words[1] = 0xa0a0;
        stack.words[3] = 0;
        stack.words[4] = 0xb0b0;
        let trace = stack.walk::<8>(2, FrameLayout::RECORD_BELOW_FRAME_POINTER, 0);
        assert_eq!(trace.as_slice(), &[0xa0a0, 0xb0b0]);
    }

    #[test]
    fn displays_hex_addresses() {
        let mut trace = Backtrace::<4>::new();
        assert_eq!(trace.to_string(), "");
        trace.push(0x1001);
        trace.push(0x2002);
        assert_eq!(trace.to_string(), "0x1001 0x2002");
    }
}
