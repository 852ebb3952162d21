// SPDX-License-Identifier: MIT
//
// ANSI escape sequence emitters.
//
// Pure functions that write escape sequences to any `impl Write`. No
// state, no decisions about when to emit — glyph diffing and the
// screen's display routine own those. This module just knows the
// byte-level encoding of every terminal command the compositor uses.
//
// All functions return `io::Result` propagated from the underlying
// writer. Writing to an `OutputBuffer` (a Vec) never fails.

use std::io::{self, Write};

// ─── SGR ─────────────────────────────────────────────────────────────────────

/// Set the foreground to an xterm-256 palette index.
#[inline]
pub fn fg(w: &mut impl Write, index: u8) -> io::Result<()> {
    write!(w, "\x1b[38;5;{index}m")
}

/// Set the background to an xterm-256 palette index.
#[inline]
pub fn bg(w: &mut impl Write, index: u8) -> io::Result<()> {
    write!(w, "\x1b[48;5;{index}m")
}

/// Reset all SGR attributes to terminal defaults.
///
/// Emitted as `SGR 00` — the two-digit form every row of serialized
/// output is closed with.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[00m")
}

// ─── Cursor & Erase ──────────────────────────────────────────────────────────

/// Move the cursor up `n` lines (CUU). Emits nothing for `n = 0`.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Erase from the cursor to the end of the screen (ED 0).
#[inline]
pub fn erase_below(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[J")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: run an emitter and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn fg_sequence() {
        assert_eq!(emit(|w| fg(w, 0)), "\x1b[38;5;0m");
        assert_eq!(emit(|w| fg(w, 196)), "\x1b[38;5;196m");
        assert_eq!(emit(|w| fg(w, 255)), "\x1b[38;5;255m");
    }

    #[test]
    fn bg_sequence() {
        assert_eq!(emit(|w| bg(w, 21)), "\x1b[48;5;21m");
    }

    #[test]
    fn reset_uses_two_digit_form() {
        assert_eq!(emit(|w| reset(w)), "\x1b[00m");
    }

    #[test]
    fn cursor_up_sequence() {
        assert_eq!(emit(|w| cursor_up(w, 1)), "\x1b[1A");
        assert_eq!(emit(|w| cursor_up(w, 24)), "\x1b[24A");
    }

    #[test]
    fn cursor_up_zero_emits_nothing() {
        assert_eq!(emit(|w| cursor_up(w, 0)), "");
    }

    #[test]
    fn erase_below_sequence() {
        assert_eq!(emit(|w| erase_below(w)), "\x1b[J");
    }

    #[test]
    fn cursor_visibility_sequences() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }
}
