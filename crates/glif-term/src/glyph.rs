// SPDX-License-Identifier: MIT
//
// Glyph — the atomic unit of terminal compositing.
//
// Every cell of an Image is a Glyph: a Unicode codepoint, xterm-256
// foreground and background palette indices, and a bitfield of SGR
// text modes. The whole pipeline exists to produce grids of these
// and serialize them as compactly as possible.
//
// Size: 8 bytes per glyph, Copy-friendly. A 200×50 canvas is 80 KB.
//
// Transparency model:
//
//   Terminal cells have no alpha channel, so the compositor encodes
//   "transparent" as a codepoint sentinel: a glyph whose codepoint is
//   the space character is fully transparent to the default opacity
//   mixer, anything else fully opaque. Colors and modes ride along
//   with the codepoint and do not participate in the test.
//
// Serialization comes in two flavors:
//
//   write_sgr       — the full unconditional SGR prefix.
//   write_sgr_diff  — only the SGR parameters that differ from the
//                     previously emitted glyph. Emitting a glyph
//                     against itself produces no escape at all. This
//                     is what keeps frames of mostly-uniform cells
//                     down to a handful of bytes per row.

use std::fmt::Write as _;
use std::io::{self, Write};

// ─── Text Modes ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR text modes stored as a compact bitfield.
    ///
    /// Each flag corresponds to one row of [`MODE_TABLE`], which maps
    /// it to its SGR "set" code and the code that switches it back off.
    /// Combine with bitwise OR:
    ///
    /// ```
    /// use glif_term::glyph::Mode;
    ///
    /// let style = Mode::INTENSE | Mode::UNDERLINED;
    /// assert!(style.contains(Mode::INTENSE));
    /// assert!(!style.contains(Mode::ITALIC));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Mode: u16 {
        /// SGR 1 — increased intensity (bold).
        const INTENSE    = 1 << 0;
        /// SGR 2 — decreased intensity (faint).
        const DIM        = 1 << 1;
        /// SGR 3 — italic or oblique.
        const ITALIC     = 1 << 2;
        /// SGR 4 — underline.
        const UNDERLINED = 1 << 3;
        /// SGR 7 — swap foreground and background.
        const REVERSED   = 1 << 4;
        /// SGR 8 — invisible text.
        const HIDDEN     = 1 << 5;
        /// SGR 9 — crossed-out text.
        const STRIKED    = 1 << 6;
    }
}

/// The fixed `(flag, set code, reset code)` mapping for every mode.
///
/// INTENSE and DIM share reset code 22 — that is what the ANSI
/// standard provides, there is no finer-grained off switch.
pub const MODE_TABLE: [(Mode, u8, u8); 7] = [
    (Mode::INTENSE, 1, 22),
    (Mode::DIM, 2, 22),
    (Mode::ITALIC, 3, 23),
    (Mode::UNDERLINED, 4, 24),
    (Mode::REVERSED, 7, 27),
    (Mode::HIDDEN, 8, 28),
    (Mode::STRIKED, 9, 29),
];

// ─── Glyph ───────────────────────────────────────────────────────────────────

/// Codepoint of the transparency sentinel (and of blank cells).
const SPACE: u32 = b' ' as u32;

/// A single terminal cell's renderable state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    /// Unicode codepoint to display.
    pub unicode: u32,
    /// Foreground palette index (xterm-256).
    pub fg: u8,
    /// Background palette index (xterm-256).
    pub bg: u8,
    /// Active text modes.
    pub mode: Mode,
}

impl Glyph {
    /// Foreground used by the default glyph (xterm palette white).
    pub const DEFAULT_FG: u8 = 7;
    /// Background used by the default glyph (xterm palette black).
    pub const DEFAULT_BG: u8 = 0;

    /// The default glyph: a space with default colors and no modes.
    ///
    /// Doubles as the transparency sentinel for the opacity mixers.
    pub const DEFAULT: Self = Self {
        unicode: SPACE,
        fg: Self::DEFAULT_FG,
        bg: Self::DEFAULT_BG,
        mode: Mode::empty(),
    };

    /// Create a glyph with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            unicode: ch as u32,
            ..Self::DEFAULT
        }
    }

    /// Create a fully styled glyph.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: u8, bg: u8, mode: Mode) -> Self {
        Self {
            unicode: ch as u32,
            fg,
            bg,
            mode,
        }
    }

    // ─── Builders ─────────────────────────────────────────────────────────

    /// Replace the codepoint.
    #[inline]
    #[must_use]
    pub const fn with_unicode(self, ch: char) -> Self {
        Self { unicode: ch as u32, ..self }
    }

    /// Replace the foreground palette index.
    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: u8) -> Self {
        Self { fg, ..self }
    }

    /// Replace the background palette index.
    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: u8) -> Self {
        Self { bg, ..self }
    }

    /// Replace the mode bitfield.
    #[inline]
    #[must_use]
    pub const fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    // ─── Queries ──────────────────────────────────────────────────────────

    /// The codepoint as a `char`, if it is a valid scalar value.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        char::from_u32(self.unicode)
    }

    /// Whether the codepoint is the space sentinel.
    ///
    /// The opacity mixers treat such glyphs as transparent regardless
    /// of their colors and modes.
    #[inline]
    #[must_use]
    pub const fn is_blank(self) -> bool {
        self.unicode == SPACE
    }

    // ─── Serialization ────────────────────────────────────────────────────

    /// Write the full unconditional SGR prefix for this glyph.
    ///
    /// `ESC [ 38;5;FG ; 48;5;BG` plus the set code of every active
    /// mode, closed with `m`. No trailing reset.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `w`.
    pub fn write_sgr(&self, w: &mut impl Write) -> io::Result<()> {
        write!(w, "\x1b[38;5;{};48;5;{}", self.fg, self.bg)?;
        for (flag, set, _) in MODE_TABLE {
            if self.mode.contains(flag) {
                write!(w, ";{set}")?;
            }
        }
        w.write_all(b"m")
    }

    /// Write only the SGR parameters that differ from `prev`.
    ///
    /// Emission order: reset codes for modes switched off, foreground
    /// and background (only if changed), set codes for modes switched
    /// on. A glyph diffed against itself writes nothing; `None` means
    /// the previous state is unknown and the full prefix is written.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `w`.
    pub fn write_sgr_diff(&self, w: &mut impl Write, prev: Option<&Self>) -> io::Result<()> {
        let Some(prev) = prev else {
            return self.write_sgr(w);
        };

        let mut params = String::new();
        let mut push = |params: &mut String, code: u8| {
            if !params.is_empty() {
                params.push(';');
            }
            let _ = write!(params, "{code}");
        };

        for (flag, _, reset) in MODE_TABLE {
            if prev.mode.contains(flag) && !self.mode.contains(flag) {
                push(&mut params, reset);
            }
        }
        if self.fg != prev.fg {
            push(&mut params, 38);
            push(&mut params, 5);
            push(&mut params, self.fg);
        }
        if self.bg != prev.bg {
            push(&mut params, 48);
            push(&mut params, 5);
            push(&mut params, self.bg);
        }
        for (flag, set, _) in MODE_TABLE {
            if self.mode.contains(flag) && !prev.mode.contains(flag) {
                push(&mut params, set);
            }
        }

        if params.is_empty() {
            return Ok(());
        }
        write!(w, "\x1b[{params}m")
    }

    /// Write the codepoint as UTF-8. Invalid scalars become `?`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `w`.
    pub fn write_symbol(&self, w: &mut impl Write) -> io::Result<()> {
        let ch = char::from_u32(self.unicode).unwrap_or('?');
        let mut buf = [0_u8; 4];
        w.write_all(ch.encode_utf8(&mut buf).as_bytes())
    }

    /// Full SGR prefix plus the character, as a `String`.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        let mut buf = Vec::new();
        // Writes to a Vec cannot fail.
        let _ = self.write_sgr(&mut buf);
        let _ = self.write_symbol(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Diffed SGR prefix plus the character, as a `String`.
    #[must_use]
    pub fn to_ansi_diff(&self, prev: Option<&Self>) -> String {
        let mut buf = Vec::new();
        let _ = self.write_sgr_diff(&mut buf, prev);
        let _ = self.write_symbol(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Default for Glyph {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Debug for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ch = char::from_u32(self.unicode).unwrap_or('?');
        write!(f, "Glyph({ch:?}")?;
        if self.fg != Self::DEFAULT_FG {
            write!(f, ", fg={}", self.fg)?;
        }
        if self.bg != Self::DEFAULT_BG {
            write!(f, ", bg={}", self.bg)?;
        }
        if !self.mode.is_empty() {
            write!(f, ", {:?}", self.mode)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    // ── Layout ──────────────────────────────────────────────────────────

    #[test]
    fn glyph_is_8_bytes() {
        assert_eq!(mem::size_of::<Glyph>(), 8);
    }

    #[test]
    fn glyph_is_copy() {
        let a = Glyph::new('x');
        let b = a;
        assert_eq!(a, b);
    }

    // ── Defaults ────────────────────────────────────────────────────────

    #[test]
    fn default_glyph_is_blank_space() {
        let g = Glyph::default();
        assert_eq!(g, Glyph::DEFAULT);
        assert_eq!(g.character(), Some(' '));
        assert_eq!(g.fg, Glyph::DEFAULT_FG);
        assert_eq!(g.bg, Glyph::DEFAULT_BG);
        assert!(g.mode.is_empty());
        assert!(g.is_blank());
    }

    #[test]
    fn styled_space_is_still_blank() {
        // Transparency is keyed on the codepoint alone.
        let g = Glyph::styled(' ', 196, 21, Mode::INTENSE);
        assert!(g.is_blank());
    }

    #[test]
    fn non_space_is_not_blank() {
        assert!(!Glyph::new('#').is_blank());
    }

    // ── Mode table ──────────────────────────────────────────────────────

    #[test]
    fn mode_table_covers_all_flags() {
        let mut all = Mode::empty();
        for (flag, _, _) in MODE_TABLE {
            all |= flag;
        }
        assert_eq!(all, Mode::all());
    }

    #[test]
    fn intense_and_dim_share_reset() {
        let resets: Vec<u8> = MODE_TABLE
            .iter()
            .filter(|&&(flag, _, _)| flag == Mode::INTENSE || flag == Mode::DIM)
            .map(|&(_, _, reset)| reset)
            .collect();
        assert_eq!(resets, vec![22, 22]);
    }

    // ── Full serialization ──────────────────────────────────────────────

    #[test]
    fn full_sgr_plain_glyph() {
        assert_eq!(Glyph::new('A').to_ansi(), "\x1b[38;5;7;48;5;0mA");
    }

    #[test]
    fn full_sgr_with_colors() {
        let g = Glyph::styled('x', 196, 21, Mode::empty());
        assert_eq!(g.to_ansi(), "\x1b[38;5;196;48;5;21mx");
    }

    #[test]
    fn full_sgr_with_modes_in_table_order() {
        let g = Glyph::new('B').with_mode(Mode::STRIKED | Mode::INTENSE | Mode::ITALIC);
        assert_eq!(g.to_ansi(), "\x1b[38;5;7;48;5;0;1;3;9mB");
    }

    #[test]
    fn full_sgr_unicode_symbol() {
        let g = Glyph::new('█');
        assert!(g.to_ansi().ends_with('█'));
    }

    #[test]
    fn invalid_codepoint_renders_question_mark() {
        let g = Glyph {
            unicode: 0xD800, // surrogate — not a scalar value
            ..Glyph::DEFAULT
        };
        assert!(g.character().is_none());
        assert!(g.to_ansi().ends_with('?'));
    }

    // ── Diffed serialization ────────────────────────────────────────────

    #[test]
    fn diff_against_self_emits_no_escape() {
        let g = Glyph::styled('Q', 3, 4, Mode::UNDERLINED);
        assert_eq!(g.to_ansi_diff(Some(&g)), "Q");
    }

    #[test]
    fn diff_against_none_is_full_prefix() {
        let g = Glyph::new('Z');
        assert_eq!(g.to_ansi_diff(None), g.to_ansi());
    }

    #[test]
    fn diff_fg_change_only() {
        let prev = Glyph::new('a');
        let next = prev.with_fg(42);
        assert_eq!(next.to_ansi_diff(Some(&prev)), "\x1b[38;5;42ma");
    }

    #[test]
    fn diff_bg_change_only() {
        let prev = Glyph::new('a');
        let next = prev.with_bg(200);
        assert_eq!(next.to_ansi_diff(Some(&prev)), "\x1b[48;5;200ma");
    }

    #[test]
    fn diff_mode_turned_on() {
        let prev = Glyph::new('a');
        let next = prev.with_mode(Mode::REVERSED);
        assert_eq!(next.to_ansi_diff(Some(&prev)), "\x1b[7ma");
    }

    #[test]
    fn diff_mode_turned_off_uses_reset_code() {
        let prev = Glyph::new('a').with_mode(Mode::ITALIC);
        let next = prev.with_mode(Mode::empty());
        assert_eq!(next.to_ansi_diff(Some(&prev)), "\x1b[23ma");
    }

    #[test]
    fn diff_removals_before_colors_before_additions() {
        let prev = Glyph::styled('a', 1, 2, Mode::DIM);
        let next = Glyph::styled('b', 3, 4, Mode::STRIKED);
        assert_eq!(
            next.to_ansi_diff(Some(&prev)),
            "\x1b[22;38;5;3;48;5;4;9mb"
        );
    }

    #[test]
    fn diff_unchanged_color_not_re_emitted() {
        let prev = Glyph::styled('a', 99, 2, Mode::empty());
        let next = Glyph::styled('b', 99, 2, Mode::INTENSE);
        assert_eq!(next.to_ansi_diff(Some(&prev)), "\x1b[1mb");
    }

    // ── Builders ────────────────────────────────────────────────────────

    #[test]
    fn builder_chain() {
        let g = Glyph::new('G')
            .with_fg(10)
            .with_bg(20)
            .with_mode(Mode::HIDDEN);
        assert_eq!(g, Glyph::styled('G', 10, 20, Mode::HIDDEN));
    }

    // ── Debug ───────────────────────────────────────────────────────────

    #[test]
    fn debug_default_shows_only_char() {
        assert_eq!(format!("{:?}", Glyph::DEFAULT), "Glyph(' ')");
    }

    #[test]
    fn debug_styled_shows_fields() {
        let g = Glyph::styled('A', 1, 2, Mode::INTENSE);
        let dbg = format!("{g:?}");
        assert!(dbg.contains("fg=1"));
        assert!(dbg.contains("bg=2"));
        assert!(dbg.contains("INTENSE"));
    }
}
