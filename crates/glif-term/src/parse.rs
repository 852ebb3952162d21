// SPDX-License-Identifier: MIT
//
// String-grammar construction of Images.
//
// An image can be built from printable text with embedded SGR escape
// sequences, the same format `Image::to_ansi` emits. The scanner has
// two states, "in text" and "in escape": text characters become cells
// carrying the running style, `\x1b[...m` sequences update that style,
// and `\n` starts a new row. Malformed escapes are skipped without
// aborting the parse.

use unicode_width::UnicodeWidthChar;

use glif_geom::Size;

use crate::glyph::{Glyph, Mode, MODE_TABLE};
use crate::image::Image;

impl Image {
    /// Build an image from text with embedded SGR sequences, starting
    /// from the default style.
    ///
    /// ```
    /// use glif_term::image::Image;
    ///
    /// let img = Image::parse("ab\ncd");
    /// assert_eq!(img.to_plain(), "ab\ncd");
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_styled(text, Glyph::DEFAULT_FG, Glyph::DEFAULT_BG, Mode::empty())
    }

    /// Build an image from text, starting from an explicit style.
    ///
    /// The given colors and mode seed the running style and are what
    /// SGR code `0` resets back to.
    #[must_use]
    pub fn parse_styled(text: &str, fg: u8, bg: u8, mode: Mode) -> Self {
        Parser::new(fg, bg, mode).run(text, false)
    }

    /// Build an image from raw bytes.
    ///
    /// Invalid UTF-8 is decoded lossily (bad sequences become
    /// replacement-character cells) and flagged; the flag is readable
    /// afterwards via [`Image::check_failure`].
    #[must_use]
    pub fn parse_bytes(bytes: &[u8], fg: u8, bg: u8, mode: Mode) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Parser::new(fg, bg, mode).run(text, false),
            Err(_) => {
                let text = String::from_utf8_lossy(bytes);
                Parser::new(fg, bg, mode).run(&text, true)
            }
        }
    }
}

// ─── Scanner ─────────────────────────────────────────────────────────────────

struct Parser {
    initial: Glyph,
    current: Glyph,
    rows: Vec<Vec<Glyph>>,
    row: Vec<Glyph>,
}

impl Parser {
    fn new(fg: u8, bg: u8, mode: Mode) -> Self {
        let initial = Glyph::DEFAULT.with_fg(fg).with_bg(bg).with_mode(mode);
        Self {
            initial,
            current: initial,
            rows: Vec::new(),
            row: Vec::new(),
        }
    }

    fn run(mut self, text: &str, failed: bool) -> Image {
        if text.is_empty() {
            return Image::from_parts(Size::ZERO, Vec::new(), failed);
        }

        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\n' => self.rows.push(std::mem::take(&mut self.row)),
                '\x1b' => {
                    if chars.peek() == Some(&'[') {
                        chars.next();
                        self.escape(&mut chars);
                    }
                    // A bare escape is dropped; scanning resumes at
                    // the next character.
                }
                ch if ch.width().unwrap_or(0) == 0 => {}
                ch => self.row.push(self.current.with_unicode(ch)),
            }
        }
        self.rows.push(std::mem::take(&mut self.row));
        self.finish(failed)
    }

    /// Consume an SGR body after `\x1b[`. Stops at `m` (applies the
    /// codes) or at the first character that is neither a digit nor a
    /// separator (discards the sequence, leaving that character for
    /// the text scanner).
    fn escape(&mut self, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
        let mut body = String::new();
        while let Some(&ch) = chars.peek() {
            match ch {
                'm' => {
                    chars.next();
                    self.apply_sgr(&body);
                    return;
                }
                '0'..='9' | ';' => {
                    chars.next();
                    body.push(ch);
                }
                _ => return,
            }
        }
    }

    fn apply_sgr(&mut self, body: &str) {
        let codes: Vec<u8> = body.split(';').map(|c| c.parse().unwrap_or(u8::MAX)).collect();
        let mut i = 0;
        while i < codes.len() {
            match codes[i] {
                0 => self.current = self.initial,
                38 if codes.get(i + 1) == Some(&5) => {
                    if let Some(&n) = codes.get(i + 2) {
                        self.current.fg = n;
                        i += 2;
                    }
                }
                48 if codes.get(i + 1) == Some(&5) => {
                    if let Some(&n) = codes.get(i + 2) {
                        self.current.bg = n;
                        i += 2;
                    }
                }
                code => {
                    for &(flag, set, reset) in &MODE_TABLE {
                        if code == set {
                            self.current.mode |= flag;
                        } else if code == reset {
                            self.current.mode &= !flag;
                        }
                    }
                }
            }
            i += 1;
        }
    }

    /// Pad every row to the widest row's length. The pad glyph takes
    /// the style of the row's last cell (the running style for an
    /// empty row) with a blank codepoint.
    fn finish(self, failed: bool) -> Image {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = self.rows.len();
        let mut glyphs = Vec::with_capacity(width * height);
        for row in self.rows {
            let pad = row.last().copied().unwrap_or(self.current).with_unicode(' ');
            let len = row.len();
            glyphs.extend(row);
            glyphs.extend(std::iter::repeat_n(pad, width - len));
        }
        #[allow(clippy::cast_possible_truncation)]
        let size = Size::new(width as u16, height as u16);
        Image::from_parts(size, glyphs, failed)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
