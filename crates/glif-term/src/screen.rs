// SPDX-License-Identifier: MIT
//
// Screen — maps a fixed-size backing Image onto the live terminal.
//
// The terminal size is re-queried on every view computation so the
// user can resize mid-run. Redraw is differential only at the line
// level: the previous frame's footprint is erased wholesale with
// cursor-up + erase-below, and the per-row SGR diff compression keeps
// the rewritten bytes small.

use std::cell::Cell;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use glif_geom::{align_clamped, Align, Rect, Size, Vec2};

use crate::ansi;
use crate::glyph::Glyph;
use crate::image::Image;
use crate::output::OutputBuffer;
use crate::terminal;

/// Compositing rule for drawing onto a screen: a blank destination
/// cell always takes the source, even a blank one, so painting the
/// explicit default over untouched cells registers. Otherwise the
/// usual opacity rule applies.
#[must_use]
pub fn mix_opacity(dst: Glyph, src: Glyph) -> Glyph {
    if dst.is_blank() || !src.is_blank() { src } else { dst }
}

/// What a display call wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayStats {
    /// Terminal rows the frame occupies.
    pub lines: u16,
    /// Total bytes emitted, control sequences included.
    pub bytes: usize,
}

/// A render target tied to the terminal.
///
/// Owns a backing [`Image`] plus alignment preferences and an offset
/// that position it within the live terminal. Derefs to the image, so
/// all drawing operations apply directly.
///
/// The previous frame's line count is interior state: displaying
/// changes what is on the terminal but not the glyph content, so
/// [`Screen::display`] takes `&self`.
pub struct Screen {
    image: Image,
    align_x: Align,
    align_y: Align,
    offset: Vec2,
    lines_displayed: Cell<u16>,
    displayed: Cell<bool>,
}

impl Screen {
    /// Create a screen with an explicit backing size.
    #[must_use]
    pub fn new(size: Size, fill: Glyph) -> Self {
        Self {
            image: Image::with_mixer(size, fill, mix_opacity),
            align_x: Align::Lower,
            align_y: Align::Lower,
            offset: Vec2::ZERO,
            lines_displayed: Cell::new(0),
            displayed: Cell::new(false),
        }
    }

    /// Create a screen sized to the current terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be queried.
    pub fn sized_to_terminal(fill: Glyph) -> io::Result<Self> {
        Ok(Self::new(terminal::size()?, fill))
    }

    /// Set both alignment axes.
    pub fn set_align(&mut self, x: Align, y: Align) {
        self.align_x = x;
        self.align_y = y;
    }

    /// Set the view offset applied after alignment.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Builder form of [`Screen::set_align`].
    #[must_use]
    pub fn with_align(mut self, x: Align, y: Align) -> Self {
        self.set_align(x, y);
        self
    }

    /// Builder form of [`Screen::set_offset`].
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.set_offset(offset);
        self
    }

    /// The visible sub-rectangle of the backing image for the current
    /// terminal size.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be queried.
    pub fn view(&self) -> io::Result<Rect> {
        Ok(self.view_for(terminal::size()?))
    }

    /// The visible sub-rectangle for a given terminal size.
    ///
    /// The rectangle is terminal-sized, positioned in backing-image
    /// coordinates; a negative origin means the backing image sits
    /// inside a larger terminal with a margin on that side.
    #[must_use]
    pub fn view_for(&self, term: Size) -> Rect {
        align_clamped(self.image.size(), term, self.align_x, self.align_y, self.offset)
    }

    /// Render the current frame to stdout. See [`Screen::display_to`].
    ///
    /// # Errors
    ///
    /// Returns an error if the size query or the terminal write fails.
    pub fn display(&self) -> io::Result<DisplayStats> {
        self.display_to(&mut io::stdout().lock())
    }

    /// Render the current frame to `w`, querying the live terminal
    /// size for the view.
    ///
    /// # Errors
    ///
    /// Returns an error if the size query or the write fails.
    pub fn display_to(&self, w: &mut impl Write) -> io::Result<DisplayStats> {
        let term = terminal::size()?;
        self.display_for(w, term)
    }

    /// Render the current frame to `w` for a given terminal size.
    ///
    /// If a previous call wrote N lines, first moves the cursor up N
    /// and erases below, then emits the serialized view followed by a
    /// newline. The whole frame goes through one buffered write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn display_for(&self, w: &mut impl Write, term: Size) -> io::Result<DisplayStats> {
        let view = self.view_for(term);
        let mut buf = OutputBuffer::new();

        let prev = self.lines_displayed.get();
        if prev > 0 {
            ansi::cursor_up(&mut buf, prev)?;
            ansi::erase_below(&mut buf)?;
        }
        let lines = view.size.h;
        if lines > 0 {
            self.image.write_region(&mut buf, view, false, false)?;
            buf.write_all(b"\n")?;
            self.displayed.set(true);
        }
        self.lines_displayed.set(lines);

        let stats = DisplayStats { lines, bytes: buf.len() };
        buf.flush_to(w)?;
        Ok(stats)
    }
}

impl Deref for Screen {
    type Target = Image;

    fn deref(&self) -> &Image {
        &self.image
    }
}

impl DerefMut for Screen {
    fn deref_mut(&mut self) -> &mut Image {
        &mut self.image
    }
}

impl Drop for Screen {
    /// Leave the cursor below the rendered region.
    fn drop(&mut self) {
        if self.displayed.get() {
            let _ = io::stdout().write_all(b"\n");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
