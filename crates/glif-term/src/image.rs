// SPDX-License-Identifier: MIT
//
// Image — a 2D glyph grid with mixer-based compositing.
//
// Terminal cells have no alpha channel, so transparency is encoded by
// convention: a glyph whose codepoint is the blank sentinel (space) is
// treated as see-through by the default mixer. Blits clip against the
// destination, so drawing partially (or entirely) outside the grid is
// never an error.

use std::fmt;
use std::io::{self, Write};

use glif_geom::{Rect, Size, Vec2};

use crate::ansi;
use crate::drawable::Drawable;
use crate::glyph::Glyph;
use crate::mask::GlyphMask;

// ─── Mixers ──────────────────────────────────────────────────────────────────

/// Per-cell compositing operator: `(dst, src) -> result`.
pub type Mixer = fn(Glyph, Glyph) -> Glyph;

/// Default compositing rule: a blank source glyph is transparent
/// (destination shows through), anything else replaces the destination
/// outright.
#[must_use]
pub fn mix_opacity(dst: Glyph, src: Glyph) -> Glyph {
    if src.is_blank() { dst } else { src }
}

// ─── Image ───────────────────────────────────────────────────────────────────

/// An owned, row-major grid of [`Glyph`]s.
///
/// Supports single-cell writes, clipped and repeated blits of other
/// images, masked bulk filtering, and serialization to either plain
/// text or diff-compressed ANSI.
///
/// Reads outside the grid yield [`Glyph::DEFAULT`]; writes outside the
/// grid are dropped. Negative or oversized blit positions clip, they
/// never panic.
#[derive(Clone)]
pub struct Image {
    size: Size,
    glyphs: Vec<Glyph>,
    failed: bool,
    mixer: Mixer,
}

impl Image {
    /// Create an image of `size` with every cell set to `fill`.
    #[must_use]
    pub fn new(size: Size, fill: Glyph) -> Self {
        Self::with_mixer(size, fill, mix_opacity)
    }

    /// Create an image with an explicit default compositing operator.
    ///
    /// The mixer is used by [`Image::blit`] and friends whenever no
    /// per-call mixer is given.
    #[must_use]
    pub fn with_mixer(size: Size, fill: Glyph, mixer: Mixer) -> Self {
        Self {
            size,
            glyphs: vec![fill; size.area() as usize],
            failed: false,
            mixer,
        }
    }

    pub(crate) fn from_parts(size: Size, glyphs: Vec<Glyph>, failed: bool) -> Self {
        debug_assert_eq!(glyphs.len(), size.area() as usize);
        Self {
            size,
            glyphs,
            failed,
            mixer: mix_opacity,
        }
    }

    /// Grid dimensions.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.size.w
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.size.h
    }

    /// The grid as a rectangle anchored at the origin.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::sized(self.size)
    }

    /// Whether construction from a string encountered invalid UTF-8.
    ///
    /// Lossy decoding substitutes `?` cells rather than failing the
    /// whole parse; callers that care can check here.
    #[inline]
    #[must_use]
    pub const fn check_failure(&self) -> bool {
        self.failed
    }

    /// The backing glyph buffer, row-major.
    ///
    /// For drawables that want direct buffer access instead of going
    /// through [`Image::draw_glyph`].
    #[inline]
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Mutable access to the backing glyph buffer, row-major.
    #[inline]
    pub fn glyphs_mut(&mut self) -> &mut [Glyph] {
        &mut self.glyphs
    }

    #[inline]
    fn index(&self, pos: Vec2) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= i32::from(self.size.w) || pos.y >= i32::from(self.size.h)
        {
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        let i = pos.y as usize * self.size.w as usize + pos.x as usize;
        Some(i)
    }

    /// Read the glyph at `pos`, or [`Glyph::DEFAULT`] when out of bounds.
    #[must_use]
    pub fn glyph(&self, pos: Vec2) -> Glyph {
        self.index(pos).map_or(Glyph::DEFAULT, |i| self.glyphs[i])
    }

    /// Read the glyph at `pos` with coordinates wrapped modulo the grid
    /// size. Negative coordinates wrap toward the positive range, so
    /// `(-1, 0)` reads the last column. An empty image yields
    /// [`Glyph::DEFAULT`].
    #[must_use]
    pub fn glyph_wrapped(&self, pos: Vec2) -> Glyph {
        if self.size.is_empty() {
            return Glyph::DEFAULT;
        }
        let wrapped = Vec2::new(
            pos.x.rem_euclid(i32::from(self.size.w)),
            pos.y.rem_euclid(i32::from(self.size.h)),
        );
        self.glyph(wrapped)
    }

    /// Write a single glyph at `pos`. Out-of-bounds writes are dropped.
    pub fn draw_glyph(&mut self, pos: Vec2, glyph: Glyph) {
        if let Some(i) = self.index(pos) {
            self.glyphs[i] = glyph;
        }
    }

    /// Set every cell to `fill`.
    pub fn fill(&mut self, fill: Glyph) {
        self.glyphs.fill(fill);
    }

    /// Let a drawable render itself onto this image.
    pub fn draw(&mut self, drawable: &dyn Drawable) {
        drawable.draw_self(self);
    }

    // ── Blitting ──

    /// Blit `src` at `pos` using this image's default mixer.
    pub fn blit(&mut self, pos: Vec2, src: &Self) {
        self.blit_with(pos, src, self.mixer);
    }

    /// Blit `src` at `pos` with an explicit mixer.
    pub fn blit_with(&mut self, pos: Vec2, src: &Self, mixer: Mixer) {
        self.blit_rect_with(pos, src, src.bounds(), false, mixer);
    }

    /// Blit the sub-rectangle `bounds` of `src` at `pos`, optionally
    /// tiling, using this image's default mixer.
    pub fn blit_rect(&mut self, pos: Vec2, src: &Self, bounds: Rect, repeat: bool) {
        self.blit_rect_with(pos, src, bounds, repeat, self.mixer);
    }

    /// Blit the sub-rectangle `bounds` of `src` at `pos` with an
    /// explicit mixer.
    ///
    /// The destination footprint is `bounds.size` placed at `pos`,
    /// clipped against this image. Source cells come from `bounds` in
    /// `src` coordinates; when `repeat` is set, or when `bounds`
    /// reaches outside `src`, source reads wrap modulo the source size.
    /// Work is proportional to the clipped overlap, not the source
    /// area.
    pub fn blit_rect_with(&mut self, pos: Vec2, src: &Self, bounds: Rect, repeat: bool, mixer: Mixer) {
        let Some(dst) = Rect::from_parts(pos, bounds.size).intersect(self.bounds()) else {
            return;
        };
        let wrap = repeat || !src.bounds().contains_rect(bounds);

        for y in dst.pos.y..dst.bottom() {
            for x in dst.pos.x..dst.right() {
                let here = Vec2::new(x, y);
                let from = bounds.pos + (here - pos);
                let over = if wrap { src.glyph_wrapped(from) } else { src.glyph(from) };
                let under = self.glyph(here);
                self.draw_glyph(here, mixer(under, over));
            }
        }
    }

    // ── Filtering ──

    /// Apply `apply` in place to every cell matched by `check`.
    pub fn filter(&mut self, check: &GlyphMask, apply: &GlyphMask) {
        for glyph in &mut self.glyphs {
            if check.check(glyph) {
                apply.apply(glyph);
            }
        }
    }

    // ── Serialization ──

    /// Serialize the rectangular region `bounds` of this image.
    ///
    /// Rows are separated by `\n` with no trailing newline. In plain
    /// mode only the bare characters are written. Otherwise each row is
    /// emitted as diff-compressed ANSI: the first cell carries its full
    /// style, subsequent cells only the changes, and the row ends with
    /// a hard reset so no styling bleeds across rows.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn write_region(
        &self,
        w: &mut impl Write,
        bounds: Rect,
        repeat: bool,
        plain: bool,
    ) -> io::Result<()> {
        for y in bounds.pos.y..bounds.bottom() {
            if y > bounds.pos.y {
                w.write_all(b"\n")?;
            }
            let mut prev: Option<Glyph> = None;
            for x in bounds.pos.x..bounds.right() {
                let pos = Vec2::new(x, y);
                let glyph = if repeat { self.glyph_wrapped(pos) } else { self.glyph(pos) };
                if !plain {
                    glyph.write_sgr_diff(w, prev.as_ref())?;
                    prev = Some(glyph);
                }
                glyph.write_symbol(w)?;
            }
            if !plain && !bounds.size.is_empty() {
                ansi::reset(w)?;
            }
        }
        Ok(())
    }

    /// Serialize a region to a `String`. See [`Image::write_region`].
    #[must_use]
    pub fn region_text(&self, bounds: Rect, repeat: bool, plain: bool) -> String {
        let mut out = Vec::new();
        // Writes to a Vec cannot fail.
        let _ = self.write_region(&mut out, bounds, repeat, plain);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// The whole image as bare characters, rows separated by `\n`.
    #[must_use]
    pub fn to_plain(&self) -> String {
        self.region_text(self.bounds(), false, true)
    }

    /// The whole image as diff-compressed ANSI text.
    #[must_use]
    pub fn to_ansi(&self) -> String {
        self.region_text(self.bounds(), false, false)
    }
}

// Mixer function pointers are identity-compared at best, which says
// nothing useful about two images; equality is content only.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.glyphs == other.glyphs
    }
}

impl Eq for Image {}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image {}x{}{}", self.size.w, self.size.h, if self.failed { " (failed)" } else { "" })?;
        for line in self.to_plain().lines() {
            writeln!(f, "|{line}|")?;
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
