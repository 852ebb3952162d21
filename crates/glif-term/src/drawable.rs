// SPDX-License-Identifier: MIT
//
// Drawable — things that can render themselves onto an Image.
//
// Open extension point: composite shapes implement the trait and are
// handed to `Image::draw` as trait objects, so downstream crates can
// add their own drawables.

use std::cell::Cell;
use std::error::Error;
use std::fmt;

use glif_geom::{Rect, Vec2};

use crate::glyph::{Glyph, Mode};
use crate::image::Image;

/// Renders itself onto a target image.
///
/// Drawing takes `&self`: a drawable's visible output must not change
/// from being drawn, though hidden animation state (see [`Blinker`])
/// may live in interior-mutability cells.
pub trait Drawable {
    fn draw_self(&self, target: &mut Image);
}

// ─── Frame ───────────────────────────────────────────────────────────────────

/// Tileset string for a frame drawn with light box-drawing characters.
pub const TILES_LIGHT: &str = "┌─┐│ │└─┘";

/// Tileset string for a frame drawn with double box-drawing characters.
pub const TILES_DOUBLE: &str = "╔═╗║ ║╚═╝";

/// A frame tileset did not decode to exactly nine codepoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameError {
    /// Codepoints the tileset actually decoded to.
    pub found: usize,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame tileset must decode to 9 codepoints, got {}", self.found)
    }
}

impl Error for FrameError {}

/// An axis-aligned rectangular border.
///
/// The tileset is a 3x3 grid of codepoints read row-major: corners at
/// indices 0, 2, 6 and 8; index 1 is repeated along the top and
/// bottom edges, 3 along the left edge, 5 along the right. Indices 4
/// and 7 are unused by the border but must still be present.
pub struct Frame {
    rect: Rect,
    tiles: [Glyph; 9],
}

impl Frame {
    /// Create a frame over `rect` from a nine-codepoint tileset, with
    /// every tile carrying `style`'s colors and mode.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] when the tileset length is not nine.
    pub fn new(rect: Rect, tileset: &str, style: Glyph) -> Result<Self, FrameError> {
        let mut tiles = [style; 9];
        let mut count = 0;
        for (i, ch) in tileset.chars().enumerate() {
            if i < 9 {
                tiles[i] = style.with_unicode(ch);
            }
            count = i + 1;
        }
        if count != 9 {
            return Err(FrameError { found: count });
        }
        Ok(Self { rect, tiles })
    }

    /// The framed rectangle.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Move the frame to a new rectangle, keeping the tileset.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

impl Drawable for Frame {
    fn draw_self(&self, target: &mut Image) {
        if self.rect.is_empty() {
            return;
        }
        let left = self.rect.pos.x;
        let top = self.rect.pos.y;
        let right = self.rect.right() - 1;
        let bottom = self.rect.bottom() - 1;

        for x in (left + 1)..right {
            target.draw_glyph(Vec2::new(x, top), self.tiles[1]);
            target.draw_glyph(Vec2::new(x, bottom), self.tiles[1]);
        }
        for y in (top + 1)..bottom {
            target.draw_glyph(Vec2::new(left, y), self.tiles[3]);
            target.draw_glyph(Vec2::new(right, y), self.tiles[5]);
        }
        target.draw_glyph(Vec2::new(left, top), self.tiles[0]);
        target.draw_glyph(Vec2::new(right, top), self.tiles[2]);
        target.draw_glyph(Vec2::new(left, bottom), self.tiles[6]);
        target.draw_glyph(Vec2::new(right, bottom), self.tiles[8]);
    }
}

// ─── Blinker ─────────────────────────────────────────────────────────────────

/// A glyph whose style pulses on a tick clock.
///
/// [`Blinker::update`] accumulates elapsed ticks and flips the phase
/// every `period` ticks. While "on" the glyph is drawn with
/// [`Mode::REVERSED`] added; while "off" it is drawn plain. The phase
/// lives in cells so that advancing the clock works through `&self`,
/// matching the draw path.
pub struct Blinker {
    pos: Vec2,
    glyph: Glyph,
    period: u32,
    accumulated: Cell<u32>,
    on: Cell<bool>,
}

impl Blinker {
    /// Create a blinker at `pos` flipping phase every `period` ticks.
    /// A zero period is treated as one.
    #[must_use]
    pub fn new(pos: Vec2, glyph: Glyph, period: u32) -> Self {
        Self {
            pos,
            glyph,
            period: period.max(1),
            accumulated: Cell::new(0),
            on: Cell::new(true),
        }
    }

    /// Advance the clock by `delta` ticks, flipping the phase once per
    /// elapsed period.
    pub fn update(&self, delta: u32) {
        let mut acc = self.accumulated.get() + delta;
        while acc >= self.period {
            acc -= self.period;
            self.on.set(!self.on.get());
        }
        self.accumulated.set(acc);
    }

    /// Reset to the "on" phase with an empty accumulator.
    pub fn reset(&self) {
        self.accumulated.set(0);
        self.on.set(true);
    }

    /// Whether the blinker is currently in its "on" phase.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on.get()
    }

    /// Move the blinker.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
}

impl Drawable for Blinker {
    fn draw_self(&self, target: &mut Image) {
        let glyph = if self.on.get() {
            self.glyph.with_mode(self.glyph.mode | Mode::REVERSED)
        } else {
            self.glyph
        };
        target.draw_glyph(self.pos, glyph);
    }
}

// ─── Sprite ──────────────────────────────────────────────────────────────────

/// A positioned image blitted through the target's compositing mixer.
///
/// Blank cells in the sprite's image are transparent under the default
/// mixer, so irregular shapes composite naturally.
pub struct Sprite {
    pos: Vec2,
    image: Image,
}

impl Sprite {
    /// Create a sprite from an image anchored at `pos`.
    #[must_use]
    pub const fn new(pos: Vec2, image: Image) -> Self {
        Self { pos, image }
    }

    /// Current anchor position.
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Move the sprite to an absolute position.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Move the sprite by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// The sprite's image.
    #[must_use]
    pub const fn image(&self) -> &Image {
        &self.image
    }
}

impl Drawable for Sprite {
    fn draw_self(&self, target: &mut Image) {
        target.blit(self.pos, &self.image);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use glif_geom::Size;
    use pretty_assertions::assert_eq;

    fn canvas(w: u16, h: u16) -> Image {
        Image::new(Size::new(w, h), Glyph::new('.'))
    }

    // ── Frame ──

    #[test]
    fn tileset_must_have_nine_codepoints() {
        let rect = Rect::new(0, 0, 3, 3);
        assert_eq!(
            Frame::new(rect, "12345678", Glyph::DEFAULT).err(),
            Some(FrameError { found: 8 })
        );
        assert_eq!(
            Frame::new(rect, "1234567890", Glyph::DEFAULT).err(),
            Some(FrameError { found: 10 })
        );
        assert!(Frame::new(rect, TILES_LIGHT, Glyph::DEFAULT).is_ok());
    }

    #[test]
    fn tileset_length_counts_codepoints_not_bytes() {
        // Nine multi-byte box-drawing characters are a valid tileset.
        assert!(Frame::new(Rect::new(0, 0, 2, 2), TILES_DOUBLE, Glyph::DEFAULT).is_ok());
    }

    #[test]
    fn frame_draws_corners_and_edges() {
        let mut img = canvas(4, 3);
        let frame = Frame::new(Rect::new(0, 0, 4, 3), "ABCDEFGHI", Glyph::DEFAULT).unwrap();
        img.draw(&frame);
        assert_eq!(img.to_plain(), "ABBC\nD..F\nGBBI");
    }

    #[test]
    fn frame_clips_against_canvas() {
        let mut img = canvas(2, 2);
        let frame = Frame::new(Rect::new(-1, -1, 3, 3), "ABCDEFGHI", Glyph::DEFAULT).unwrap();
        img.draw(&frame);
        // Only the border's bottom-right quadrant lands inside.
        assert_eq!(img.to_plain(), ".F\nBI");
    }

    #[test]
    fn degenerate_single_cell_frame_draws_one_corner_cell() {
        let mut img = canvas(3, 1);
        let frame = Frame::new(Rect::new(1, 0, 1, 1), "ABCDEFGHI", Glyph::DEFAULT).unwrap();
        img.draw(&frame);
        // All four corners collapse onto the same cell; the last drawn
        // wins.
        assert_eq!(img.to_plain(), ".I.");
    }

    #[test]
    fn frame_tiles_carry_style() {
        let mut img = canvas(2, 2);
        let style = Glyph::DEFAULT.with_fg(5);
        let frame = Frame::new(Rect::new(0, 0, 2, 2), "ABCDEFGHI", style).unwrap();
        img.draw(&frame);
        assert_eq!(img.glyph(Vec2::ZERO).fg, 5);
    }

    // ── Blinker ──

    #[test]
    fn blinker_starts_on_and_toggles_each_period() {
        let b = Blinker::new(Vec2::ZERO, Glyph::new('*'), 10);
        assert!(b.is_on());
        b.update(9);
        assert!(b.is_on());
        b.update(1);
        assert!(!b.is_on());
        b.update(10);
        assert!(b.is_on());
    }

    #[test]
    fn large_delta_flips_once_per_elapsed_period() {
        let b = Blinker::new(Vec2::ZERO, Glyph::new('*'), 10);
        b.update(35);
        // Three full periods elapsed: on -> off -> on -> off.
        assert!(!b.is_on());
        assert_eq!(b.accumulated.get(), 5);
    }

    #[test]
    fn on_phase_draws_reversed_off_phase_plain() {
        let glyph = Glyph::new('*').with_mode(Mode::INTENSE);
        let b = Blinker::new(Vec2::ZERO, glyph, 1);
        let mut img = canvas(1, 1);

        img.draw(&b);
        assert_eq!(img.glyph(Vec2::ZERO).mode, Mode::INTENSE | Mode::REVERSED);

        b.update(1);
        img.draw(&b);
        assert_eq!(img.glyph(Vec2::ZERO).mode, Mode::INTENSE);
    }

    #[test]
    fn reset_returns_to_on_phase() {
        let b = Blinker::new(Vec2::ZERO, Glyph::new('*'), 2);
        b.update(2);
        assert!(!b.is_on());
        b.reset();
        assert!(b.is_on());
        assert_eq!(b.accumulated.get(), 0);
    }

    // ── Sprite ──

    #[test]
    fn sprite_blits_at_its_position() {
        let mut img = canvas(4, 1);
        let sprite = Sprite::new(Vec2::new(1, 0), Image::new(Size::new(2, 1), Glyph::new('#')));
        img.draw(&sprite);
        assert_eq!(img.to_plain(), ".##.");
    }

    #[test]
    fn sprite_blank_cells_are_transparent() {
        let mut img = canvas(3, 1);
        let shape = Image::parse("# ");
        let mut sprite = Sprite::new(Vec2::ZERO, shape);
        sprite.translate(Vec2::new(1, 0));
        img.draw(&sprite);
        assert_eq!(img.to_plain(), ".#.");
    }

    #[test]
    fn drawables_compose_through_trait_objects() {
        let mut img = canvas(3, 3);
        let frame = Frame::new(Rect::new(0, 0, 3, 3), TILES_LIGHT, Glyph::DEFAULT).unwrap();
        let blinker = Blinker::new(Vec2::new(1, 1), Glyph::new('*'), 1);
        let shapes: Vec<&dyn Drawable> = vec![&frame, &blinker];
        for shape in shapes {
            img.draw(shape);
        }
        assert_eq!(img.to_plain(), "┌─┐\n│*│\n└─┘");
    }
}
