// SPDX-License-Identifier: MIT
//
// glif-term — ANSI terminal glyph compositor.
//
// A small software rasterizer for character cells: glyphs carry a
// codepoint, 256-color foreground/background, and SGR mode bits;
// images composite glyphs through pluggable mixer functions with
// clipped and tiled blits; a screen maps its backing image onto the
// live terminal and redraws differentially, rewriting only its own
// footprint with per-row diff-compressed escape codes.
//
// The crate intentionally avoids TUI frameworks (ratatui, crossterm)
// in favor of direct terminal control via ANSI escape sequences and
// raw termios. Every byte sent to the terminal is accounted for.

pub mod ansi;
pub mod drawable;
pub mod glyph;
pub mod image;
pub mod input;
pub mod mask;
pub mod output;
mod parse;
pub mod screen;
pub mod terminal;

pub use drawable::{Blinker, Drawable, Frame, FrameError, Sprite};
pub use glyph::{Glyph, Mode};
pub use image::{Image, Mixer};
pub use mask::{GlyphMask, MaskBits};
pub use output::OutputBuffer;
pub use screen::{DisplayStats, Screen};
