// SPDX-License-Identifier: MIT
//
// glif-geom — integer cell-space geometry for the glif compositor.
//
// Terminal compositing lives in two coordinate domains: signed
// positions (a sprite can sit partially off-canvas at a negative
// offset) and unsigned extents (a buffer is never negative cells
// wide). Keeping the two apart in the type system removes a whole
// class of wraparound bugs from the blit and viewport math.

pub mod rect;
pub mod vector;

pub use rect::{Align, Rect, align_clamped};
pub use vector::{Size, Vec2};
