// SPDX-License-Identifier: MIT
//
// Rect — a positioned extent, plus the viewport alignment math.
//
// The origin is signed (a rect may hang off any edge of whatever it
// is measured against), the extent unsigned, and both right and
// bottom edges are exclusive. Every blit in the compositor reduces
// to one `intersect` call followed by a loop over the overlap, so
// the intersection here is the clipping algorithm.

use crate::vector::{Size, Vec2};

// ─── Rect ────────────────────────────────────────────────────────────────────

/// A rectangle in cell space: signed origin, unsigned extent.
///
/// ```
/// use glif_geom::{Rect, Vec2};
///
/// let r = Rect::new(2, 1, 4, 3);
/// assert!(r.contains(Vec2::new(2, 1)));   // top-left: inside
/// assert!(r.contains(Vec2::new(5, 3)));   // bottom-right: inside
/// assert!(!r.contains(Vec2::new(6, 1)));  // right edge: exclusive
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Top-left corner.
    pub pos: Vec2,
    /// Extent in cells.
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from origin coordinates and extent.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: u16, h: u16) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Size::new(w, h),
        }
    }

    /// Create a rectangle from an origin point and an extent.
    #[inline]
    #[must_use]
    pub const fn from_parts(pos: Vec2, size: Size) -> Self {
        Self { pos, size }
    }

    /// A rectangle covering `size` cells at the origin.
    #[inline]
    #[must_use]
    pub const fn sized(size: Size) -> Self {
        Self {
            pos: Vec2::ZERO,
            size,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> i32 {
        self.pos.x + self.size.w as i32
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.pos.y + self.size.h as i32
    }

    /// Whether this rectangle covers zero cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.size.is_empty()
    }

    /// Whether a point lies inside this rectangle.
    #[inline]
    #[must_use]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.pos.x && p.x < self.right() && p.y >= self.pos.y && p.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    ///
    /// An empty `other` is contained by anything (it covers no cells).
    #[must_use]
    pub fn contains_rect(self, other: Self) -> bool {
        other.is_empty()
            || (other.pos.x >= self.pos.x
                && other.right() <= self.right()
                && other.pos.y >= self.pos.y
                && other.bottom() <= self.bottom())
    }

    /// Intersection of two rectangles, or `None` if they don't overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x1 = self.pos.x.max(other.pos.x);
        let y1 = self.pos.y.max(other.pos.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            // Both differences are positive and bounded by the input
            // extents, which are u16.
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let size = Size::new((x2 - x1) as u16, (y2 - y1) as u16);
            Some(Self::from_parts(Vec2::new(x1, y1), size))
        } else {
            None
        }
    }
}

// ─── Alignment ───────────────────────────────────────────────────────────────

/// One-axis alignment of content within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Align {
    /// Pin to the low-coordinate edge (left or top).
    #[default]
    Lower,
    /// Center, with floor division on odd leftovers.
    Center,
    /// Pin to the high-coordinate edge (right or bottom).
    Upper,
}

/// Place a window over content: aligned, offset, then clamped.
///
/// Returns the window rectangle in *content* coordinates. When the
/// content is larger than the window the origin selects which slice
/// of the content is visible; when it is smaller the origin goes
/// negative, which reads as a margin of `-origin` cells before the
/// content starts.
///
/// Per axis, with `free = content - window`:
///
/// - `Lower` starts at 0, `Center` at `free / 2` (truncating, which
///   floors the visible margin), `Upper` at `free`.
/// - `offset` shifts the origin, then the result is clamped between
///   `min(0, free)` and `max(0, free)` so the window never drifts
///   past the content on either side.
///
/// ```
/// use glif_geom::{Align, Size, Vec2, align_clamped};
///
/// // 10-wide content centered in a 20-wide window: margin of 5.
/// let view = align_clamped(
///     Size::new(10, 4),
///     Size::new(20, 4),
///     Align::Center,
///     Align::Lower,
///     Vec2::ZERO,
/// );
/// assert_eq!(view.pos, Vec2::new(-5, 0));
/// ```
#[must_use]
pub fn align_clamped(
    content: Size,
    window: Size,
    align_x: Align,
    align_y: Align,
    offset: Vec2,
) -> Rect {
    let x = axis_origin(content.w, window.w, align_x, offset.x);
    let y = axis_origin(content.h, window.h, align_y, offset.y);
    Rect::from_parts(Vec2::new(x, y), window)
}

fn axis_origin(content: u16, window: u16, align: Align, offset: i32) -> i32 {
    let free = i32::from(content) - i32::from(window);
    let base = match align {
        Align::Lower => 0,
        Align::Center => free / 2,
        Align::Upper => free,
    };
    (base + offset).clamp(free.min(0), free.max(0))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
