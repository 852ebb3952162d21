// SPDX-License-Identifier: MIT
//
// Vec2 and Size — the two coordinate types of cell space.
//
// Vec2 is signed: draw positions, offsets, and viewport origins may
// all go negative (content scrolled or centered past an edge). Size
// is unsigned and u16 — terminal extents fit comfortably, and a
// 65k×65k cell canvas is already 4 billion glyphs.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// ─── Vec2 ────────────────────────────────────────────────────────────────────

/// A signed 2D point or offset in cell coordinates.
///
/// ```
/// use glif_geom::Vec2;
///
/// let a = Vec2::new(3, -1);
/// let b = Vec2::new(1, 2);
/// assert_eq!(a + b, Vec2::new(4, 1));
/// assert_eq!(a - b, Vec2::new(2, -3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Vec2 {
    /// Column (x axis, grows rightward).
    pub x: i32,
    /// Row (y axis, grows downward).
    pub y: i32,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a point from column and row.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Vec2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

// ─── Size ────────────────────────────────────────────────────────────────────

/// An unsigned 2D extent in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    /// Width in columns.
    pub w: u16,
    /// Height in rows.
    pub h: u16,
}

impl Size {
    /// The empty extent.
    pub const ZERO: Self = Self { w: 0, h: 0 };

    /// Create an extent from width and height.
    #[inline]
    #[must_use]
    pub const fn new(w: u16, h: u16) -> Self {
        Self { w, h }
    }

    /// Total number of cells (`w × h`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.w as u32 * self.h as u32
    }

    /// Whether either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
