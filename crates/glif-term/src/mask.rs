// SPDX-License-Identifier: MIT
//
// GlyphMask — bulk selection and mutation over glyph attributes.
//
// A mask is a template glyph plus a bitfield saying which of its
// attributes participate. The same mask type serves two roles:
// `check` asks whether a glyph matches the selected attributes,
// `apply` stamps the selected attributes onto a glyph. Image::filter
// pairs one of each for a single-pass recolor/restyle over a canvas.

use crate::glyph::Glyph;

// ─── Selection bits ──────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Which attributes of the template participate, plus two
    /// combination modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct MaskBits: u8 {
        /// Compare / copy the codepoint.
        const UNICODE  = 1 << 0;
        /// Compare / copy the foreground palette index.
        const FG       = 1 << 1;
        /// Compare / copy the background palette index.
        const BG       = 1 << 2;
        /// Compare / copy the mode bitfield.
        const MODE     = 1 << 3;
        /// Combine attribute checks with OR instead of AND.
        const ANY      = 1 << 4;
        /// Mode check passes on any shared flag instead of equality.
        const MODE_ANY = 1 << 5;
    }
}

// ─── GlyphMask ───────────────────────────────────────────────────────────────

/// A template glyph with a selection of participating attributes.
///
/// ```
/// use glif_term::glyph::Glyph;
/// use glif_term::mask::{GlyphMask, MaskBits};
///
/// let red_text = GlyphMask::new(Glyph::DEFAULT.with_fg(196), MaskBits::FG);
/// assert!(red_text.check(&Glyph::new('x').with_fg(196)));
/// assert!(!red_text.check(&Glyph::new('x')));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMask {
    /// The attribute values compared against or copied from.
    pub template: Glyph,
    /// Which attributes participate, and how they combine.
    pub bits: MaskBits,
}

impl GlyphMask {
    /// Create a mask from a template and its selection bits.
    #[inline]
    #[must_use]
    pub const fn new(template: Glyph, bits: MaskBits) -> Self {
        Self { template, bits }
    }

    /// Whether `glyph` matches the selected attributes.
    ///
    /// Default combination is AND, so a mask selecting no attributes
    /// matches everything (AND over the empty set). With [`MaskBits::ANY`]
    /// the combination is OR and the empty selection matches nothing.
    /// The mode check is exact equality unless [`MaskBits::MODE_ANY`] is
    /// set, in which case any flag in common passes.
    #[must_use]
    pub fn check(&self, glyph: &Glyph) -> bool {
        let any = self.bits.contains(MaskBits::ANY);
        let mut verdict = !any;
        let mut fold = |hit: bool| {
            if any {
                verdict |= hit;
            } else {
                verdict &= hit;
            }
        };

        if self.bits.contains(MaskBits::UNICODE) {
            fold(glyph.unicode == self.template.unicode);
        }
        if self.bits.contains(MaskBits::FG) {
            fold(glyph.fg == self.template.fg);
        }
        if self.bits.contains(MaskBits::BG) {
            fold(glyph.bg == self.template.bg);
        }
        if self.bits.contains(MaskBits::MODE) {
            fold(if self.bits.contains(MaskBits::MODE_ANY) {
                glyph.mode.intersects(self.template.mode)
            } else {
                glyph.mode == self.template.mode
            });
        }

        verdict
    }

    /// Copy every selected attribute from the template onto `glyph`.
    pub fn apply(&self, glyph: &mut Glyph) {
        if self.bits.contains(MaskBits::UNICODE) {
            glyph.unicode = self.template.unicode;
        }
        if self.bits.contains(MaskBits::FG) {
            glyph.fg = self.template.fg;
        }
        if self.bits.contains(MaskBits::BG) {
            glyph.bg = self.template.bg;
        }
        if self.bits.contains(MaskBits::MODE) {
            glyph.mode = self.template.mode;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::Mode;

    fn subject() -> Glyph {
        Glyph::styled('x', 10, 20, Mode::ITALIC)
    }

    // ── check — AND semantics ───────────────────────────────────────────

    #[test]
    fn and_all_attributes_match() {
        let mask = GlyphMask::new(
            subject(),
            MaskBits::UNICODE | MaskBits::FG | MaskBits::BG | MaskBits::MODE,
        );
        assert!(mask.check(&subject()));
    }

    #[test]
    fn and_one_mismatch_fails() {
        let mask = GlyphMask::new(
            subject(),
            MaskBits::UNICODE | MaskBits::FG | MaskBits::BG | MaskBits::MODE,
        );
        assert!(!mask.check(&subject().with_bg(99)));
    }

    #[test]
    fn and_ignores_unselected_attributes() {
        let mask = GlyphMask::new(subject(), MaskBits::FG);
        // Different codepoint, bg, mode — only fg is selected.
        let other = Glyph::styled('y', 10, 0, Mode::empty());
        assert!(mask.check(&other));
    }

    #[test]
    fn and_of_empty_selection_matches_everything() {
        let mask = GlyphMask::new(subject(), MaskBits::empty());
        assert!(mask.check(&Glyph::DEFAULT));
        assert!(mask.check(&subject()));
    }

    // ── check — OR semantics ────────────────────────────────────────────

    #[test]
    fn or_any_single_hit_passes() {
        let mask = GlyphMask::new(
            subject(),
            MaskBits::UNICODE | MaskBits::FG | MaskBits::ANY,
        );
        // Codepoint differs, fg matches.
        assert!(mask.check(&Glyph::styled('z', 10, 0, Mode::empty())));
        let wrong_fg_right_char = Glyph::styled('x', 0, 0, Mode::empty());
        assert!(mask.check(&wrong_fg_right_char));
    }

    #[test]
    fn or_all_misses_fail() {
        let mask = GlyphMask::new(
            subject(),
            MaskBits::UNICODE | MaskBits::FG | MaskBits::ANY,
        );
        let other = Glyph::styled('z', 1, 20, Mode::ITALIC);
        assert!(!mask.check(&other));
    }

    #[test]
    fn or_of_empty_selection_matches_nothing() {
        let mask = GlyphMask::new(subject(), MaskBits::ANY);
        assert!(!mask.check(&Glyph::DEFAULT));
        assert!(!mask.check(&subject()));
    }

    // ── check — mode matching ───────────────────────────────────────────

    #[test]
    fn mode_exact_equality_by_default() {
        let mask = GlyphMask::new(
            Glyph::DEFAULT.with_mode(Mode::ITALIC),
            MaskBits::MODE,
        );
        assert!(mask.check(&Glyph::new('q').with_mode(Mode::ITALIC)));
        // Superset is not equal.
        assert!(!mask.check(&Glyph::new('q').with_mode(Mode::ITALIC | Mode::DIM)));
    }

    #[test]
    fn mode_any_passes_on_shared_flag() {
        let mask = GlyphMask::new(
            Glyph::DEFAULT.with_mode(Mode::ITALIC | Mode::INTENSE),
            MaskBits::MODE | MaskBits::MODE_ANY,
        );
        assert!(mask.check(&Glyph::new('q').with_mode(Mode::ITALIC | Mode::HIDDEN)));
        assert!(!mask.check(&Glyph::new('q').with_mode(Mode::HIDDEN)));
    }

    #[test]
    fn mode_any_empty_template_never_intersects() {
        let mask = GlyphMask::new(Glyph::DEFAULT, MaskBits::MODE | MaskBits::MODE_ANY);
        assert!(!mask.check(&Glyph::new('q').with_mode(Mode::ITALIC)));
    }

    // ── apply ───────────────────────────────────────────────────────────

    #[test]
    fn apply_copies_only_selected_attributes() {
        let mask = GlyphMask::new(
            Glyph::styled('#', 196, 21, Mode::REVERSED),
            MaskBits::FG | MaskBits::MODE,
        );
        let mut g = subject();
        mask.apply(&mut g);
        assert_eq!(g.unicode, u32::from('x')); // untouched
        assert_eq!(g.fg, 196);
        assert_eq!(g.bg, 20); // untouched
        assert_eq!(g.mode, Mode::REVERSED);
    }

    #[test]
    fn apply_with_empty_selection_is_noop() {
        let mask = GlyphMask::new(Glyph::styled('#', 1, 2, Mode::DIM), MaskBits::empty());
        let mut g = subject();
        mask.apply(&mut g);
        assert_eq!(g, subject());
    }

    #[test]
    fn apply_all_attributes_stamps_template() {
        let template = Glyph::styled('@', 5, 6, Mode::STRIKED);
        let mask = GlyphMask::new(
            template,
            MaskBits::UNICODE | MaskBits::FG | MaskBits::BG | MaskBits::MODE,
        );
        let mut g = subject();
        mask.apply(&mut g);
        assert_eq!(g, template);
    }
}
