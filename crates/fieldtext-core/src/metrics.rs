#![forbid(unsafe_code)]

//! Glyph-metrics interface.
//!
//! The layout engine measures text exclusively through [`FontMetrics`].
//! Width is treated as an opaque, possibly non-additive function of whole
//! strings: kerning and tracking mean the width of `"ab"` is not necessarily
//! `width("a") + width("b")`. Callers must therefore always measure the
//! candidate substring as one string, which is exactly what the engine does.
//!
//! [`FixedMetrics`] is a deterministic implementation for tests and headless
//! use. Its optional tracking term makes it deliberately non-additive so the
//! whole-string measurement contract is exercised, not just assumed.

use unicode_width::UnicodeWidthChar;

/// Horizontal placement of one rendered character within a string.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    /// Left edge of the glyph, in pixels from the start of the string.
    pub x: f32,
    /// Advance width of the glyph in pixels.
    pub width: f32,
}

impl Glyph {
    /// Create a new glyph placement.
    #[inline]
    pub const fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    /// Right edge of the glyph.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Font measurement service consumed by the layout engine.
///
/// Implementations wrap whatever the renderer actually draws with, so that
/// layout and painting agree on every width to the pixel.
pub trait FontMetrics {
    /// Line height in pixels.
    fn line_height(&self) -> f32;

    /// Rendered pixel width of `text`, measured as a whole string.
    fn measure(&self, text: &str) -> f32;

    /// Per-character glyph placements for `text`, in character order.
    fn glyphs(&self, text: &str) -> Vec<Glyph>;
}

impl<T: FontMetrics + ?Sized> FontMetrics for &T {
    fn line_height(&self) -> f32 {
        (**self).line_height()
    }

    fn measure(&self, text: &str) -> f32 {
        (**self).measure(text)
    }

    fn glyphs(&self, text: &str) -> Vec<Glyph> {
        (**self).glyphs(text)
    }
}

/// Deterministic metrics with a fixed per-cell advance.
///
/// Narrow characters take one advance, East Asian wide characters two
/// (via their Unicode width), control characters zero. A non-zero
/// `tracking` adds a fixed gap between adjacent glyphs, which makes
/// whole-string width differ from the sum of per-character widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    advance: f32,
    line_height: f32,
    tracking: f32,
}

impl FixedMetrics {
    /// Create fixed metrics with the given advance and line height.
    #[must_use]
    pub const fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            tracking: 0.0,
        }
    }

    /// Set the inter-glyph tracking gap.
    #[must_use]
    pub const fn with_tracking(mut self, tracking: f32) -> Self {
        self.tracking = tracking;
        self
    }

    /// Advance width of a single character.
    fn char_advance(&self, ch: char) -> f32 {
        match ch.width() {
            Some(cells) => cells as f32 * self.advance,
            None => 0.0,
        }
    }
}

impl FontMetrics for FixedMetrics {
    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn measure(&self, text: &str) -> f32 {
        self.glyphs(text)
            .last()
            .map(Glyph::right)
            .unwrap_or_default()
    }

    fn glyphs(&self, text: &str) -> Vec<Glyph> {
        let mut out = Vec::new();
        let mut x = 0.0;
        for (i, ch) in text.chars().enumerate() {
            if i > 0 {
                x += self.tracking;
            }
            let width = self.char_advance(ch);
            out.push(Glyph::new(x, width));
            x += width;
        }
        out
    }
}
