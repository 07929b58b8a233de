//! Glyph measurement.
//!
//! The placement engine never rasterizes text. It asks a [`GlyphMetrics`]
//! implementation how large a word is at a given font size and packs the
//! resulting boxes. Renderers plug in real font metrics; the built-in
//! [`FixedAdvanceMetrics`] is a deterministic approximation.

use serde::{Deserialize, Serialize};

/// Unpadded size of a rendered word, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphBox {
    /// Advance width of the whole word.
    pub width: f32,
    /// Line height (ascent plus descent).
    pub height: f32,
    /// Distance from the top of the box to the baseline.
    pub baseline: f32,
}

/// Measures words at a font size.
pub trait GlyphMetrics {
    /// Bounding box of `word` rendered at `font_size`.
    fn measure(&self, word: &str, font_size: f32) -> GlyphBox;
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn measure(&self, word: &str, font_size: f32) -> GlyphBox {
        (**self).measure(word, font_size)
    }
}

/// Every character advances by the same fraction of the font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedAdvanceMetrics {
    /// Horizontal advance per character, as a multiple of the font size.
    pub advance: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Ascent (top to baseline) as a multiple of the font size.
    pub ascent: f32,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
            ascent: 0.95,
        }
    }
}

impl GlyphMetrics for FixedAdvanceMetrics {
    fn measure(&self, word: &str, font_size: f32) -> GlyphBox {
        let chars = word.chars().count() as f32;
        GlyphBox {
            width: chars * self.advance * font_size,
            height: self.line_height * font_size,
            baseline: self.ascent * font_size,
        }
    }
}
