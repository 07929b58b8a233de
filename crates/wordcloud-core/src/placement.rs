//! Randomized greedy word placement.
//!
//! One [`PlacementEngine`] is one render session: it owns the canvas
//! [`OccupancyIndex`] and the random source, and places words strictly in
//! order. For each word it picks a font size from the word's percentage,
//! measures the padded glyph box, and throws random top-left corners at the
//! index until a free spot turns up. After `max_attempts_before_shrink`
//! misses the font shrinks by `shrink_factor` and the search restarts; a
//! word that still misses at `min_font_size` is abandoned.
//!
//! Nothing guarantees that every word fits or that the layout is tight.
//! The search is bounded, and abandoning a word is a normal outcome.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, OversizePolicy, RotationPolicy};
use crate::error::{LayoutError, LayoutResult};
use crate::metrics::GlyphMetrics;
use crate::occupancy::{Mask, OccupancyIndex, Rect};
use crate::selection::RankedWord;

/// Text direction of a placed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Left-to-right on the baseline.
    Horizontal,
    /// Rotated 90° counter-clockwise; the box's width and height are swapped.
    Rotated,
}

/// A committed placement. The box includes padding on every side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphPlacement {
    /// The placed word.
    pub word: String,
    /// Font size the word was placed at.
    pub font_size: f32,
    /// Left edge of the padded box.
    pub x: u32,
    /// Top edge of the padded box.
    pub y: u32,
    /// Padded box width.
    pub width: u32,
    /// Padded box height.
    pub height: u32,
    /// Text direction.
    pub orientation: Orientation,
    /// Distance from the top of the unpadded, unrotated text box to the baseline.
    pub baseline: f32,
}

impl GlyphPlacement {
    /// The padded box as a rectangle.
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Why a word was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonReason {
    /// The attempt budget ran out at the minimum font size.
    Exhausted,
    /// The word does not fit the canvas even at the minimum font size.
    TooLarge,
}

impl AbandonReason {
    /// Short human-readable description.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "no free space at minimum size",
            Self::TooLarge => "larger than the canvas at minimum size",
        }
    }
}

/// Result of placing one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// The word was placed.
    Placed(GlyphPlacement),
    /// The word was given up on.
    Abandoned {
        /// The abandoned word.
        word: String,
        /// Why it was abandoned.
        reason: AbandonReason,
    },
}

impl PlacementOutcome {
    /// The word this outcome is about.
    pub fn word(&self) -> &str {
        match self {
            Self::Placed(p) => &p.word,
            Self::Abandoned { word, .. } => word,
        }
    }

    /// The placement, if the word was placed.
    pub const fn placement(&self) -> Option<&GlyphPlacement> {
        match self {
            Self::Placed(p) => Some(p),
            Self::Abandoned { .. } => None,
        }
    }
}

/// Initial font size for a word with the given percentage-of-max.
///
/// `log10(1.7 + 10 · p^2.5) · max_font_size`, never below `min_font_size`.
/// The curve keeps rare words legible; the top word lands slightly above
/// `max_font_size` (≈1.07×).
pub fn font_size_for(percentage: f64, max_font_size: f32, min_font_size: f32) -> f32 {
    let scale = (1.7 + 10.0 * percentage.max(0.0).powf(2.5)).log10();
    let size = (scale * f64::from(max_font_size)) as f32;
    size.max(min_font_size)
}

/// Measured, padded box for a word at one font size.
#[derive(Debug, Clone, Copy)]
struct Measured {
    font_size: f32,
    width: u32,
    height: u32,
    baseline: f32,
}

/// Places ranked words on one canvas.
#[derive(Debug)]
pub struct PlacementEngine<M, R = StdRng> {
    config: LayoutConfig,
    metrics: M,
    rng: R,
    index: OccupancyIndex,
    seed: Option<u64>,
}

impl<M: GlyphMetrics> PlacementEngine<M, StdRng> {
    /// Create an engine seeded from `config.seed`, or from OS entropy when
    /// no seed is configured. The seed actually used is logged and available
    /// via [`seed`](Self::seed).
    pub fn new(config: &LayoutConfig, metrics: M) -> LayoutResult<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, "layout session seeded");
        let mut engine = Self::with_rng(config, metrics, StdRng::seed_from_u64(seed))?;
        engine.seed = Some(seed);
        Ok(engine)
    }
}

impl<M: GlyphMetrics, R: Rng> PlacementEngine<M, R> {
    /// Create an engine drawing from a caller-supplied random source.
    pub fn with_rng(config: &LayoutConfig, metrics: M, rng: R) -> LayoutResult<Self> {
        config.validate()?;
        let index = OccupancyIndex::new(config.canvas_width, config.canvas_height)?;
        Ok(Self {
            config: config.clone(),
            metrics,
            rng,
            index,
            seed: None,
        })
    }

    /// Seed the canvas occupancy from `mask`, replacing the current grid.
    pub fn with_mask(mut self, mask: &Mask) -> LayoutResult<Self> {
        if mask.width() != self.config.canvas_width || mask.height() != self.config.canvas_height
        {
            return Err(LayoutError::MaskMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                canvas_width: self.config.canvas_width,
                canvas_height: self.config.canvas_height,
            });
        }
        self.index = OccupancyIndex::from_mask(mask)?;
        Ok(self)
    }

    /// The seed used by [`new`](PlacementEngine::new), if any.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Current canvas occupancy.
    pub const fn index(&self) -> &OccupancyIndex {
        &self.index
    }

    /// Lazily place `words` in order.
    ///
    /// Each call to `next` places exactly one word. Dropping the iterator
    /// cancels the rest; occupancy reflects only the words already yielded.
    pub fn layout<'a>(&'a mut self, words: &'a [RankedWord]) -> Layout<'a, M, R> {
        Layout {
            engine: self,
            words: words.iter(),
            total: words.len(),
            done: 0,
        }
    }

    /// Place every word, stopping at the first fatal error.
    pub fn place_all(&mut self, words: &[RankedWord]) -> LayoutResult<Vec<PlacementOutcome>> {
        self.layout(words).collect()
    }

    /// Place a single word.
    #[tracing::instrument(skip_all, fields(word = %word.word))]
    pub fn place(&mut self, word: &RankedWord) -> LayoutResult<PlacementOutcome> {
        let orientation = self.choose_orientation();
        let min_font_size = self.config.min_font_size;

        let smallest = self.measure(&word.word, min_font_size, orientation);
        if !self.fits_canvas(&smallest) {
            return self.too_large(&word.word, &smallest);
        }

        let start = font_size_for(
            word.percentage,
            self.config.max_font_size,
            self.config.min_font_size,
        );
        let mut current = self.measure(&word.word, start, orientation);
        let mut failures: u64 = 0;

        loop {
            if !self.fits_canvas(&current) {
                // The minimum size fits, so shrinking always terminates.
                current = self.shrink(&word.word, &current, orientation);
                continue;
            }

            let x = self
                .rng
                .gen_range(0..=self.config.canvas_width - current.width);
            let y = self
                .rng
                .gen_range(0..=self.config.canvas_height - current.height);

            if self
                .index
                .query(x, y, x + current.width, y + current.height)
                == 0
            {
                self.index.mark(x, y, current.width, current.height);
                tracing::debug!(
                    x,
                    y,
                    width = current.width,
                    height = current.height,
                    font_size = current.font_size,
                    "word placed"
                );
                return Ok(PlacementOutcome::Placed(GlyphPlacement {
                    word: word.word.clone(),
                    font_size: current.font_size,
                    x,
                    y,
                    width: current.width,
                    height: current.height,
                    orientation,
                    baseline: current.baseline,
                }));
            }

            failures += 1;
            if failures % self.config.attempts_per_check == 0
                && failures >= self.config.max_attempts_before_shrink
            {
                if current.font_size <= min_font_size {
                    tracing::warn!(word = %word.word, "giving up on word");
                    return Ok(PlacementOutcome::Abandoned {
                        word: word.word.clone(),
                        reason: AbandonReason::Exhausted,
                    });
                }
                current = self.shrink(&word.word, &current, orientation);
                failures = 0;
            }
        }
    }

    fn choose_orientation(&mut self) -> Orientation {
        match self.config.rotation {
            RotationPolicy::Never => Orientation::Horizontal,
            RotationPolicy::Always => Orientation::Rotated,
            RotationPolicy::Random => {
                if self.rng.gen_bool(0.5) {
                    Orientation::Rotated
                } else {
                    Orientation::Horizontal
                }
            }
        }
    }

    fn measure(&self, word: &str, font_size: f32, orientation: Orientation) -> Measured {
        let glyph = self.metrics.measure(word, font_size);
        // Saturate so an oversized box fails `fits_canvas` instead of wrapping.
        let width = padded(pixels(glyph.width), self.config.padding_x);
        let height = padded(pixels(glyph.height), self.config.padding_y);
        let (width, height) = match orientation {
            Orientation::Horizontal => (width, height),
            Orientation::Rotated => (height, width),
        };
        Measured {
            font_size,
            width,
            height,
            baseline: glyph.baseline,
        }
    }

    fn shrink(&self, word: &str, current: &Measured, orientation: Orientation) -> Measured {
        let font_size =
            (current.font_size * self.config.shrink_factor).max(self.config.min_font_size);
        tracing::debug!(word, from = current.font_size, to = font_size, "shrinking font");
        self.measure(word, font_size, orientation)
    }

    const fn fits_canvas(&self, sized: &Measured) -> bool {
        sized.width <= self.config.canvas_width && sized.height <= self.config.canvas_height
    }

    fn too_large(&self, word: &str, smallest: &Measured) -> LayoutResult<PlacementOutcome> {
        match self.config.oversize {
            OversizePolicy::Fail => Err(LayoutError::WordTooLarge {
                word: word.to_string(),
                width: smallest.width,
                height: smallest.height,
                canvas_width: self.config.canvas_width,
                canvas_height: self.config.canvas_height,
            }),
            OversizePolicy::Abandon => {
                tracing::warn!(
                    word,
                    width = smallest.width,
                    height = smallest.height,
                    "word cannot fit the canvas"
                );
                Ok(PlacementOutcome::Abandoned {
                    word: word.to_string(),
                    reason: AbandonReason::TooLarge,
                })
            }
        }
    }
}

/// Round a measured extent up to whole pixels. Negative or NaN is zero.
fn pixels(extent: f32) -> u32 {
    extent.max(0.0).ceil() as u32
}

/// `extent` plus `padding` on both sides, saturating at `u32::MAX`.
const fn padded(extent: u32, padding: u32) -> u32 {
    extent.saturating_add(padding.saturating_mul(2))
}

/// Iterator returned by [`PlacementEngine::layout`].
#[derive(Debug)]
pub struct Layout<'a, M, R> {
    engine: &'a mut PlacementEngine<M, R>,
    words: std::slice::Iter<'a, RankedWord>,
    total: usize,
    done: usize,
}

impl<M: GlyphMetrics, R: Rng> Iterator for Layout<'_, M, R> {
    type Item = LayoutResult<PlacementOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        let word = self.words.next()?;
        self.done += 1;
        tracing::debug!("placing word {} of {}", self.done, self.total);
        Some(self.engine.place(word))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}

impl<M: GlyphMetrics, R: Rng> ExactSizeIterator for Layout<'_, M, R> {}
