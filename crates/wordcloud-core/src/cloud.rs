//! End-to-end pipeline: text to ranked words to placements.
//!
//! [`WordCloud`] ties the stages together for callers that do not need to
//! drive each one by hand. Every stage stays available on its own in
//! [`frequency`](crate::frequency), [`selection`](crate::selection) and
//! [`placement`](crate::placement).

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::error::LayoutResult;
use crate::frequency::{FrequencyTable, StopWords};
use crate::metrics::GlyphMetrics;
use crate::occupancy::Mask;
use crate::placement::{PlacementEngine, PlacementOutcome};
use crate::selection::{Selection, select};
use crate::text::extract_words;

/// Pipeline settings shared by every render.
#[derive(Debug, Clone)]
pub struct WordCloud {
    layout: LayoutConfig,
    stop_words: StopWords,
}

impl Default for WordCloud {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl WordCloud {
    /// Pipeline with the built-in English stop words.
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            stop_words: StopWords::english(),
        }
    }

    /// Replace the stop-word set.
    #[must_use]
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// The layout settings in use.
    pub const fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Tokenize `text` and count its words.
    pub fn analyze(&self, text: &str) -> FrequencyTable {
        FrequencyTable::build_with(extract_words(text), &self.stop_words)
    }

    /// Count a pre-tokenized word stream.
    pub fn analyze_tokens<I, S>(&self, tokens: I) -> FrequencyTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FrequencyTable::build_with(tokens, &self.stop_words)
    }

    /// Pick and normalize the words to place.
    pub fn select(&self, table: &FrequencyTable) -> Selection {
        select(table, self.layout.selection())
    }

    /// Start a placement session on a blank canvas.
    pub fn session<M: GlyphMetrics>(&self, metrics: M) -> LayoutResult<PlacementEngine<M>> {
        PlacementEngine::new(&self.layout, metrics)
    }

    /// Run the whole pipeline over `text`.
    pub fn render<M: GlyphMetrics>(&self, text: &str, metrics: M) -> LayoutResult<CloudLayout> {
        self.render_table(&self.analyze(text), metrics, None)
    }

    /// Run selection and placement over an existing table, optionally
    /// restricted by `mask`.
    #[tracing::instrument(skip_all, fields(unique = table.unique_words()))]
    pub fn render_table<M: GlyphMetrics>(
        &self,
        table: &FrequencyTable,
        metrics: M,
        mask: Option<&Mask>,
    ) -> LayoutResult<CloudLayout> {
        let selection = self.select(table);
        let mut engine = self.session(metrics)?;
        if let Some(mask) = mask {
            engine = engine.with_mask(mask)?;
        }
        let outcomes = engine.place_all(&selection.words)?;
        Ok(CloudLayout::new(&self.layout, engine.seed(), selection, outcomes))
    }
}

/// Result of one full render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudLayout {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Seed the session ran with.
    pub seed: Option<u64>,
    /// Words chosen for placement.
    pub selection: Selection,
    /// One outcome per selected word, in selection order.
    pub outcomes: Vec<PlacementOutcome>,
}

impl CloudLayout {
    /// Assemble the result of a finished session on `config`'s canvas and
    /// log its summary.
    pub fn new(
        config: &LayoutConfig,
        seed: Option<u64>,
        selection: Selection,
        outcomes: Vec<PlacementOutcome>,
    ) -> Self {
        let layout = Self {
            width: config.canvas_width,
            height: config.canvas_height,
            seed,
            selection,
            outcomes,
        };
        tracing::info!(
            placed = layout.placed_count(),
            abandoned = layout.abandoned_count(),
            seed = layout.seed,
            "layout finished"
        );
        layout
    }

    /// Number of words that were placed.
    pub fn placed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.placement().is_some())
            .count()
    }

    /// Number of words that were abandoned.
    pub fn abandoned_count(&self) -> usize {
        self.outcomes.len() - self.placed_count()
    }
}
