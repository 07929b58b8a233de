//! Candidate selection and percentage-of-max normalization.

use serde::{Deserialize, Serialize};

use crate::frequency::{FrequencyTable, WordCount};

/// Parameters for [`select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOptions {
    /// Maximum number of candidate words taken from the ranking.
    pub limit: usize,
    /// Number of top candidates to drop as outliers.
    pub discard_top: usize,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            discard_top: 10,
        }
    }
}

/// A word ready for placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedWord {
    /// The case-folded word.
    pub word: String,
    /// Raw occurrence count.
    pub count: usize,
    /// Importance in `(0.0, 1.0]`; the top word is exactly `1.0`.
    pub percentage: f64,
}

/// Output of [`select`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Normalized words, highest percentage first.
    pub words: Vec<RankedWord>,
    /// Candidates removed by `discard_top`, highest count first.
    pub discarded: Vec<WordCount>,
    /// Total word count minus the counts of discarded words.
    pub adjusted_total: usize,
}

/// Pick the top `limit` words, drop the top `discard_top`, and normalize.
///
/// Discarding happens after truncation to `limit`, and only when more than
/// `discard_top` candidates exist. Percentages are `count / adjusted_total`
/// rescaled so the largest remaining one is `1.0`.
#[tracing::instrument(skip(table), fields(unique = table.unique_words()))]
pub fn select(table: &FrequencyTable, options: SelectionOptions) -> Selection {
    let mut candidates = table.top_words(options.limit);
    let mut adjusted_total = table.total_word_count();
    let mut discarded = Vec::new();

    if options.discard_top > 0 && candidates.len() > options.discard_top {
        let (dropped, rest) = candidates.split_at(options.discard_top);
        for w in dropped {
            tracing::debug!(word = %w.word, count = w.count, "discarding word");
        }
        adjusted_total -= dropped.iter().map(|w| w.count).sum::<usize>();
        discarded = dropped.to_vec();
        candidates = rest;
    }

    let words = normalize(candidates, adjusted_total);
    Selection {
        words,
        discarded,
        adjusted_total,
    }
}

fn normalize(candidates: &[WordCount], total: usize) -> Vec<RankedWord> {
    let Some(max_count) = candidates.iter().map(|w| w.count).max() else {
        return Vec::new();
    };
    if total == 0 || max_count == 0 {
        return Vec::new();
    }
    let total = total as f64;
    let scale = total / max_count as f64;

    candidates
        .iter()
        .map(|w| RankedWord {
            word: w.word.clone(),
            count: w.count,
            // (count / total) * (total / max_count), with the top word pinned
            // to exactly 1.0 regardless of float rounding.
            percentage: if w.count == max_count {
                1.0
            } else {
                (w.count as f64 / total) * scale
            },
        })
        .collect()
}
