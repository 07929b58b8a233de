//! Word frequency analysis.
//!
//! [`FrequencyTable::build`] consumes a token stream once, folds case,
//! drops stop words and counts the rest. The ranking is computed as part of
//! the build, so the table is immutable and every query is a cheap slice.
//!
//! Words with equal counts rank in first-seen order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::word_lists::ENGLISH_STOP_WORDS;

/// A set of words excluded from counting.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    extra: HashSet<String>,
    builtin: bool,
}

impl StopWords {
    /// The built-in English stop-word list.
    pub fn english() -> Self {
        Self {
            extra: HashSet::new(),
            builtin: true,
        }
    }

    /// No stop words at all; every token is counted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Extend this set with additional words (case-folded).
    pub fn with_extra<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Whether `word` (already lowercase) is a stop word.
    pub fn contains(&self, word: &str) -> bool {
        (self.builtin && ENGLISH_STOP_WORDS.contains(word)) || self.extra.contains(word)
    }
}

/// A word and its raw occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    /// The case-folded word.
    pub word: String,
    /// Number of occurrences in the input.
    pub count: usize,
}

/// Immutable word counts for one input, ranked by descending count.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    ranked: Vec<WordCount>,
    total_word_count: usize,
}

impl FrequencyTable {
    /// Count `tokens` against the built-in English stop-word list.
    pub fn build<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with(tokens, &StopWords::english())
    }

    /// Count `tokens`, skipping anything in `stop_words`.
    #[tracing::instrument(skip_all)]
    pub fn build_with<I, S>(tokens: I, stop_words: &StopWords) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Insertion order of `ranked` is first-seen order; the stable sort
        // below keeps it for ties.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut ranked: Vec<WordCount> = Vec::new();
        let mut total_word_count = 0;

        for token in tokens {
            let word = token.as_ref().to_lowercase();
            if word.is_empty() || stop_words.contains(&word) {
                continue;
            }
            total_word_count += 1;
            match index.get(&word) {
                Some(&i) => ranked[i].count += 1,
                None => {
                    index.insert(word.clone(), ranked.len());
                    ranked.push(WordCount { word, count: 1 });
                }
            }
        }

        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        tracing::debug!(
            unique = ranked.len(),
            total = total_word_count,
            "frequency table built"
        );

        Self {
            ranked,
            total_word_count,
        }
    }

    /// Build a table from precomputed counts.
    ///
    /// Duplicate words are merged and zero counts dropped; the total is the
    /// sum of the remaining counts. No stop-word filtering is applied.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut ranked: Vec<WordCount> = Vec::new();
        for (word, count) in counts {
            if count == 0 {
                continue;
            }
            let word = word.as_ref().to_lowercase();
            match index.get(&word) {
                Some(&i) => ranked[i].count += count,
                None => {
                    index.insert(word.clone(), ranked.len());
                    ranked.push(WordCount { word, count });
                }
            }
        }
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        let total_word_count = ranked.iter().map(|w| w.count).sum();
        Self {
            ranked,
            total_word_count,
        }
    }

    /// At most `limit` words, highest count first.
    pub fn top_words(&self, limit: usize) -> &[WordCount] {
        &self.ranked[..limit.min(self.ranked.len())]
    }

    /// Sum of counts of every retained (non-stop) token.
    pub const fn total_word_count(&self) -> usize {
        self.total_word_count
    }

    /// Number of distinct words.
    pub fn unique_words(&self) -> usize {
        self.ranked.len()
    }

    /// Count for a single word, if present.
    pub fn count_of(&self, word: &str) -> Option<usize> {
        let word = word.to_lowercase();
        self.ranked.iter().find(|w| w.word == word).map(|w| w.count)
    }

    /// Whether no words were counted.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
