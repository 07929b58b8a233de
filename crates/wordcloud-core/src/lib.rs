//! Core library for wordcloud.
//!
//! This crate turns plain text into a frequency-weighted word cloud layout:
//! ranked words, their font sizes, and non-overlapping positions on a canvas.
//! It does not draw anything; placements are handed to a renderer.
//!
//! # Modules
//!
//! - [`text`] - Word extraction from raw text
//! - [`frequency`] - Stop-word filtering and occurrence counting
//! - [`selection`] - Top-N selection, outlier discard, and normalization
//! - [`occupancy`] - Pixel occupancy grid with O(1) rectangle queries
//! - [`metrics`] - Glyph measurement capability
//! - [`placement`] - Randomized placement with font-size backoff
//! - [`cloud`] - The whole pipeline in one call
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use wordcloud_core::{FixedAdvanceMetrics, LayoutConfig, WordCloud};
//!
//! let cloud = WordCloud::new(LayoutConfig {
//!     seed: Some(7),
//!     ..LayoutConfig::default()
//! });
//! let layout = cloud
//!     .render("ferris the crab ferris", FixedAdvanceMetrics::default())
//!     .expect("valid layout config");
//!
//! for outcome in &layout.outcomes {
//!     println!("{outcome:?}");
//! }
//! ```
#![deny(unsafe_code)]

pub mod cloud;
pub mod config;
pub mod error;
pub mod frequency;
pub mod metrics;
pub mod occupancy;
pub mod placement;
pub mod selection;
pub mod text;
pub mod word_lists;

pub use cloud::{CloudLayout, WordCloud};
pub use config::{
    Config, ConfigLoader, ConfigSources, LayoutConfig, LogLevel, OversizePolicy, RotationPolicy,
};
pub use error::{ConfigError, ConfigResult, LayoutError, LayoutResult};
pub use frequency::{FrequencyTable, StopWords, WordCount};
pub use metrics::{FixedAdvanceMetrics, GlyphBox, GlyphMetrics};
pub use occupancy::{Mask, OccupancyIndex, Rect};
pub use placement::{
    AbandonReason, GlyphPlacement, Orientation, PlacementEngine, PlacementOutcome, font_size_for,
};
pub use selection::{RankedWord, Selection, SelectionOptions, select};

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
