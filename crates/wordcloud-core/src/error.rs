//! Error types for wordcloud-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal errors that abort a layout session.
///
/// Per-word placement failures are not errors; they surface as
/// [`PlacementOutcome::Abandoned`](crate::placement::PlacementOutcome::Abandoned).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Canvas width or height is zero.
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidCanvas {
        /// Requested canvas width.
        width: u32,
        /// Requested canvas height.
        height: u32,
    },

    /// The occupancy mask does not cover the canvas exactly.
    #[error("mask is {mask_width}x{mask_height} but canvas is {canvas_width}x{canvas_height}")]
    MaskMismatch {
        /// Mask width.
        mask_width: u32,
        /// Mask height.
        mask_height: u32,
        /// Canvas width.
        canvas_width: u32,
        /// Canvas height.
        canvas_height: u32,
    },

    /// The mask pixel buffer length disagrees with its declared dimensions.
    #[error("mask declares {width}x{height} but holds {len} pixels")]
    MaskLength {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Actual number of pixels supplied.
        len: usize,
    },

    /// A numeric layout parameter is out of range.
    #[error("invalid layout parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in configuration.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A word cannot fit on the canvas even at the minimum font size.
    #[error(
        "word '{word}' needs {width}x{height} at the minimum font size, canvas is {canvas_width}x{canvas_height}"
    )]
    WordTooLarge {
        /// The offending word.
        word: String,
        /// Padded box width at the minimum font size.
        width: u32,
        /// Padded box height at the minimum font size.
        height: u32,
        /// Canvas width.
        canvas_width: u32,
        /// Canvas height.
        canvas_height: u32,
    },
}

/// Result type alias using [`LayoutError`].
pub type LayoutResult<T> = Result<T, LayoutError>;
