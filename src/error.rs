// SPDX-License-Identifier: MPL-2.0

//! Error type shared by the whole filtering pipeline.

use crate::session::MaskMode;

/// Errors that can occur while loading, filtering or saving an image.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Decoding or encoding an image file failed.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Reading a file from disk failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`crate::FilterConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A flat buffer could not be reshaped into a 2D array.
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// The image has zero rows or zero columns.
    #[error("image has no pixels")]
    EmptyImage,

    /// A mask was applied to data of another shape.
    #[error("mask shape {found:?} does not match spectrum shape {expected:?}")]
    ShapeMismatch {
        /// Shape `(rows, cols)` of the spectrum.
        expected: (usize, usize),
        /// Shape `(rows, cols)` of the mask.
        found: (usize, usize),
    },

    /// Mask size fractions live in `[0, 1]`.
    #[error("mask size fraction {0} is outside [0, 1]")]
    SizeOutOfRange(f64),

    /// Brush radius outside of the configured range.
    #[error("brush radius {radius} is outside [{min}, {max}]")]
    BrushOutOfRange {
        /// Requested radius.
        radius: u32,
        /// Smallest accepted radius.
        min: u32,
        /// Largest accepted radius.
        max: u32,
    },

    /// Painting and clearing are only possible on a custom mask.
    #[error("operation requires the custom mask mode, current mode is {0}")]
    NotInCustomMode(MaskMode),

    /// The operation needs a loaded image.
    #[error("no image loaded")]
    NoImageLoaded,

    /// Saving needs a reconstructed image.
    #[error("no filtered image has been reconstructed yet")]
    NoReconstruction,

    /// A mask name that is not one of the known selections.
    #[error("unknown mask selection `{0}`")]
    UnknownSelection(String),

    /// A display point that is not of the form `x,y`.
    #[error("invalid display point `{0}`, expected `x,y`")]
    InvalidPoint(String),
}

/// Result alias used across the crate.
pub type Result<T, E = FilterError> = std::result::Result<T, E>;
