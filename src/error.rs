//! Error types for quotecard
//!
//! Fatal errors abort `generate` with no partial image. Body-text overflow is
//! deliberately not an error; the multi-run sizer degrades to a minimum size
//! instead (see `layout::fit_runs`).

use std::path::PathBuf;

/// Library error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Emoji asset directory missing or unreadable
    #[error("cannot read emoji directory {path:?}: {source}")]
    CatalogLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Font file could not be read or parsed
    #[error("failed to load font {path:?}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    /// Single-line text cannot be shrunk to fit its box
    #[error(
        "unable to fit text '{text}' within {box_width}x{box_height} using any font size up to {max_size}"
    )]
    NoFittingSize {
        text: String,
        max_size: u32,
        box_width: u32,
        box_height: u32,
    },

    /// Span range exceeds the source text bounds
    #[error("span at offset {offset} with length {length} exceeds text length {text_len}")]
    InvalidSpan {
        offset: usize,
        length: usize,
        text_len: usize,
    },

    /// Avatar bytes could not be decoded as an image
    #[error("failed to decode avatar image: {0}")]
    Avatar(#[source] image::ImageError),

    /// Background image bytes could not be decoded
    #[error("failed to decode background image: {0}")]
    Background(#[source] image::ImageError),

    /// PNG encoding of the final canvas failed
    #[error("failed to encode output PNG: {0}")]
    Encode(#[source] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, Error>;
