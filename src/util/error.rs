//! Error types for headtpl.

use thiserror::Error;

/// Result alias for headtpl operations.
pub type HeadTplResult<T> = std::result::Result<T, HeadTplError>;

/// Errors that can occur while building templates.
///
/// A shape the renderer cannot draw is not an error: builders report it as
/// `Ok(None)` and catalogs simply omit it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HeadTplError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer does not hold enough elements.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A coordinate lies outside a grid.
    #[error("coordinate ({x}, {y}) outside {width}x{height}")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Point sizes must be strictly positive.
    #[error("invalid point size {point_size}")]
    InvalidPointSize { point_size: u32 },
    /// A build parameter is outside its valid range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Image decoding or encoding failed.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
