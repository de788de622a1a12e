//! Error types for bubble-caption-rs.

use bubble_caption_canvas2d::Canvas2dError;
use thiserror::Error;

/// Result type alias using CaptionError.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Errors raised while building, rendering or compositing a caption.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Text is required")]
    MissingText,

    #[error("Background image path is required")]
    MissingBackground,

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Every background candidate failed to load or decode.
    #[error(
        "Failed to load background image from any of these paths:\n{}",
        .attempted.join("\n")
    )]
    BackgroundLoad { attempted: Vec<String> },

    /// The caption block has no area, so there is nothing to rasterize.
    #[error("Text container has zero dimensions ({width}x{height}). Check text content and styling.")]
    ZeroDimensions { width: f32, height: f32 },

    /// The caption block at the requested scale exceeds the canvas limit.
    #[error("Caption canvas would be {width}x{height} pixels, larger than the {max}px limit. Reduce scale or fontSize.")]
    TooLarge { width: f32, height: f32, max: u32 },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error(transparent)]
    Canvas(#[from] Canvas2dError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
