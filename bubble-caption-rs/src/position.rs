//! Placement of the caption block on the background image.

use crate::error::CaptionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed distance from the top or bottom edge for `top` and `bottom`.
pub const EDGE_PADDING: f32 = 100.0;

/// Custom Y percentage used when none (or zero) is given.
pub const DEFAULT_CUSTOM_Y_PERCENT: f32 = 50.0;

/// Vertical placement of the caption block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    #[default]
    Center,
    Bottom,
    /// Centered on a percentage of the image height.
    Custom,
}

impl FromStr for Position {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Position::Top),
            "center" => Ok(Position::Center),
            "bottom" => Ok(Position::Bottom),
            "custom" => Ok(Position::Custom),
            _ => Err(CaptionError::InvalidOption(format!(
                "Unsupported position: {s}. Expected one of: top, center, bottom, custom"
            ))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Top => "top",
            Position::Center => "center",
            Position::Bottom => "bottom",
            Position::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// Convert a custom Y percentage into pixels.
///
/// Missing, zero and NaN percentages use the 50% default.
pub fn custom_y_pixels(percent: Option<f32>, canvas_height: f32) -> f32 {
    let percent = match percent {
        Some(p) if p != 0.0 && !p.is_nan() => p,
        _ => DEFAULT_CUSTOM_Y_PERCENT,
    };
    percent / 100.0 * canvas_height
}

/// Top edge of the caption block.
///
/// With no lines the block is placed at half the canvas height. A custom
/// position that lands exactly on 0 (or is NaN) falls back to centering.
pub fn text_y(
    position: Position,
    custom_y_px: f32,
    canvas_height: f32,
    text_height: f32,
    line_count: usize,
) -> f32 {
    if line_count == 0 {
        return canvas_height / 2.0;
    }

    let centered = (canvas_height - text_height) / 2.0;
    match position {
        Position::Top => EDGE_PADDING,
        Position::Bottom => canvas_height - EDGE_PADDING - text_height,
        Position::Custom => {
            let y = custom_y_px - text_height / 2.0;
            if y == 0.0 || y.is_nan() {
                centered
            } else {
                y
            }
        }
        Position::Center => centered,
    }
}

/// Left edge of the caption block; always horizontally centered.
pub fn text_x(canvas_width: f32, text_width: f32) -> f32 {
    (canvas_width - text_width) / 2.0
}
