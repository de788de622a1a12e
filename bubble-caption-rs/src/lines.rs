//! Parsing of raw caption text into scaled lines.
//!
//! Each physical line may end with a `|scale` suffix that multiplies the
//! base font size for that line, e.g. `"Big news|1.5"`.

use serde::{Deserialize, Serialize};

/// Separator between a line's text and its scale suffix.
pub const SCALE_SEPARATOR: char = '|';

/// One caption line and its font scale factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// Font scale factor, always finite and positive.
    pub scale: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, scale: f32) -> Self {
        Self {
            text: text.into(),
            scale: sanitize_scale(scale),
        }
    }

    /// Blank lines render as invisible spacers.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split raw caption text into ordered lines.
///
/// Only the first `|` on a line separates the scale. Anything after it must
/// parse as a number in full, so `"a|2|3"` keeps scale 1.0. Missing,
/// non-numeric, zero or negative scales become 1.0.
pub fn parse_lines(raw: &str) -> Vec<TextLine> {
    raw.split('\n')
        .map(|segment| match segment.split_once(SCALE_SEPARATOR) {
            Some((text, suffix)) => TextLine::new(text, parse_scale(suffix)),
            None => TextLine::new(segment, 1.0),
        })
        .collect()
}

/// Join lines back into raw text, appending `|scale` only when it is not 1.
pub fn serialize_lines(lines: &[TextLine]) -> String {
    lines
        .iter()
        .map(|line| {
            if line.scale == 1.0 {
                line.text.clone()
            } else {
                format!("{}{}{}", line.text, SCALE_SEPARATOR, line.scale)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_scale(suffix: &str) -> f32 {
    suffix.trim().parse::<f32>().map(sanitize_scale).unwrap_or(1.0)
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
