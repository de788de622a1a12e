//! Fonts and text measurement for caption layout.

use crate::error::CaptionResult;
use crate::layout::CaptionStyle;
use bubble_caption_canvas2d::{Canvas2dContext, FontConfig, ResolvedFontConfig};

lazy_static! {
    /// System fonts with the default generic family preferences, scanned once.
    pub static ref DEFAULT_FONTS: ResolvedFontConfig = FontConfig::default().resolve();
}

/// Supplies laid-out text widths to the layout pass.
pub trait LineMeasurer {
    /// Advance width of `text` at `font_size_px`, or `None` if it cannot be measured.
    fn text_width(&mut self, text: &str, font_size_px: f32) -> Option<f32>;
}

/// Measures text by shaping it on a scratch canvas.
pub struct CanvasMeasurer {
    ctx: Canvas2dContext,
    style: CaptionStyle,
}

impl CanvasMeasurer {
    pub fn new(fonts: &ResolvedFontConfig, style: &CaptionStyle) -> CaptionResult<Self> {
        Ok(Self {
            ctx: Canvas2dContext::with_resolved(1, 1, fonts)?,
            style: style.clone(),
        })
    }
}

impl LineMeasurer for CanvasMeasurer {
    fn text_width(&mut self, text: &str, font_size_px: f32) -> Option<f32> {
        self.ctx.set_font(self.style.font_spec(font_size_px));
        match self.ctx.measure_text(text) {
            Ok(metrics) => Some(metrics.width),
            Err(err) => {
                log::warn!("Failed to measure {:?}: {}", text, err);
                None
            }
        }
    }
}
