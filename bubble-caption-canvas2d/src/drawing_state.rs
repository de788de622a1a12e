//! Fill, font and transform state applied by drawing calls.

use crate::style::{TextAlign, TextBaseline};
use crate::text::FontSpec;
use tiny_skia::{Color, Transform};

#[derive(Debug, Clone)]
pub struct DrawingState {
    /// Solid fill color for paths and text.
    pub fill_color: Color,
    pub font: FontSpec,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub transform: Transform,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            font: FontSpec::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            transform: Transform::identity(),
        }
    }
}
