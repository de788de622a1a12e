//! Line-box layout for a caption block.

use crate::corners::{Alignment, CornerResolver, LineBox};
use crate::lines::TextLine;
use crate::text::LineMeasurer;
use bubble_caption_canvas2d::FontSpec;
use serde::{Deserialize, Serialize};

/// Typography and box metrics. Lengths ending in `_em` are multiples of a
/// line's font size (`font_size * scale`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptionStyle {
    /// Base font size in pixels before per-line scaling.
    pub font_size: f32,
    pub font_families: Vec<String>,
    pub font_weight: u16,
    pub corner_radius_em: f32,
    pub padding_x_em: f32,
    pub padding_y_em: f32,
    pub line_height_em: f32,
    /// Height of a blank spacer line.
    pub spacer_height_em: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: 28.0,
            font_families: vec![
                "Montserrat SemiBold".to_string(),
                "Arial".to_string(),
                "sans-serif".to_string(),
            ],
            font_weight: 600,
            corner_radius_em: 0.2,
            padding_x_em: 0.8,
            padding_y_em: 0.4,
            line_height_em: 1.2,
            spacer_height_em: 1.0,
        }
    }
}

impl CaptionStyle {
    pub fn font_spec(&self, size_px: f32) -> FontSpec {
        FontSpec {
            families: self.font_families.clone(),
            weight: self.font_weight,
            size_px,
        }
    }

    pub fn line_font_size(&self, scale: f32) -> f32 {
        self.font_size * scale
    }
}

/// A resolved line box with its position inside the block.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub line: LineBox,
    /// Blank lines take up space but are not painted.
    pub spacer: bool,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The whole caption block in unscaled pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub alignment: Alignment,
    pub lines: Vec<LineLayout>,
    pub width: f32,
    pub height: f32,
}

/// Measure, resolve and stack `lines`.
pub fn layout_block(
    lines: &[TextLine],
    style: &CaptionStyle,
    alignment: Alignment,
    measurer: &mut dyn LineMeasurer,
) -> BlockLayout {
    let mut boxes = Vec::with_capacity(lines.len());
    let mut heights = Vec::with_capacity(lines.len());

    for line in lines {
        let font_size = style.line_font_size(line.scale);
        let padding_x = style.padding_x_em * font_size;
        let measured = measurer
            .text_width(&line.text, font_size)
            .map(|w| w + 2.0 * padding_x);
        if measured.is_none() {
            log::warn!("Could not measure line {:?}; keeping rounded corners", line.text);
        }

        let height = if line.is_blank() {
            style.spacer_height_em * font_size
        } else {
            (style.line_height_em + 2.0 * style.padding_y_em) * font_size
        };

        boxes.push(LineBox::new(
            line.text.clone(),
            line.scale,
            measured,
            style.corner_radius_em * font_size,
        ));
        heights.push((font_size, height, 2.0 * padding_x));
    }

    CornerResolver::new(alignment).resolve(&mut boxes);

    let widths: Vec<f32> = boxes
        .iter()
        .zip(heights.iter())
        .map(|(b, (_, _, min_width))| b.effective_width().unwrap_or(*min_width))
        .collect();
    let block_width = widths.iter().copied().fold(0.0_f32, f32::max);

    let mut y = 0.0;
    let mut laid_out = Vec::with_capacity(boxes.len());
    for ((line, (font_size, height, _)), width) in boxes.into_iter().zip(heights).zip(widths) {
        let x = match alignment {
            Alignment::Left => 0.0,
            Alignment::Center => (block_width - width) / 2.0,
            Alignment::Right => block_width - width,
        };
        let spacer = line.text.trim().is_empty();
        laid_out.push(LineLayout {
            line,
            spacer,
            font_size,
            x,
            y,
            width,
            height,
        });
        y += height;
    }

    BlockLayout {
        alignment,
        lines: laid_out,
        width: block_width,
        height: y,
    }
}
