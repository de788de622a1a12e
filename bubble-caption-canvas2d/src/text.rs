//! Text measurement using cosmic-text.

use crate::error::{Canvas2dError, Canvas2dResult};
use crate::style::{TextAlign, TextBaseline};
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};

/// Ratio between line height and font size used when shaping a single line.
pub(crate) const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Font selection for text measurement and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Font families in order of preference. Generic names
    /// (`sans-serif`, `serif`, `monospace`) map to the configured generics.
    pub families: Vec<String>,
    /// CSS numeric weight (100-900).
    pub weight: u16,
    /// Font size in pixels.
    pub size_px: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            families: vec!["sans-serif".to_string()],
            weight: 400,
            size_px: 10.0,
        }
    }
}

/// Text metrics returned by `measure_text`.
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    /// Advance width of the text in pixels.
    pub width: f32,
    /// Distance from baseline to the top of the line box.
    pub ascent: f32,
    /// Distance from baseline to the bottom of the line box.
    pub descent: f32,
}

/// Pick the first family in `families` the font system can serve.
///
/// Concrete names that are not installed are skipped; if nothing matches,
/// the generic sans-serif family is used.
pub(crate) fn resolve_family<'a>(font_system: &FontSystem, families: &'a [String]) -> Family<'a> {
    for name in families {
        match name.as_str() {
            "sans-serif" => return Family::SansSerif,
            "serif" => return Family::Serif,
            "monospace" => return Family::Monospace,
            concrete => {
                let installed = font_system
                    .db()
                    .faces()
                    .any(|face| face.families.iter().any(|(fam, _)| fam == concrete));
                if installed {
                    return Family::Name(concrete);
                }
            }
        }
    }
    Family::SansSerif
}

/// Shape `text` into a single-line buffer.
pub(crate) fn shape_line(
    font_system: &mut FontSystem,
    text: &str,
    font: &FontSpec,
) -> Canvas2dResult<Buffer> {
    if !font.size_px.is_finite() || font.size_px <= 0.0 {
        return Err(Canvas2dError::TextError(format!(
            "Invalid font size: {}",
            font.size_px
        )));
    }

    let metrics = Metrics::new(font.size_px, font.size_px * LINE_HEIGHT_RATIO);
    if font_system.db().faces().next().is_none() {
        log::warn!("No fonts loaded; {:?} is not shaped", text);
        return Ok(Buffer::new_empty(metrics));
    }
    let mut buffer = Buffer::new(font_system, metrics);

    let family = resolve_family(font_system, &font.families);
    let attrs = Attrs::new().family(family).weight(Weight(font.weight));

    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);
    Ok(buffer)
}

/// Measure text using cosmic-text.
pub fn measure_text(
    font_system: &mut FontSystem,
    text: &str,
    font: &FontSpec,
) -> Canvas2dResult<TextMetrics> {
    let buffer = shape_line(font_system, text, font)?;
    Ok(buffer_metrics(&buffer, font.size_px))
}

/// Width and vertical extents of an already shaped buffer.
pub(crate) fn buffer_metrics(buffer: &Buffer, size_px: f32) -> TextMetrics {
    let mut metrics = TextMetrics::default();
    for run in buffer.layout_runs() {
        metrics.width = metrics.width.max(run.line_w);
        metrics.ascent = metrics.ascent.max(run.line_y - run.line_top);
        metrics.descent = metrics
            .descent
            .max((run.line_top + run.line_height) - run.line_y);
    }
    if metrics.ascent == 0.0 && metrics.descent == 0.0 {
        metrics.ascent = size_px * 0.8;
        metrics.descent = size_px * 0.2;
    }
    metrics
}

/// Calculate X offset for text alignment.
pub fn calculate_text_x_offset(width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Right => -width,
        TextAlign::Center => -width / 2.0,
    }
}

/// Calculate Y offset from the anchor to the alphabetic baseline.
pub fn calculate_text_y_offset(ascent: f32, descent: f32, baseline: TextBaseline) -> f32 {
    match baseline {
        TextBaseline::Top => ascent,
        TextBaseline::Middle => (ascent - descent) / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Bottom => -descent,
    }
}
