//! Font state and glyph painting.

use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::style::{TextAlign, TextBaseline};
use crate::text::{
    buffer_metrics, calculate_text_x_offset, calculate_text_y_offset, shape_line, FontSpec,
    TextMetrics,
};
use cosmic_text::Command;
use tiny_skia::{FillRule, Path, PathBuilder, Transform};

impl Canvas2dContext {
    pub fn set_font(&mut self, font: FontSpec) {
        log::debug!(target: "canvas", "font {:?} {} {}px", font.families, font.weight, font.size_px);
        self.state.font = font;
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    /// Shape `text` with the current font without drawing it.
    pub fn measure_text(&mut self, text: &str) -> Canvas2dResult<TextMetrics> {
        crate::text::measure_text(&mut self.font_system, text, &self.state.font)
    }

    /// Paint `text` as filled glyph outlines anchored at `(x, y)` according to
    /// the current alignment and baseline.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        let font = self.state.font.clone();
        let buffer = shape_line(&mut self.font_system, text, &font)?;
        let metrics = buffer_metrics(&buffer, font.size_px);

        let origin_x = x + calculate_text_x_offset(metrics.width, self.state.text_align);
        let origin_y = y + calculate_text_y_offset(
            metrics.ascent,
            metrics.descent,
            self.state.text_baseline,
        );
        let transform = self.state.transform;

        self.with_fill_paint(|ctx, paint| {
            let glyphs = buffer.layout_runs().flat_map(|run| run.glyphs.iter());
            for glyph in glyphs {
                let cache_key = glyph.physical((origin_x, origin_y), 1.0).cache_key;
                let Some(outline) = ctx
                    .swash_cache
                    .get_outline_commands(&mut ctx.font_system, cache_key)
                    .and_then(outline_path)
                else {
                    continue;
                };
                let placement = Transform::from_translate(
                    origin_x + glyph.x + glyph.font_size * glyph.x_offset,
                    origin_y + glyph.y - glyph.font_size * glyph.y_offset,
                )
                .post_concat(transform);
                ctx.pixmap
                    .fill_path(&outline, paint, FillRule::Winding, placement, None);
            }
        });
        Ok(())
    }
}

/// Convert a glyph outline (y up) into a tiny-skia path (y down).
fn outline_path(commands: &[Command]) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for command in commands {
        match *command {
            Command::MoveTo(p) => pb.move_to(p.x, -p.y),
            Command::LineTo(p) => pb.line_to(p.x, -p.y),
            Command::QuadTo(c, p) => pb.quad_to(c.x, -c.y, p.x, -p.y),
            Command::CurveTo(c1, c2, p) => pb.cubic_to(c1.x, -c1.y, c2.x, -c2.y, p.x, -p.y),
            Command::Close => pb.close(),
        }
    }
    pb.finish()
}
