//! Filling paths with the current fill color.

use super::Canvas2dContext;
use crate::geometry::RectParams;
use tiny_skia::{FillRule, Paint, Transform};

impl Canvas2dContext {
    /// Fill the current path with the non-zero winding rule. The path is
    /// kept, so it can be filled again.
    pub fn fill(&mut self) {
        log::debug!(target: "canvas", "fill");
        let Some(path) = self.path_builder.clone().finish() else {
            return;
        };
        // Points were mapped to device space when they were added.
        self.with_fill_paint(|ctx, paint| {
            ctx.pixmap
                .fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
        });
    }

    /// Replace the current path with `params` and fill it.
    pub fn fill_rect(&mut self, params: &RectParams) {
        self.begin_path();
        self.rect(params);
        self.fill();
    }

    /// Run `draw` with an anti-aliased paint of the fill color.
    pub(crate) fn with_fill_paint<R>(
        &mut self,
        draw: impl for<'a> FnOnce(&mut Self, &Paint<'a>) -> R,
    ) -> R {
        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };
        paint.set_color(self.state.fill_color);
        draw(self, &paint)
    }
}
