//! Transform operations for Canvas2dContext.

use super::Canvas2dContext;

impl Canvas2dContext {
    /// Scale the canvas.
    pub fn scale(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "scale {} {}", x, y);
        self.state.transform = self.state.transform.pre_scale(x, y);
    }
}
