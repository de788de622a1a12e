//! Path construction. Points are mapped to device space as they are added.

use super::Canvas2dContext;
use crate::geometry::{CubicSegment, Point, RectParams, RoundRectParams};

/// Control handle length, as a fraction of the radius, for a quarter circle
/// drawn as one cubic segment.
pub const KAPPA: f32 = 0.552_284_8;

impl Canvas2dContext {
    /// Discard the current path.
    pub fn begin_path(&mut self) {
        log::debug!(target: "canvas", "beginPath");
        self.path_builder = tiny_skia::PathBuilder::new();
        self.has_current_point = false;
    }

    pub(crate) fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let t = &self.state.transform;
        (t.sx * x + t.kx * y + t.tx, t.ky * x + t.sy * y + t.ty)
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        log::debug!(target: "canvas", "moveTo {} {}", x, y);
        let (dx, dy) = self.transform_point(x, y);
        self.path_builder.move_to(dx, dy);
        self.has_current_point = true;
    }

    /// Without a current point this starts a subpath at `(x, y)` instead.
    pub fn line_to(&mut self, x: f32, y: f32) {
        if !self.has_current_point {
            self.move_to(x, y);
            return;
        }
        log::debug!(target: "canvas", "lineTo {} {}", x, y);
        let (dx, dy) = self.transform_point(x, y);
        self.path_builder.line_to(dx, dy);
    }

    pub fn close_path(&mut self) {
        log::debug!(target: "canvas", "closePath");
        self.path_builder.close();
    }

    /// Append a cubic Bezier segment.
    pub fn curve_to(&mut self, segment: &CubicSegment) {
        let CubicSegment { ctrl1, ctrl2, to } = *segment;
        if !self.has_current_point {
            self.move_to(ctrl1.x, ctrl1.y);
        }
        log::debug!(target: "canvas", "curveTo {} {}", to.x, to.y);
        let (c1x, c1y) = self.transform_point(ctrl1.x, ctrl1.y);
        let (c2x, c2y) = self.transform_point(ctrl2.x, ctrl2.y);
        let (dx, dy) = self.transform_point(to.x, to.y);
        self.path_builder.cubic_to(c1x, c1y, c2x, c2y, dx, dy);
    }

    /// Append a closed rectangle subpath.
    pub fn rect(&mut self, params: &RectParams) {
        let RectParams { x, y, .. } = *params;
        let (right, bottom) = (params.right(), params.bottom());
        self.move_to(x, y);
        self.line_to(right, y);
        self.line_to(right, bottom);
        self.line_to(x, bottom);
        self.close_path();
    }

    /// Append a closed rounded rectangle subpath, clockwise from the top edge.
    ///
    /// Radii are fitted to the rectangle first. A zero radius keeps the
    /// corner square.
    pub fn round_rect(&mut self, params: &RoundRectParams) {
        let rect = params.rect.normalized();
        let radii = params.radii.fitted_to(rect.width, rect.height);
        log::debug!(
            target: "canvas",
            "roundRect {} {} {} {} {:?}",
            rect.x, rect.y, rect.width, rect.height, radii
        );

        let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
        // Corner vertex, radius, unit vector back along the incoming edge and
        // unit vector along the outgoing edge.
        let corners = [
            (Point::new(right, top), radii.top_right, (-1.0, 0.0), (0.0, 1.0)),
            (Point::new(right, bottom), radii.bottom_right, (0.0, -1.0), (-1.0, 0.0)),
            (Point::new(left, bottom), radii.bottom_left, (1.0, 0.0), (0.0, -1.0)),
            (Point::new(left, top), radii.top_left, (0.0, 1.0), (1.0, 0.0)),
        ];

        self.move_to(left + radii.top_left, top);
        for (vertex, r, back, forward) in corners {
            let along = |dir: (f32, f32), len: f32| {
                Point::new(vertex.x + dir.0 * len, vertex.y + dir.1 * len)
            };
            let start = along(back, r);
            self.line_to(start.x, start.y);
            if r > 0.0 {
                let handle = r * (1.0 - KAPPA);
                self.curve_to(&CubicSegment {
                    ctrl1: along(back, handle),
                    ctrl2: along(forward, handle),
                    to: along(forward, r),
                });
            }
        }
        self.close_path();
    }
}
