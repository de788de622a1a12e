//! Geometry values passed to the canvas path and image operations.

/// A point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectParams {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectParams {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The same area with a non-negative width and height.
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }
}

/// Circular corner radii of a rounded rectangle. A zero radius gives a
/// square corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    pub const SQUARE: Self = Self::uniform(0.0);

    pub const fn uniform(r: f32) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    /// Radii that fit a `width` x `height` box.
    ///
    /// Negative radii become zero. When two radii on one side add up to more
    /// than that side, every radius shrinks by the same factor.
    pub fn fitted_to(&self, width: f32, height: f32) -> Self {
        let tl = self.top_left.max(0.0);
        let tr = self.top_right.max(0.0);
        let br = self.bottom_right.max(0.0);
        let bl = self.bottom_left.max(0.0);

        let factor = [
            width / (tl + tr),
            width / (bl + br),
            height / (tl + bl),
            height / (tr + br),
        ]
        .into_iter()
        .filter(|f| f.is_finite())
        .fold(1.0_f32, f32::min);

        Self {
            top_left: tl * factor,
            top_right: tr * factor,
            bottom_right: br * factor,
            bottom_left: bl * factor,
        }
    }
}

/// A rounded rectangle with its own radius per corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundRectParams {
    pub rect: RectParams,
    pub radii: CornerRadii,
}

/// A cubic Bezier segment continuing from the current point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

/// Borrowed straight-alpha RGBA pixels, 4 bytes per pixel, row major.
#[derive(Debug, Clone, Copy)]
pub struct RgbaImageRef<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}
