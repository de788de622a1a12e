//! Pure Rust 2D canvas used to paint caption bubbles.
//!
//! This crate provides the small slice of the Canvas 2D API that caption
//! rendering needs, without a browser or JavaScript runtime. It uses:
//! - `tiny-skia` for path filling and compositing
//! - `cosmic-text` for text shaping, measurement, and glyph outlines
//! - `fontdb` for font database management
//!
//! # Example
//!
//! ```rust,ignore
//! use bubble_caption_canvas2d::{Canvas2dContext, CornerRadii, RectParams, RoundRectParams};
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ea403f")?;
//! ctx.begin_path();
//! ctx.round_rect(&RoundRectParams {
//!     rect: RectParams::new(10.0, 10.0, 200.0, 56.0),
//!     radii: CornerRadii {
//!         bottom_left: 0.0,
//!         ..CornerRadii::uniform(5.6)
//!     },
//! });
//! ctx.fill();
//! let png_data = ctx.to_png(None)?;
//! ```

mod context;
mod drawing_state;
mod error;
mod font_config;
mod geometry;
mod style;
mod text;

// Re-export public API
pub use context::{Canvas2dContext, KAPPA, MAX_DIMENSION};
pub use error::{Canvas2dError, Canvas2dResult};
pub use font_config::{FontConfig, ResolvedFontConfig};
pub use geometry::{CornerRadii, CubicSegment, Point, RectParams, RgbaImageRef, RoundRectParams};
pub use style::{TextAlign, TextBaseline};
pub use text::{FontSpec, TextMetrics};
