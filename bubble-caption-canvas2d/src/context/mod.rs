//! The canvas context: pixel surface, fonts and drawing state.

mod drawing;
mod image_ops;
mod path_ops;
mod text_rendering;
mod transform;

use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_config::{FontConfig, ResolvedFontConfig};
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::{Color, Pixmap};

pub use path_ops::KAPPA;

/// Largest width or height a canvas may have.
pub const MAX_DIMENSION: u32 = 32767;

/// An RGBA drawing surface with Canvas 2D style state.
pub struct Canvas2dContext {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Premultiplied RGBA pixels.
    pub(crate) pixmap: Pixmap,
    pub(crate) font_system: FontSystem,
    pub(crate) swash_cache: SwashCache,
    pub(crate) state: DrawingState,
    /// Path under construction, already in device space.
    pub(crate) path_builder: tiny_skia::PathBuilder,
    pub(crate) has_current_point: bool,
}

impl Canvas2dContext {
    /// A canvas using the default fonts. Scans the system on every call.
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Self::with_resolved(width, height, &FontConfig::default().resolve())
    }

    /// A canvas sharing an already scanned font database.
    pub fn with_resolved(
        width: u32,
        height: u32,
        fonts: &ResolvedFontConfig,
    ) -> Canvas2dResult<Self> {
        let in_range = |d: u32| (1..=MAX_DIMENSION).contains(&d);
        let pixmap = Some((width, height))
            .filter(|(w, h)| in_range(*w) && in_range(*h))
            .and_then(|(w, h)| Pixmap::new(w, h))
            .ok_or(Canvas2dError::InvalidDimensions { width, height })?;
        log::debug!(target: "canvas", "new canvas {}x{}", width, height);

        Ok(Self {
            width,
            height,
            pixmap,
            font_system: FontSystem::new_with_locale_and_db("en".to_string(), fonts.fontdb.clone()),
            swash_cache: SwashCache::new(),
            state: DrawingState::default(),
            path_builder: tiny_skia::PathBuilder::new(),
            has_current_point: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Accepts any CSS color, including `#rrggbbaa`.
    pub fn set_fill_style(&mut self, style: &str) -> Canvas2dResult<()> {
        log::debug!(target: "canvas", "fillStyle {}", style);
        self.state.fill_color = parse_color(style)?;
        Ok(())
    }
}

pub(crate) fn parse_color(css: &str) -> Canvas2dResult<Color> {
    let [r, g, b, a] = csscolorparser::parse(css)
        .map_err(|e| Canvas2dError::ColorParseError(format!("{css}: {e}")))?
        .to_array();
    Color::from_rgba(r, g, b, a)
        .ok_or_else(|| Canvas2dError::ColorParseError(format!("{css}: out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectParams;

    fn canvas(width: u32, height: u32) -> Canvas2dContext {
        let fonts = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
        .resolve();
        Canvas2dContext::with_resolved(width, height, &fonts).unwrap()
    }

    fn center_pixel(ctx: &Canvas2dContext) -> Vec<u8> {
        ctx.get_image_data(ctx.width() as i32 / 2, ctx.height() as i32 / 2, 1, 1)
    }

    #[test]
    fn test_starts_transparent() {
        let ctx = canvas(200, 150);
        assert_eq!((ctx.width(), ctx.height()), (200, 150));
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rejects_out_of_range_dimensions() {
        let fonts = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
        .resolve();
        for (w, h) in [(0, 100), (100, 0), (MAX_DIMENSION + 1, 10)] {
            assert!(matches!(
                Canvas2dContext::with_resolved(w, h, &fonts),
                Err(Canvas2dError::InvalidDimensions { width, height }) if width == w && height == h
            ));
        }
    }

    #[test]
    fn test_parse_color() {
        let translucent = parse_color("#ffffffc0").unwrap();
        assert!((translucent.alpha() - 192.0 / 255.0).abs() < 1e-3);
        assert_eq!(parse_color("#ea403f").unwrap().alpha(), 1.0);
        assert!(matches!(
            parse_color("not-a-color"),
            Err(Canvas2dError::ColorParseError(_))
        ));
    }

    #[test]
    fn test_invalid_fill_style_keeps_previous() {
        let mut ctx = canvas(20, 20);
        ctx.set_fill_style("#ff0000").unwrap();
        assert!(ctx.set_fill_style("nonsense").is_err());
        ctx.fill_rect(&RectParams::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(center_pixel(&ctx), vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_translucent_fill_style() {
        let mut ctx = canvas(20, 20);
        ctx.set_fill_style("#0000ff80").unwrap();
        ctx.fill_rect(&RectParams::new(0.0, 0.0, 20.0, 20.0));
        let alpha = center_pixel(&ctx)[3];
        assert!((127..=128).contains(&alpha));
    }
}
