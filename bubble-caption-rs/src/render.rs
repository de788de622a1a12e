//! Painting a laid-out caption block onto a transparent canvas.

use crate::corners::{Corner, CornerShape};
use crate::error::{CaptionError, CaptionResult};
use crate::layout::{BlockLayout, CaptionStyle, LineLayout};
use crate::palette::ResolvedColors;
use bubble_caption_canvas2d::{
    Canvas2dContext, CornerRadii, CubicSegment, Point, RectParams, ResolvedFontConfig,
    RoundRectParams, TextAlign, TextBaseline, KAPPA, MAX_DIMENSION,
};

/// A rasterized caption block and the layout it was painted from.
pub struct CaptionRaster {
    pub canvas: Canvas2dContext,
    pub layout: BlockLayout,
    /// Device pixels per layout pixel.
    pub scale: f32,
}

impl CaptionRaster {
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn to_png(&self) -> CaptionResult<Vec<u8>> {
        Ok(self.canvas.to_png(None)?)
    }
}

/// Paint `layout` at `scale` device pixels per layout pixel.
pub fn rasterize_block(
    layout: BlockLayout,
    style: &CaptionStyle,
    colors: &ResolvedColors,
    scale: f32,
    fonts: &ResolvedFontConfig,
) -> CaptionResult<CaptionRaster> {
    let width_px = (layout.width * scale).ceil();
    let height_px = (layout.height * scale).ceil();
    if !(width_px >= 1.0 && height_px >= 1.0) {
        return Err(CaptionError::ZeroDimensions {
            width: layout.width,
            height: layout.height,
        });
    }
    let limit = MAX_DIMENSION as f32;
    if !(width_px <= limit && height_px <= limit) {
        return Err(CaptionError::TooLarge {
            width: width_px,
            height: height_px,
            max: MAX_DIMENSION,
        });
    }
    log::info!(
        "Caption block {}x{} rasterized at {}x{}",
        layout.width,
        layout.height,
        width_px,
        height_px
    );

    let mut canvas = Canvas2dContext::with_resolved(width_px as u32, height_px as u32, fonts)?;
    canvas.scale(scale, scale);
    canvas.set_text_align(TextAlign::Center);
    canvas.set_text_baseline(TextBaseline::Middle);

    for line in layout.lines.iter().filter(|line| !line.spacer) {
        paint_box(&mut canvas, line, &colors.background)?;
        canvas.set_fill_style(&colors.foreground)?;
        canvas.set_font(style.font_spec(line.font_size));
        canvas.fill_text(
            &line.line.text,
            line.x + line.width / 2.0,
            line.y + line.height / 2.0,
        )?;
    }

    Ok(CaptionRaster {
        canvas,
        layout,
        scale,
    })
}

/// Fill one line box, squaring every corner that is not `Rounded` and
/// adding flares to `Squared` corners.
fn paint_box(canvas: &mut Canvas2dContext, line: &LineLayout, color: &str) -> CaptionResult<()> {
    let r = line.line.corner_radius;
    let corners = &line.line.corners;
    let radius = |corner| if corners.get(corner).is_rounded() { r } else { 0.0 };

    canvas.set_fill_style(color)?;
    canvas.begin_path();
    canvas.round_rect(&RoundRectParams {
        rect: RectParams::new(line.x, line.y, line.width, line.height),
        radii: CornerRadii {
            top_left: radius(Corner::TopLeft),
            top_right: radius(Corner::TopRight),
            bottom_right: radius(Corner::BottomRight),
            bottom_left: radius(Corner::BottomLeft),
        },
    });
    canvas.fill();

    for corner in Corner::ALL {
        if corners.get(corner) == CornerShape::Squared {
            paint_flare(canvas, line, corner, r);
        }
    }
    Ok(())
}

/// Concave fillet outside a squared corner.
///
/// The fillet spans `r` horizontally away from the box and `r` vertically
/// into it, bounded by a quarter circle centered at that far point.
fn paint_flare(canvas: &mut Canvas2dContext, line: &LineLayout, corner: Corner, r: f32) {
    if r <= 0.0 {
        return;
    }
    let (cx, sx) = if corner.is_left() {
        (line.x, -1.0)
    } else {
        (line.x + line.width, 1.0)
    };
    let (cy, sy) = if corner.is_top() {
        (line.y, 1.0)
    } else {
        (line.y + line.height, -1.0)
    };

    canvas.begin_path();
    canvas.move_to(cx, cy);
    canvas.line_to(cx, cy + sy * r);
    canvas.curve_to(&CubicSegment {
        ctrl1: Point::new(cx, cy + sy * r * (1.0 - KAPPA)),
        ctrl2: Point::new(cx + sx * r * (1.0 - KAPPA), cy),
        to: Point::new(cx + sx * r, cy),
    });
    canvas.close_path();
    canvas.fill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corners::{Alignment, LineBox};
    use bubble_caption_canvas2d::FontConfig;
    use rstest::rstest;

    fn no_system_fonts() -> ResolvedFontConfig {
        FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
        .resolve()
    }

    fn colors() -> ResolvedColors {
        ResolvedColors {
            background: "#ea403f".to_string(),
            foreground: "#ffffff".to_string(),
        }
    }

    fn single_box(width: f32, height: f32) -> BlockLayout {
        BlockLayout {
            alignment: Alignment::Center,
            lines: vec![LineLayout {
                line: LineBox::new("", 1.0, Some(width), 10.0),
                spacer: false,
                font_size: 28.0,
                x: 0.0,
                y: 0.0,
                width,
                height,
            }],
            width,
            height,
        }
    }

    fn alpha_at(raster: &CaptionRaster, x: u32, y: u32) -> u8 {
        let data = raster.canvas.get_image_data(x as i32, y as i32, 1, 1);
        data[3]
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let layout = BlockLayout {
            alignment: Alignment::Center,
            lines: vec![],
            width: 0.0,
            height: 0.0,
        };
        let result = rasterize_block(
            layout,
            &CaptionStyle::default(),
            &colors(),
            2.0,
            &no_system_fonts(),
        );
        assert!(matches!(result, Err(CaptionError::ZeroDimensions { .. })));
    }

    #[rstest]
    #[case::huge_scale(single_box(100.0, 40.0), 1e30)]
    #[case::infinite_scale(single_box(100.0, 40.0), f32::INFINITY)]
    #[case::wide_block(single_box(40_000.0, 40.0), 1.0)]
    fn test_oversized_canvas_rejected(#[case] layout: BlockLayout, #[case] scale: f32) {
        let result = rasterize_block(
            layout,
            &CaptionStyle::default(),
            &colors(),
            scale,
            &no_system_fonts(),
        );
        match result {
            Err(err @ CaptionError::TooLarge { .. }) => {
                assert!(err.to_string().contains("32767"), "{err}");
            }
            Err(err) => panic!("unexpected error: {err}"),
            Ok(_) => panic!("oversized canvas was allocated"),
        }
    }

    #[test]
    fn test_largest_canvas_accepted() {
        let raster = rasterize_block(
            single_box(32_767.0, 1.0),
            &CaptionStyle::default(),
            &colors(),
            1.0,
            &no_system_fonts(),
        )
        .unwrap();
        assert_eq!(raster.width(), MAX_DIMENSION);
    }

    #[test]
    fn test_canvas_size_scaled_and_rounded_up() {
        let raster = rasterize_block(
            single_box(100.5, 40.0),
            &CaptionStyle::default(),
            &colors(),
            2.0,
            &no_system_fonts(),
        )
        .unwrap();
        assert_eq!(raster.width(), 201);
        assert_eq!(raster.height(), 80);
    }

    #[test]
    fn test_rounded_and_squared_corners() {
        let mut layout = single_box(100.0, 40.0);
        layout.lines[0]
            .line
            .corners
            .raise(Corner::TopRight, CornerShape::Connected);
        let raster = rasterize_block(
            layout,
            &CaptionStyle::default(),
            &colors(),
            1.0,
            &no_system_fonts(),
        )
        .unwrap();

        // Rounded top-left leaves the extreme corner empty
        assert_eq!(alpha_at(&raster, 0, 0), 0);
        // Connected top-right is square
        assert_eq!(alpha_at(&raster, 99, 0), 255);
        // Interior is filled with the opaque background
        let data = raster.canvas.get_image_data(50, 20, 1, 1);
        assert_eq!(data, vec![0xea, 0x40, 0x3f, 255]);
    }

    #[test]
    fn test_flare_painted_outside_squared_corner() {
        // Box inset by 20px so the flare has room on the left
        let mut layout = single_box(100.0, 40.0);
        layout.width = 140.0;
        layout.lines[0].x = 20.0;
        layout.lines[0]
            .line
            .corners
            .raise(Corner::TopLeft, CornerShape::Squared);
        let raster = rasterize_block(
            layout,
            &CaptionStyle::default(),
            &colors(),
            1.0,
            &no_system_fonts(),
        )
        .unwrap();

        // Just left of the squared corner, inside the fillet
        assert_eq!(alpha_at(&raster, 19, 0), 255);
        // Beyond the fillet's reach
        assert_eq!(alpha_at(&raster, 5, 0), 0);
        assert_eq!(alpha_at(&raster, 19, 15), 0);
    }

    #[test]
    fn test_spacers_not_painted() {
        let mut layout = single_box(100.0, 40.0);
        layout.lines[0].spacer = true;
        let raster = rasterize_block(
            layout,
            &CaptionStyle::default(),
            &colors(),
            1.0,
            &no_system_fonts(),
        )
        .unwrap();
        let data = raster.canvas.get_image_data(0, 0, 100, 40);
        assert!(data.chunks(4).all(|px| px[3] == 0));
    }

    #[test]
    fn test_translucent_background() {
        let translucent = ResolvedColors {
            background: "#000000c0".to_string(),
            foreground: "#ffffff".to_string(),
        };
        let raster = rasterize_block(
            single_box(100.0, 40.0),
            &CaptionStyle::default(),
            &translucent,
            1.0,
            &no_system_fonts(),
        )
        .unwrap();
        assert_eq!(alpha_at(&raster, 50, 20), 192);
    }
}
