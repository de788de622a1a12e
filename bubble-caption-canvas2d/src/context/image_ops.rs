//! Compositing images onto the canvas and reading pixels back out.

use super::Canvas2dContext;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::RgbaImageRef;
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint, PixmapRef};

/// PNG pixel density when the caller does not ask for one.
const DEFAULT_PPI: f32 = 72.0;

impl Canvas2dContext {
    fn draw_pixmap_at(&mut self, source: PixmapRef<'_>, dx: f32, dy: f32) {
        log::debug!(
            target: "canvas",
            "drawImage {}x{} at {} {}",
            source.width(), source.height(), dx, dy
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        let transform = self.state.transform.pre_translate(dx, dy);
        self.pixmap.draw_pixmap(0, 0, source, &paint, transform, None);
    }

    /// Draw straight-alpha RGBA pixels with their top-left corner at `(dx, dy)`.
    pub fn draw_image_data(
        &mut self,
        image: &RgbaImageRef<'_>,
        dx: f32,
        dy: f32,
    ) -> Canvas2dResult<()> {
        let expected = image.width as usize * image.height as usize * 4;
        if image.data.len() != expected {
            return Err(Canvas2dError::InvalidImageData {
                expected,
                actual: image.data.len(),
            });
        }

        let mut pixmap = Pixmap::new(image.width, image.height).ok_or(
            Canvas2dError::InvalidDimensions {
                width: image.width,
                height: image.height,
            },
        )?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.data.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        self.draw_pixmap_at(pixmap.as_ref(), dx, dy);
        Ok(())
    }

    /// Draw the whole of another canvas with its top-left corner at `(dx, dy)`.
    pub fn draw_canvas(&mut self, source: &Canvas2dContext, dx: f32, dy: f32) {
        self.draw_pixmap_at(source.pixmap.as_ref(), dx, dy);
    }

    /// Straight-alpha RGBA pixels of a region. Pixels outside the canvas read
    /// as transparent black.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for row in 0..height as i64 {
            for col in 0..width as i64 {
                let rgba = self
                    .pixel_at(x as i64 + col, y as i64 + row)
                    .map(|c| [c.red(), c.green(), c.blue(), c.alpha()])
                    .unwrap_or([0; 4]);
                data.extend_from_slice(&rgba);
            }
        }
        data
    }

    fn pixel_at(&self, x: i64, y: i64) -> Option<ColorU8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixmap.pixels().get(idx).map(|p| p.demultiply())
    }

    /// Encode the canvas as an RGBA PNG, recording `ppi` (default 72) as the
    /// pixel density.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(DEFAULT_PPI).max(0.0);
        let pixels_per_meter = (ppi / 0.0254).round() as u32;
        let data = self.get_image_data(0, 0, self.width, self.height);

        let mut buf = Vec::new();
        let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: pixels_per_meter,
            yppu: pixels_per_meter,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_config::FontConfig;

    fn canvas(width: u32, height: u32) -> Canvas2dContext {
        let fonts = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        }
        .resolve();
        Canvas2dContext::with_resolved(width, height, &fonts).unwrap()
    }

    #[test]
    fn test_half_transparent_pixel_reads_back_straight() {
        let mut ctx = canvas(2, 1);
        ctx.draw_image_data(
            &RgbaImageRef {
                data: &[255, 255, 255, 128, 200, 100, 50, 0],
                width: 2,
                height: 1,
            },
            0.0,
            0.0,
        )
        .unwrap();

        let data = ctx.get_image_data(0, 0, 2, 1);
        assert_eq!(&data[0..4], &[255, 255, 255, 128]);
        assert_eq!(&data[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_reads_transparent() {
        let ctx = canvas(2, 2);
        let data = ctx.get_image_data(-1, -1, 4, 4);
        assert_eq!(data.len(), 64);
        assert!(data.iter().all(|&b| b == 0));
    }
}
