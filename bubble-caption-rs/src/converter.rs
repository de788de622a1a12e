use crate::corners::Alignment;
use crate::error::{CaptionError, CaptionResult};
use crate::image_loading::{load_background, BackgroundSource};
use crate::layout::{layout_block, BlockLayout, CaptionStyle};
use crate::lines::parse_lines;
use crate::palette::{color_scheme_or_default, ResolvedColors};
use crate::position::{custom_y_pixels, text_x, text_y, Position};
use crate::render::{rasterize_block, CaptionRaster};
use crate::text::{CanvasMeasurer, LineMeasurer, DEFAULT_FONTS};
use bubble_caption_canvas2d::{Canvas2dContext, FontConfig, ResolvedFontConfig, RgbaImageRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Caption rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptionOpts {
    pub align: Alignment,
    pub position: Position,
    /// Vertical center of the block as a percentage of the background height.
    /// Only used with `Position::Custom`.
    pub custom_y: Option<f32>,
    pub color_name: String,
    pub transparent_background: bool,
    /// Device pixels per layout pixel of the caption block.
    pub scale: f32,
    pub style: CaptionStyle,
}

impl Default for CaptionOpts {
    fn default() -> Self {
        Self {
            align: Alignment::default(),
            position: Position::default(),
            custom_y: None,
            color_name: "white".to_string(),
            transparent_background: false,
            scale: 2.0,
            style: CaptionStyle::default(),
        }
    }
}

impl CaptionOpts {
    pub fn validate(&self) -> CaptionResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(CaptionError::InvalidOption(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(self.style.font_size.is_finite() && self.style.font_size > 0.0) {
            return Err(CaptionError::InvalidOption(format!(
                "fontSize must be a positive number, got {}",
                self.style.font_size
            )));
        }
        if self.style.font_families.is_empty() {
            return Err(CaptionError::InvalidOption(
                "fontFamilies must name at least one family".to_string(),
            ));
        }
        if !(self.style.line_height_em.is_finite() && self.style.line_height_em > 0.0) {
            return Err(CaptionError::InvalidOption(format!(
                "lineHeightEm must be a positive number, got {}",
                self.style.line_height_em
            )));
        }
        let lengths = [
            ("cornerRadiusEm", self.style.corner_radius_em),
            ("paddingXEm", self.style.padding_x_em),
            ("paddingYEm", self.style.padding_y_em),
            ("spacerHeightEm", self.style.spacer_height_em),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CaptionError::InvalidOption(format!(
                    "{name} must be zero or a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn colors(&self) -> ResolvedColors {
        color_scheme_or_default(&self.color_name).resolve(self.transparent_background)
    }
}

/// Stages of [`CaptionConverter::text_on_image`], reported in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStage {
    Initializing,
    CreatingOverlay,
    ApplyingBorders,
    Capturing,
    LoadingBackground,
    Compositing,
    Finalizing,
}

impl ProgressStage {
    pub fn message(&self) -> &'static str {
        match self {
            ProgressStage::Initializing => "Initializing...",
            ProgressStage::CreatingOverlay => "Creating text overlay...",
            ProgressStage::ApplyingBorders => "Applying TikTok-style borders...",
            ProgressStage::Capturing => "Capturing text as image...",
            ProgressStage::LoadingBackground => "Loading background image...",
            ProgressStage::Compositing => "Compositing images...",
            ProgressStage::Finalizing => "Finalizing image...",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Progress observer for [`CaptionConverter::text_on_image_with`].
pub type ProgressFn<'a> = &'a (dyn Fn(ProgressStage) + Send + Sync);

/// A caption composited onto its background.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Top-left corner of the caption block on the background.
    pub text_x: f32,
    pub text_y: f32,
    /// Rasterized caption block size in pixels.
    pub text_width: u32,
    pub text_height: u32,
    /// The background candidate that loaded.
    pub background_path: String,
}

/// Renders captions and composites them onto background images.
///
/// The font database is resolved once and shared by every canvas the
/// converter creates.
///
/// # Examples
///
/// ```no_run
/// use bubble_caption_rs::{CaptionConverter, CaptionOpts};
///
/// let converter = CaptionConverter::new();
/// let png = converter
///     .text_to_png("wait for it\nNOW|1.5", &CaptionOpts::default())
///     .expect("Failed to render caption");
/// std::fs::write("caption.png", png).unwrap();
/// ```
#[derive(Clone)]
pub struct CaptionConverter {
    fonts: Arc<ResolvedFontConfig>,
}

impl CaptionConverter {
    /// Converter using the system fonts.
    pub fn new() -> Self {
        Self::with_resolved_fonts(DEFAULT_FONTS.clone())
    }

    pub fn with_font_config(config: &FontConfig) -> Self {
        Self::with_resolved_fonts(config.resolve())
    }

    pub fn with_resolved_fonts(fonts: ResolvedFontConfig) -> Self {
        match fonts.sans_serif_family() {
            Some(family) => log::debug!("Using {family} for sans-serif"),
            None if fonts.face_count() == 0 => {
                log::warn!("No fonts available, captions will render without text")
            }
            None => log::debug!("No preferred sans-serif family installed"),
        }
        Self {
            fonts: Arc::new(fonts),
        }
    }

    pub fn fonts(&self) -> &ResolvedFontConfig {
        &self.fonts
    }

    /// Parse, measure and resolve `text` into a positioned block.
    pub fn layout(
        &self,
        text: &str,
        opts: &CaptionOpts,
        measurer: &mut dyn LineMeasurer,
    ) -> BlockLayout {
        let lines = parse_lines(text);
        layout_block(&lines, &opts.style, opts.align, measurer)
    }

    /// Rasterize `text` as a transparent caption block.
    pub fn render_text(&self, text: &str, opts: &CaptionOpts) -> CaptionResult<CaptionRaster> {
        let mut measurer = CanvasMeasurer::new(&self.fonts, &opts.style)?;
        self.render_text_with(text, opts, &mut measurer)
    }

    pub fn render_text_with(
        &self,
        text: &str,
        opts: &CaptionOpts,
        measurer: &mut dyn LineMeasurer,
    ) -> CaptionResult<CaptionRaster> {
        opts.validate()?;
        let layout = self.layout(text, opts, measurer);
        rasterize_block(layout, &opts.style, &opts.colors(), opts.scale, &self.fonts)
    }

    /// PNG of the transparent caption block.
    pub fn text_to_png(&self, text: &str, opts: &CaptionOpts) -> CaptionResult<Vec<u8>> {
        if text.is_empty() {
            return Err(CaptionError::MissingText);
        }
        self.render_text(text, opts)?.to_png()
    }

    /// Render `text` and composite it onto the background described by `source`.
    pub async fn text_on_image(
        &self,
        text: &str,
        source: &BackgroundSource,
        opts: &CaptionOpts,
    ) -> CaptionResult<ComposedImage> {
        let mut measurer = CanvasMeasurer::new(&self.fonts, &opts.style)?;
        self.text_on_image_with(text, source, opts, &mut measurer, None)
            .await
    }

    pub async fn text_on_image_with(
        &self,
        text: &str,
        source: &BackgroundSource,
        opts: &CaptionOpts,
        measurer: &mut dyn LineMeasurer,
        on_progress: Option<ProgressFn<'_>>,
    ) -> CaptionResult<ComposedImage> {
        if text.is_empty() {
            return Err(CaptionError::MissingText);
        }
        if source.path.is_empty() {
            return Err(CaptionError::MissingBackground);
        }
        opts.validate()?;

        let report = |stage: ProgressStage| {
            log::info!("{stage}");
            if let Some(callback) = on_progress {
                callback(stage);
            }
        };

        report(ProgressStage::Initializing);
        let colors = opts.colors();

        report(ProgressStage::CreatingOverlay);
        let lines = parse_lines(text);

        report(ProgressStage::ApplyingBorders);
        let layout = layout_block(&lines, &opts.style, opts.align, measurer);

        report(ProgressStage::Capturing);
        let raster = rasterize_block(layout, &opts.style, &colors, opts.scale, &self.fonts)?;

        report(ProgressStage::LoadingBackground);
        let (background, background_path) = load_background(source).await?;

        report(ProgressStage::Compositing);
        let canvas_width = background.width as f32;
        let canvas_height = background.height as f32;
        let text_width = raster.width();
        let text_height = raster.height();
        let x = text_x(canvas_width, text_width as f32);
        let y = text_y(
            opts.position,
            custom_y_pixels(opts.custom_y, canvas_height),
            canvas_height,
            text_height as f32,
            lines.len(),
        );
        log::debug!("Placing {text_width}x{text_height} caption at ({x}, {y})");

        let mut canvas =
            Canvas2dContext::with_resolved(background.width, background.height, &self.fonts)?;
        canvas.draw_image_data(
            &RgbaImageRef {
                data: &background.rgba,
                width: background.width,
                height: background.height,
            },
            0.0,
            0.0,
        )?;
        canvas.draw_canvas(&raster.canvas, x, y);

        report(ProgressStage::Finalizing);
        let png = canvas.to_png(None)?;

        Ok(ComposedImage {
            png,
            width: background.width,
            height: background.height,
            text_x: x,
            text_y: y,
            text_width,
            text_height,
            background_path,
        })
    }
}

impl Default for CaptionConverter {
    fn default() -> Self {
        Self::new()
    }
}
