use anyhow::{bail, Context};
use bubble_caption_rs::canvas2d::FontConfig;
use bubble_caption_rs::palette::palette;
use bubble_caption_rs::{Alignment, BackgroundSource, CaptionConverter, CaptionOpts, Position};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// bubble-caption: Render TikTok-style caption bubbles
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Log pipeline progress to stderr
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the caption block to a transparent PNG
    #[clap(name = "text2png")]
    Text2Png {
        #[clap(flatten)]
        caption: CaptionArgs,
    },

    /// Render the caption onto a background image
    Compose {
        #[clap(flatten)]
        caption: CaptionArgs,

        /// Background image path or http(s) URL
        #[clap(short, long)]
        background: String,

        /// Additional background candidates, tried in order
        #[clap(long)]
        fallback: Vec<String>,

        /// Vertical placement. One of top, center, bottom, custom
        #[clap(short, long)]
        position: Option<String>,

        /// Caption center as a percentage of the image height, with --position custom
        #[clap(long)]
        custom_y: Option<f32>,
    },

    /// List the caption colors
    Colors {
        /// Print the palette as JSON
        #[clap(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Caption text. Lines are separated by newlines; append |<scale> to scale a line
    #[clap(short, long)]
    text: Option<String>,

    /// Path to a file containing the caption text
    #[clap(short, long)]
    input: Option<PathBuf>,

    /// Path to the output PNG file to be created
    #[clap(short, long)]
    output: PathBuf,

    /// Horizontal alignment. One of left, center, right
    #[clap(short, long)]
    align: Option<String>,

    /// Color name, see the colors command
    #[clap(short, long)]
    color: Option<String>,

    /// Use a translucent background
    #[clap(long)]
    transparent: bool,

    /// Output scale factor
    #[clap(short, long)]
    scale: Option<f32>,

    /// Additional directory to search for fonts
    #[clap(long)]
    font_dir: Vec<PathBuf>,

    /// JSON file with caption options. Flags take precedence
    #[clap(long)]
    config: Option<PathBuf>,
}

impl CaptionArgs {
    fn text(&self) -> anyhow::Result<String> {
        match (&self.text, &self.input) {
            (Some(text), None) => Ok(text.clone()),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read input file: {}", path.display()))?;
                Ok(text.trim_end_matches(['\r', '\n']).to_string())
            }
            (Some(_), Some(_)) => bail!("Only one of --text and --input may be given"),
            (None, None) => bail!("One of --text or --input is required"),
        }
    }

    fn opts(&self) -> anyhow::Result<CaptionOpts> {
        let mut opts = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str::<CaptionOpts>(&json)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => CaptionOpts::default(),
        };

        if let Some(align) = &self.align {
            opts.align = align.parse::<Alignment>()?;
        }
        if let Some(color) = &self.color {
            opts.color_name = color.clone();
        }
        if self.transparent {
            opts.transparent_background = true;
        }
        if let Some(scale) = self.scale {
            opts.scale = scale;
        }
        opts.validate()?;
        Ok(opts)
    }

    fn converter(&self) -> CaptionConverter {
        if self.font_dir.is_empty() {
            return CaptionConverter::new();
        }
        let config = self
            .font_dir
            .iter()
            .fold(FontConfig::default(), |config, dir| config.with_font_dir(dir));
        CaptionConverter::with_font_config(&config)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(err) = run(cli.command).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Text2Png { caption } => {
            let text = caption.text()?;
            let opts = caption.opts()?;
            let png = caption
                .converter()
                .text_to_png(&text, &opts)
                .context("Caption rendering failed")?;
            write_output(&caption.output, &png)
        }
        Commands::Compose {
            caption,
            background,
            fallback,
            position,
            custom_y,
        } => {
            let text = caption.text()?;
            let mut opts = caption.opts()?;
            if let Some(position) = position {
                opts.position = position.parse::<Position>()?;
            }
            if custom_y.is_some() {
                opts.custom_y = custom_y;
            }

            let source = fallback
                .into_iter()
                .fold(BackgroundSource::new(background), |source, path| {
                    source.with_fallback(path)
                });
            let composed = caption
                .converter()
                .text_on_image(&text, &source, &opts)
                .await
                .context("Caption compositing failed")?;
            log::info!(
                "Composited {}x{} caption onto {} at ({}, {})",
                composed.text_width,
                composed.text_height,
                composed.background_path,
                composed.text_x,
                composed.text_y
            );
            write_output(&caption.output, &composed.png)
        }
        Commands::Colors { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(palette())?);
            } else {
                for scheme in palette() {
                    println!("{:<12} {} {}", scheme.name, scheme.bg, scheme.fg);
                }
            }
            Ok(())
        }
    }
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data)
        .with_context(|| format!("Failed to write output to {}", path.display()))
}
