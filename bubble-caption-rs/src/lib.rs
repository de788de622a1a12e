#![doc = include_str!("../README.md")]

pub mod converter;
pub mod corners;
pub mod error;
pub mod image_loading;
pub mod layout;
pub mod lines;
pub mod palette;
pub mod position;
pub mod render;
pub mod text;

#[macro_use]
extern crate lazy_static;

pub use bubble_caption_canvas2d as canvas2d;
pub use converter::{CaptionConverter, CaptionOpts, ComposedImage, ProgressStage};
pub use corners::{Alignment, CornerResolver, CornerShape, LineBox, LineFlag};
pub use error::{CaptionError, CaptionResult};
pub use image_loading::BackgroundSource;
pub use lines::{parse_lines, TextLine};
pub use position::Position;
pub use serde_json;
