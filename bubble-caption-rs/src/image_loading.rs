use crate::error::{CaptionError, CaptionResult};
use log::{error, info, warn};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};

static BUBBLE_CAPTION_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    static ref REQWEST_CLIENT: Client = reqwest::ClientBuilder::new()
        .user_agent(BUBBLE_CAPTION_USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            warn!("Failed to construct reqwest client with user agent: {err}");
            Client::new()
        });
}

/// Where to find the background image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackgroundSource {
    /// File path, `file://` URL or `http(s)://` URL.
    pub path: String,
    /// Extra candidates tried after the path variants.
    pub fallbacks: Vec<String>,
    /// Directory that relative file candidates are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl BackgroundSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallbacks.push(fallback.into());
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Every location to try, in order, without duplicates.
    ///
    /// A local path `content/bg.jpg` (or `./content/bg.jpg`, `/content/bg.jpg`)
    /// expands to all three spellings after the path as given.
    pub fn candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let mut push = |candidate: String| {
            if !candidate.is_empty() && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        };

        push(self.path.clone());
        if !is_url(&self.path) {
            let bare = self
                .path
                .trim_start_matches("./")
                .trim_start_matches('/')
                .to_string();
            if !bare.is_empty() {
                push(bare.clone());
                push(format!("./{bare}"));
                push(format!("/{bare}"));
            }
        }
        for fallback in &self.fallbacks {
            push(fallback.clone());
        }
        candidates
    }

    fn resolve_file(&self, candidate: &str) -> PathBuf {
        let path = Path::new(candidate.strip_prefix("file://").unwrap_or(candidate));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("file://")
}

fn is_http(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// A decoded background in non-premultiplied RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode PNG or JPEG bytes.
pub fn decode_image(bytes: &[u8]) -> CaptionResult<BackgroundImage> {
    let img = image::load_from_memory(bytes).map_err(|err| CaptionError::Decode(err.to_string()))?;
    let rgba = img.to_rgba8();
    Ok(BackgroundImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

async fn fetch_http(url: &str) -> CaptionResult<Vec<u8>> {
    let response = REQWEST_CLIENT
        .get(url)
        .send()
        .await
        .map_err(|err| CaptionError::Http(err.to_string()))?;
    match response.status() {
        StatusCode::OK => {
            let bytes = response
                .bytes()
                .await
                .map_err(|err| CaptionError::Http(err.to_string()))?;
            Ok(bytes.to_vec())
        }
        status => Err(CaptionError::Http(format!(
            "{url} responded with status code {status}"
        ))),
    }
}

async fn load_candidate(source: &BackgroundSource, candidate: &str) -> CaptionResult<BackgroundImage> {
    let bytes = if is_http(candidate) {
        fetch_http(candidate).await?
    } else {
        tokio::fs::read(source.resolve_file(candidate)).await?
    };
    decode_image(&bytes)
}

/// Try each candidate of `source` in order and return the first image that
/// loads and decodes, together with the candidate that produced it.
pub async fn load_background(
    source: &BackgroundSource,
) -> CaptionResult<(BackgroundImage, String)> {
    let candidates = source.candidates();
    if candidates.is_empty() {
        return Err(CaptionError::MissingBackground);
    }

    for candidate in &candidates {
        info!("Loading background image: {candidate}");
        match load_candidate(source, candidate).await {
            Ok(image) => {
                info!(
                    "Loaded background {candidate} ({}x{})",
                    image.width, image.height
                );
                return Ok((image, candidate.clone()));
            }
            Err(err) => warn!("Failed to load background from {candidate}: {err}"),
        }
    }

    error!(
        "Failed to load background image from any of {} candidates",
        candidates.len()
    );
    Err(CaptionError::BackgroundLoad {
        attempted: candidates,
    })
}
