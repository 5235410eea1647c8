// Image sources and asynchronous image loading for skeleton detection

use crate::models::pose::{PoseError, PoseResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;
use std::path::PathBuf;

const DATA_URL_IMAGE_TYPES: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Where an image to analyze comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    DataUrl(String),
    Url(String),
}

impl ImageSource {
    /// Classify a string the way an image `src` attribute would be interpreted
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("data:") {
            ImageSource::DataUrl(trimmed.to_string())
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else {
            ImageSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Short description for logs, without the payload
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => format!("file {}", path.display()),
            ImageSource::Bytes(bytes) => format!("{} bytes in memory", bytes.len()),
            ImageSource::DataUrl(url) => format!("data url ({} chars)", url.len()),
            ImageSource::Url(url) => format!("url {}", url),
        }
    }
}

/// Strip a `data:image/<type>;base64,` prefix, leaving the raw base64 payload.
///
/// Input without a recognized prefix is returned unchanged.
pub fn strip_data_url_prefix(data: &str) -> &str {
    let Some(rest) = data.strip_prefix("data:image/") else {
        return data;
    };
    for image_type in DATA_URL_IMAGE_TYPES {
        if let Some(payload) = rest
            .strip_prefix(image_type)
            .and_then(|r| r.strip_prefix(";base64,"))
        {
            return payload;
        }
    }
    data
}

/// Load and decode an image
pub async fn load_image(source: &ImageSource) -> PoseResult<DynamicImage> {
    let bytes = match source {
        ImageSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|e| PoseError::ImageLoadError(format!("{}: {}", path.display(), e)))?,
        ImageSource::Bytes(bytes) => bytes.clone(),
        ImageSource::DataUrl(url) => decode_data_url(url)?,
        ImageSource::Url(url) => fetch(url).await?,
    };
    decode(bytes).await
}

/// Decoding is CPU-bound, so it runs on the blocking pool
async fn decode(bytes: Vec<u8>) -> PoseResult<DynamicImage> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| PoseError::ImageLoadError(format!("decode task failed: {}", e)))?
        .map_err(|e| PoseError::ImageLoadError(e.to_string()))
}

fn decode_data_url(url: &str) -> PoseResult<Vec<u8>> {
    let payload = strip_data_url_prefix(url);
    if payload.starts_with("data:") {
        return Err(PoseError::ImageLoadError(
            "data url is not a base64 png, jpeg or webp image".to_string(),
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| PoseError::ImageLoadError(format!("invalid base64 payload: {}", e)))
}

async fn fetch(url: &str) -> PoseResult<Vec<u8>> {
    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| PoseError::ImageLoadError(format!("{}: {}", url, e)))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| PoseError::ImageLoadError(format!("{}: {}", url, e)))?;
    Ok(bytes.to_vec())
}
