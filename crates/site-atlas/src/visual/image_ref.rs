//! Where a snapshot's rendered image lives, and how to decode it.

use crate::error::{AtlasError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A reference to a rendered page image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageRef {
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// A `data:<mime>;base64,<payload>` URL.
    DataUrl(String),
    /// An image file on disk.
    Path(PathBuf),
    /// Pixels that are already decoded.
    #[serde(skip)]
    Decoded(DynamicImage),
}

impl ImageRef {
    /// Decode into pixels. Fails for unreadable files, malformed data URLs and
    /// unrecognized image formats.
    pub fn decode(&self) -> Result<DynamicImage> {
        match self {
            ImageRef::Bytes(bytes) => Ok(image::load_from_memory(bytes)?),
            ImageRef::DataUrl(url) => {
                let bytes = decode_data_url(url)?;
                Ok(image::load_from_memory(&bytes)?)
            }
            ImageRef::Path(path) => {
                let bytes = std::fs::read(path)?;
                Ok(image::load_from_memory(&bytes)?)
            }
            ImageRef::Decoded(image) => Ok(image.clone()),
        }
    }
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AtlasError::InvalidImageRef("data URL must start with \"data:\"".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AtlasError::InvalidImageRef("data URL has no payload".into()))?;
    if !header.ends_with(";base64") {
        return Err(AtlasError::InvalidImageRef(
            "only base64-encoded data URLs are supported".into(),
        ));
    }
    Ok(STANDARD.decode(payload.trim())?)
}
