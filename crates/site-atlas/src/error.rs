//! Error types for the analysis core.
//!
//! Only per-item failures in the visual pipeline and configuration checks
//! produce errors; URL parsing and classification are total.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("invalid image reference: {0}")]
    InvalidImageRef(String),

    #[error("invalid data URL payload: {0}")]
    DataUrl(#[from] base64::DecodeError),

    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
