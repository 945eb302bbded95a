use std::path::PathBuf;

use thiserror::Error;

use crate::constants::API_KEY_VARS;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "API key not found. Set {} or {} environment variable.",
        API_KEY_VARS[0],
        API_KEY_VARS[1]
    )]
    MissingCredential,

    /// A bundled reference image or the style document is absent.
    #[error("bundled asset not found: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("invalid aspect ratio '{0}', expected <width>:<height> with positive integers")]
    InvalidAspectRatio(String),

    #[error("API request failed with status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("API key is not a valid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid inline image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("background removal failed: {0}")]
    Onnx(#[from] ort::Error),

    #[error("background removal failed: {0}")]
    Matte(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
