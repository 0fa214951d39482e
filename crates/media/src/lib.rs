//! Image uploads to the external media host.
//!
//! The HTTP layer depends only on [`MediaHost`]; [`Cloudinary`] is the production
//! implementation and [`Unconfigured`] stands in when no credentials are set.

use async_trait::async_trait;
use thiserror::Error;

pub mod cloudinary;

pub use cloudinary::Cloudinary;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("media host is not configured")]
    NotConfigured,

    /// The host answered with an error; `message` is its own explanation.
    #[error("media host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("media host request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected media host response: {0}")]
    InvalidResponse(String),
}

/// File received from an admin, ready to forward.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct Uploaded {
    /// Durable HTTPS URL of the stored image
    pub url: String,
    /// Provider response body
    pub raw: serde_json::Value,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<Uploaded, MediaError>;
}

/// Host used when no media credentials are configured.
pub struct Unconfigured;

#[async_trait]
impl MediaHost for Unconfigured {
    async fn upload(&self, _file: UploadFile) -> Result<Uploaded, MediaError> {
        Err(MediaError::NotConfigured)
    }
}
