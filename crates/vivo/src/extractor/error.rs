use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    NetworkError(#[from] TransportError),
    #[error("decode error: {0}")]
    DecodeError(String),
    #[error("no media found at {0}")]
    NoMediaFound(String),
    #[error("download error: {0}")]
    DownloadError(String),
}
