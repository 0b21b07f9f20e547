use std::path::PathBuf;

use thiserror::Error;
use vivo_parser::{ExtractorError, TransportError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    #[error("HTTP client error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Permissions denied: Cannot create file '{}'\nYou may want to run this program as root again or change the output directory via the `-o` flag",
        .0.display()
    )]
    PermissionDenied(PathBuf),

    #[error("Cannot create file '{}': {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CliError {
    /// Map a failed file creation, giving permission problems their own hint.
    pub fn create_file(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied(path)
        } else {
            Self::CreateFile { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
