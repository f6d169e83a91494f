use hyper::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Message returned to clients when the catalog file is absent
pub const MSG_FILE_NOT_FOUND: &str = "File not found";
/// Message returned to clients for every read or parse failure
pub const MSG_LOAD_FAILED: &str = "Failed to load products";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read catalog file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// HTTP status reported to the client
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Io { .. } | Self::Parse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; the detail stays in the error log
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => MSG_FILE_NOT_FOUND,
            Self::Io { .. } | Self::Parse { .. } => MSG_LOAD_FAILED,
        }
    }
}
