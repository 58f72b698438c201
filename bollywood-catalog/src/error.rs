use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Missing required configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Upstream request to {endpoint} failed: {message}")]
    Upstream {
        endpoint: String,
        /// HTTP status reported by the upstream API, `None` for transport failures.
        status: Option<u16>,
        message: String,
    },

    #[error("Cache file not found: {}", .0.display())]
    CacheFileMissing(PathBuf),

    #[error("Cache file {} is corrupt: {source}", .path.display())]
    CacheFileCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode cache file {}: {source}", .path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache directory not found: {}", .0.display())]
    CacheDirMissing(PathBuf),

    #[error("Genre reference {} is unusable: {reason}", .path.display())]
    GenreReference { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// Status code the upstream API answered with, if the failure got that far.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            CatalogError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
