use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CatalogError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_DATA_DIR: &str = "bollywood-data";
pub const DEFAULT_GENRES_FILE: &str = "genres.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Process-wide settings, built once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub data_dir: PathBuf,
    pub genres_file: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads `TMDB_API_KEY`, `TMDB_API_BASE_URL`, `DATA_DIR`, `GENRES_FILE`
    /// and `TMDB_TIMEOUT_SECS` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("TMDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(CatalogError::ConfigMissing("TMDB_API_KEY"))?;

        let base_url = lookup("TMDB_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match lookup("TMDB_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    CatalogError::InvalidInput(format!(
                        "TMDB_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            base_url,
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            genres_file: lookup("GENRES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GENRES_FILE)),
            request_timeout,
        })
    }
}
