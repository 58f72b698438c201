//! On-disk genre cache: one JSON document per genre, named
//! `genre_{id}_{normalized_name}.json`.
//!
//! The fetcher is the only writer. Writes land in a temporary file inside the
//! cache directory and are renamed over the target, so readers always see
//! either the previous document or the new one.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::{Genre, GenreMovies};

const FILE_PREFIX: &str = "genre_";
const FILE_SUFFIX: &str = ".json";

/// Deterministic cache filename for a genre: lowercase name, whitespace runs collapsed to `_`.
pub fn genre_file_name(genre_id: i64, genre_name: &str) -> String {
    let normalized = genre_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{FILE_PREFIX}{genre_id}_{normalized}{FILE_SUFFIX}")
}

fn is_genre_file(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}

#[derive(Debug, Clone)]
pub struct GenreCache {
    dir: PathBuf,
}

impl GenreCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, genre_id: i64, genre_name: &str) -> PathBuf {
        self.dir.join(genre_file_name(genre_id, genre_name))
    }

    /// Loads a genre's document; `CacheFileMissing` if it was never fetched.
    pub async fn load(&self, genre_id: i64, genre_name: &str) -> Result<GenreMovies> {
        let path = self.path_for(genre_id, genre_name);
        match self.try_load_path(&path).await? {
            Some(doc) => Ok(doc),
            None => Err(CatalogError::CacheFileMissing(path)),
        }
    }

    /// Like [`GenreCache::load`] but maps a missing file to `None`.
    pub async fn try_load(&self, genre: &Genre) -> Result<Option<GenreMovies>> {
        self.try_load_path(&self.path_for(genre.id, &genre.name))
            .await
    }

    async fn try_load_path(&self, path: &Path) -> Result<Option<GenreMovies>> {
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CatalogError::io(path, e)),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| CatalogError::CacheFileCorrupt {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Every genre document in the directory, in filename order.
    pub async fn load_all(&self) -> Result<Vec<GenreMovies>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::CacheDirMissing(self.dir.clone()));
            }
            Err(e) => return Err(CatalogError::io(&self.dir, e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CatalogError::io(&self.dir, e))?
        {
            let name = entry.file_name();
            if name.to_str().is_some_and(is_genre_file) {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match self.try_load_path(&path).await? {
                Some(doc) => documents.push(doc),
                // removed between listing and reading
                None => warn!("Cache file {} vanished while loading", path.display()),
            }
        }
        Ok(documents)
    }

    /// Atomically replaces the genre's cache file with `movies`.
    pub async fn store(&self, genre: &Genre, movies: &GenreMovies) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CatalogError::io(&self.dir, e))?;

        let path = self.path_for(genre.id, &genre.name);
        let body = serde_json::to_vec_pretty(movies).map_err(|source| CatalogError::CacheWrite {
            path: path.clone(),
            source,
        })?;

        let file_name = genre_file_name(genre.id, &genre.name);
        let temp_path = self
            .dir
            .join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&temp_path, &body).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(CatalogError::io(&temp_path, e));
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(CatalogError::io(&path, e));
        }

        debug!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(path)
    }
}
