use std::path::PathBuf;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::cache::GenreCache;
use crate::error::{CatalogError, Result};
use crate::models::{Genre, GenreMovies};
use crate::upstream::TmdbClient;

pub const DEFAULT_PER_GENRE_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct SavedGenre {
    pub genre: Genre,
    pub path: PathBuf,
    pub movie_count: usize,
}

#[derive(Debug)]
pub struct FailedGenre {
    pub genre: Genre,
    pub error: CatalogError,
}

/// Outcome of a fetch run, one entry per genre.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub saved: Vec<SavedGenre>,
    pub failed: Vec<FailedGenre>,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches the top `per_genre_limit` movies of every genre concurrently and
/// writes one cache file per genre.
///
/// A failing genre is logged and leaves its previous cache file untouched; it
/// never stops the others.
pub async fn fetch_all_genre_movies(
    client: &TmdbClient,
    cache: &GenreCache,
    genres: &[Genre],
    per_genre_limit: usize,
) -> FetchReport {
    info!(
        "Found {} genres. Fetching up to {} movies each",
        genres.len(),
        per_genre_limit
    );

    let outcomes = join_all(
        genres
            .iter()
            .map(|genre| fetch_genre_movies(client, cache, genre, per_genre_limit)),
    )
    .await;

    let mut report = FetchReport::default();
    for (genre, outcome) in genres.iter().zip(outcomes) {
        match outcome {
            Ok(saved) => report.saved.push(saved),
            Err(e) => {
                error!("Skipping genre {} ({}): {}", genre.name, genre.id, e);
                report.failed.push(FailedGenre {
                    genre: genre.clone(),
                    error: e,
                });
            }
        }
    }

    info!(
        "Fetch finished: {} genres saved, {} failed",
        report.saved.len(),
        report.failed.len()
    );
    report
}

pub async fn fetch_genre_movies(
    client: &TmdbClient,
    cache: &GenreCache,
    genre: &Genre,
    per_genre_limit: usize,
) -> Result<SavedGenre> {
    info!(
        "Fetching {} movies for genre: {} (ID: {})",
        per_genre_limit, genre.name, genre.id
    );

    let body = client.discover_by_genre(genre.id, 1).await?;
    if body.get("results").is_none_or(|results| !results.is_array()) {
        warn!("No data found for genre {}", genre.name);
        return Err(CatalogError::Upstream {
            endpoint: "/discover/movie".to_string(),
            status: None,
            message: format!("response for genre {} has no results list", genre.id),
        });
    }

    let mut movies: GenreMovies =
        serde_json::from_value(body).map_err(|e| CatalogError::Upstream {
            endpoint: "/discover/movie".to_string(),
            status: None,
            message: format!("unexpected response shape: {}", e),
        })?;
    movies.truncate_to_single_page(per_genre_limit);

    let path = cache.store(genre, &movies).await?;
    info!("Saved {} movies to {}", movies.results.len(), path.display());

    Ok(SavedGenre {
        genre: genre.clone(),
        path,
        movie_count: movies.results.len(),
    })
}
