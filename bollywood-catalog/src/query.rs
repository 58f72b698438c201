use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CatalogError, Result};
use crate::models::{GenreMovies, Movie};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 20;

/// One page of a result list together with totals for the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

/// 1-based offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Result<Self> {
        if page < 1 {
            return Err(CatalogError::InvalidInput(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if per_page < 1 {
            return Err(CatalogError::InvalidInput(format!(
                "per_page must be at least 1, got {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    /// Slices `items`; a page past the end yields no results but keeps the totals.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Page<T> {
        let total_results = items.len();
        let start = (self.page - 1).saturating_mul(self.per_page).min(total_results);
        let end = start.saturating_add(self.per_page).min(total_results);

        Page {
            results: items[start..end].to_vec(),
            page: self.page,
            total_pages: total_results.div_ceil(self.per_page),
            total_results,
        }
    }
}

/// Case-insensitive substring search over title and overview across every cached genre.
///
/// Movies are deduplicated by id (the last copy wins, keeping the position of the first),
/// then ordered by descending popularity. The sort is stable, so ties keep load order.
pub fn search_movies(documents: &[GenreMovies], query: &str) -> Vec<Movie> {
    let mut unique: IndexMap<i64, &Movie> = IndexMap::new();
    for movie in documents.iter().flat_map(|doc| doc.results.iter()) {
        match movie.id() {
            Some(id) => {
                unique.insert(id, movie);
            }
            None => warn!("Skipping cached movie without a numeric id"),
        }
    }

    let needle = query.to_lowercase();
    let mut matches: Vec<Movie> = unique
        .into_values()
        .filter(|movie| {
            movie.title().to_lowercase().contains(&needle)
                || movie.overview().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    matches.sort_by(|a, b| b.popularity().total_cmp(&a.popularity()));
    matches
}
