use bollywood_catalog::{Movie, query::{DEFAULT_PAGE, DEFAULT_PER_PAGE}};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT_PER_GENRE: usize = 5;

fn default_page() -> usize {
    DEFAULT_PAGE
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

fn default_limit_per_genre() -> usize {
    DEFAULT_LIMIT_PER_GENRE
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

#[derive(Debug, Deserialize)]
pub struct AllGenresParams {
    #[serde(default = "default_limit_per_genre")]
    pub limit_per_genre: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenreWithMovies {
    pub id: i64,
    pub name: String,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllGenresResponse {
    pub genres: Vec<GenreWithMovies>,
}
