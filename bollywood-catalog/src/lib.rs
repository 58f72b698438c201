pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod genres;
pub mod models;
pub mod query;
pub mod upstream;

// Re-export commonly used types
pub use cache::{GenreCache, genre_file_name};
pub use config::Config;
pub use error::{CatalogError, Result};
pub use fetcher::{FetchReport, fetch_all_genre_movies};
pub use models::{Genre, GenreList, GenreMovies, Movie};
pub use query::{Page, Pagination, search_movies};
pub use upstream::TmdbClient;
