//! Pre-fetches the most popular movies of every genre into the cache directory.
//!
//! Usage: TMDB_API_KEY=key cargo run --bin fetch-genre-movies -- --per-genre-limit 20

use std::path::PathBuf;

use anyhow::Context;
use bollywood_catalog::{
    Config, GenreCache, TmdbClient, fetch_all_genre_movies, fetcher::DEFAULT_PER_GENRE_LIMIT,
    genres::load_genres,
};
use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "fetch-genre-movies")]
#[command(about = "Fetch the top movies for each genre and store them as JSON files")]
struct Args {
    /// Number of movies kept per genre
    #[arg(long, default_value_t = DEFAULT_PER_GENRE_LIMIT)]
    per_genre_limit: usize,

    /// Cache directory (overrides DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Genre reference file (overrides GENRES_FILE)
    #[arg(long)]
    genres_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    dotenvy::dotenv().ok();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(genres_file) = args.genres_file {
        config.genres_file = genres_file;
    }

    let genre_list = load_genres(&config.genres_file)
        .await
        .inspect_err(|e| error!("Error loading genres file: {}", e))
        .context("Error loading genres file")?;

    let client = TmdbClient::new(&config).context("Failed to create TMDB client")?;
    let cache = GenreCache::new(config.data_dir.clone());

    info!("Starting to fetch movies by genre into {}", cache.dir().display());
    let report = fetch_all_genre_movies(&client, &cache, &genre_list.genres, args.per_genre_limit).await;

    if report.is_complete() {
        info!("All genre data has been successfully fetched and stored!");
    } else {
        for failed in &report.failed {
            warn!("Genre {} ({}) was not refreshed: {}", failed.genre.name, failed.genre.id, failed.error);
        }
    }

    Ok(())
}
