use anyhow::Context;
use bollywood_api::create_app;
use bollywood_catalog::Config;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(8000);

    info!(
        "Serving cache from {} (genres: {})",
        config.data_dir.display(),
        config.genres_file.display()
    );

    let app = create_app(config)?;
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let addr = listener.local_addr()?;

    info!("BollywoodVerse API starting on {}", addr);
    info!("  GET /genres");
    info!("  GET /movies/genre/{{genre_id}}?page&per_page");
    info!("  GET /movies/all-genres?limit_per_genre");
    info!("  GET /movies/search?query&page&per_page");
    info!("  GET /movie/{{movie_id}}");

    axum::serve(listener, app).await?;

    Ok(())
}
