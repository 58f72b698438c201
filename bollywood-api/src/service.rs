use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};
use bollywood_catalog::{
    CatalogError, Config, GenreCache, Movie, Page, Pagination, TmdbClient, genres, search_movies,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::models::{AllGenresParams, AllGenresResponse, GenreWithMovies, PageParams, SearchParams};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn error_response(status: StatusCode, kind: &str, detail: &str) -> ApiError {
    (status, Json(json!({ "error": kind, "detail": detail })))
}

fn bad_request_error(detail: &str) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, "bad_request", detail)
}

/// Malformed path or query parameters still answer with the JSON error body.
fn rejected_params(rejection: impl std::fmt::Display) -> ApiError {
    bad_request_error(&rejection.to_string())
}

fn not_found_error(detail: &str) -> ApiError {
    error_response(StatusCode::NOT_FOUND, "not_found", detail)
}

fn internal_error(message: &str, e: &CatalogError) -> ApiError {
    error!("{}: {}", message, e);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        &format!("{}: {}", message, e),
    )
}

/// Maps a catalog failure onto the HTTP status the client should see.
fn catalog_error(message: &str, e: CatalogError) -> ApiError {
    match &e {
        CatalogError::InvalidInput(detail) => bad_request_error(detail),
        CatalogError::CacheFileMissing(_) => not_found_error(&format!("{}: {}", message, e)),
        CatalogError::Upstream {
            status: Some(status),
            ..
        } => {
            let status =
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            warn!("{}: {}", message, e);
            error_response(status, "upstream_error", &format!("TMDB API error: {}", e))
        }
        CatalogError::Upstream { status: None, .. } => {
            error!("{}: {}", message, e);
            error_response(
                StatusCode::BAD_GATEWAY,
                "upstream_unavailable",
                &format!("TMDB API error: {}", e),
            )
        }
        _ => internal_error(message, &e),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: TmdbClient,
    pub cache: GenreCache,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, CatalogError> {
        let tmdb = TmdbClient::new(&config)?;
        let cache = GenreCache::new(config.data_dir.clone());
        Ok(Self {
            config: Arc::new(config),
            tmdb,
            cache,
        })
    }
}

pub fn create_app(config: Config) -> Result<Router, CatalogError> {
    let app_state = AppState::new(config)?;
    Ok(build_router(app_state))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/genres", get(list_genres))
        .route("/movies/genre/{genre_id}", get(movies_by_genre))
        .route("/movies/all-genres", get(all_genres_with_movies))
        .route("/movies/search", get(search))
        .route("/movie/{movie_id}", get(movie_details))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to BollywoodVerse API" }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_genres(State(state): State<AppState>) -> ApiResult<Value> {
    genres::load_genre_document(&state.config.genres_file)
        .await
        .map(Json)
        .map_err(|e| internal_error("Failed to load genres", &e))
}

async fn movies_by_genre(
    State(state): State<AppState>,
    genre_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Page<Movie>> {
    let Path(genre_id) = genre_id.map_err(rejected_params)?;
    let Query(params) = params.map_err(rejected_params)?;
    let pagination = Pagination::new(params.page, params.per_page)
        .map_err(|e| catalog_error("Invalid pagination", e))?;

    let genre_name = genres::genre_name(&state.config.genres_file, genre_id).await;
    info!("Loading movies for genre {} ({})", genre_id, genre_name);

    let movies = state
        .cache
        .load(genre_id, &genre_name)
        .await
        .map_err(|e| match e {
            CatalogError::CacheFileMissing(_) => {
                not_found_error(&format!("No movies found for genre ID {}", genre_id))
            }
            other => catalog_error(
                &format!("Failed to load movies for genre {}", genre_id),
                other,
            ),
        })?;

    Ok(Json(pagination.apply(&movies.results)))
}

async fn all_genres_with_movies(
    State(state): State<AppState>,
    params: Result<Query<AllGenresParams>, QueryRejection>,
) -> ApiResult<AllGenresResponse> {
    let Query(params) = params.map_err(rejected_params)?;
    let failed = |e: CatalogError| internal_error("Failed to load all genres with movies", &e);

    let genre_list = genres::load_genres(&state.config.genres_file)
        .await
        .map_err(failed)?;

    let mut genres = Vec::new();
    for genre in genre_list.genres {
        let Some(mut movies) = state.cache.try_load(&genre).await.map_err(failed)? else {
            continue;
        };
        movies.results.truncate(params.limit_per_genre);
        genres.push(GenreWithMovies {
            id: genre.id,
            name: genre.name,
            movies: movies.results,
        });
    }

    Ok(Json(AllGenresResponse { genres }))
}

async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Page<Movie>> {
    let Query(params) = params.map_err(rejected_params)?;
    let pagination = Pagination::new(params.page, params.per_page)
        .map_err(|e| catalog_error("Invalid pagination", e))?;

    let documents = state
        .cache
        .load_all()
        .await
        .map_err(|e| catalog_error("Failed to search movies", e))?;

    let matches = search_movies(&documents, &params.query);
    info!(
        "Search {:?} matched {} movies across {} genre files",
        params.query,
        matches.len(),
        documents.len()
    );

    Ok(Json(pagination.apply(&matches)))
}

async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> ApiResult<Value> {
    let id: i64 = movie_id
        .trim()
        .parse()
        .map_err(|_| bad_request_error(&format!("Invalid movie ID format: {}", movie_id)))?;

    match state.tmdb.movie_details(id).await {
        Ok(details) => Ok(Json(details)),
        Err(e) if e.upstream_status() == Some(404) => {
            Err(not_found_error(&format!("Movie with ID {} not found", id)))
        }
        Err(e) => Err(catalog_error("Failed to load movie details", e)),
    }
}
