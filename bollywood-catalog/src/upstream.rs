use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{CatalogError, Result};

/// Filters attached to every upstream request so results stay Hindi-language, India-origin.
pub const REGIONAL_FILTERS: [(&str, &str); 2] = [
    ("with_original_language", "hi"),
    ("with_origin_country", "IN"),
];

/// Thin client for the movie database API, shared by the batch fetcher and the server.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::Upstream {
                endpoint: config.base_url.clone(),
                status: None,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// GET `{base_url}{endpoint}` with `params` plus the API key and regional filters,
    /// returning the parsed JSON body.
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let query = self.merged_query(params);
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {} ({} params)", url, query.len());

        let upstream_error = |status: Option<u16>, message: String| CatalogError::Upstream {
            endpoint: endpoint.to_string(),
            status,
            message,
        };

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| upstream_error(None, format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream {} answered {}", endpoint, status);
            return Err(upstream_error(
                Some(status.as_u16()),
                format!("HTTP {}", status),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| upstream_error(None, format!("invalid JSON body: {}", e.without_url())))
    }

    /// First page of a genre's movies, most popular first.
    pub async fn discover_by_genre(&self, genre_id: i64, page: u32) -> Result<Value> {
        self.get(
            "/discover/movie",
            &[
                ("page", page.to_string()),
                ("with_genres", genre_id.to_string()),
                ("sort_by", "popularity.desc".to_string()),
            ],
        )
        .await
    }

    /// Movie detail with credits and videos appended.
    pub async fn movie_details(&self, movie_id: i64) -> Result<Value> {
        self.get(
            &format!("/movie/{}", movie_id),
            &[("append_to_response", "credits,videos".to_string())],
        )
        .await
    }

    /// Caller parameters first; the fixed filters win on key collisions.
    fn merged_query(&self, params: &[(&str, String)]) -> Vec<(String, String)> {
        let mut fixed: Vec<(&str, &str)> = vec![("api_key", self.api_key.as_str())];
        fixed.extend(REGIONAL_FILTERS);

        params
            .iter()
            .filter(|(key, _)| !fixed.iter().any(|(fixed_key, _)| fixed_key == key))
            .map(|(key, value)| (key.to_string(), value.clone()))
            .chain(fixed.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Stand-in for the movie database: echoes query parameters back and knows
    /// genres 28 and 35 plus movie 42.
    pub(crate) async fn spawn_fake_upstream() -> String {
        async fn discover(
            Query(params): Query<HashMap<String, String>>,
        ) -> std::result::Result<Json<Value>, StatusCode> {
            if params.get("api_key").map(String::as_str) != Some("test-key") {
                return Err(StatusCode::UNAUTHORIZED);
            }
            let genre: i64 = params
                .get("with_genres")
                .and_then(|g| g.parse().ok())
                .ok_or(StatusCode::BAD_REQUEST)?;
            match genre {
                28 => {
                    let results: Vec<Value> = (0..25)
                        .map(|i| json!({ "id": 1000 + i, "title": format!("Action {i}"), "popularity": 100 - i }))
                        .collect();
                    Ok(Json(json!({
                        "page": 1,
                        "results": results,
                        "total_results": 500,
                        "total_pages": 20,
                        "echo": params,
                    })))
                }
                35 => Ok(Json(json!({
                    "page": 1,
                    "results": [{ "id": 7, "title": "Golmaal", "popularity": 5.0 }],
                    "total_results": 1,
                    "total_pages": 1,
                }))),
                // genre without a results array
                99 => Ok(Json(json!({ "status_message": "nothing here" }))),
                _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
            }
        }

        async fn movie(
            Path(id): Path<i64>,
            Query(params): Query<HashMap<String, String>>,
        ) -> std::result::Result<Json<Value>, StatusCode> {
            match id {
                42 => Ok(Json(json!({
                    "id": 42,
                    "title": "Lagaan",
                    "credits": { "cast": [] },
                    "videos": { "results": [] },
                    "echo": params,
                }))),
                503 => Err(StatusCode::SERVICE_UNAVAILABLE),
                _ => Err(StatusCode::NOT_FOUND),
            }
        }

        let app = Router::new()
            .route("/3/discover/movie", get(discover))
            .route("/3/movie/{id}", get(movie));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/3", addr)
    }

    pub(crate) fn test_config(base_url: &str) -> Config {
        Config {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            data_dir: "unused".into(),
            genres_file: "unused".into(),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_fixed_filters_override_caller_params() {
        let client = TmdbClient::new(&test_config("http://localhost")).unwrap();
        let query = client.merged_query(&[
            ("page", "2".to_string()),
            ("with_origin_country", "US".to_string()),
        ]);

        let as_map: HashMap<_, _> = query.iter().cloned().collect();
        assert_eq!(query.len(), 4);
        assert_eq!(as_map["page"], "2");
        assert_eq!(as_map["with_origin_country"], "IN");
        assert_eq!(as_map["with_original_language"], "hi");
        assert_eq!(as_map["api_key"], "test-key");
    }

    #[tokio::test]
    async fn test_discover_sends_regional_filters() {
        let base = spawn_fake_upstream().await;
        let client = TmdbClient::new(&test_config(&base)).unwrap();

        let body = client.discover_by_genre(28, 1).await.unwrap();
        let echo = &body["echo"];
        assert_eq!(echo["with_original_language"], "hi");
        assert_eq!(echo["with_origin_country"], "IN");
        assert_eq!(echo["sort_by"], "popularity.desc");
        assert_eq!(echo["page"], "1");
        assert_eq!(echo["with_genres"], "28");
    }

    #[tokio::test]
    async fn test_movie_details_appends_sub_resources() {
        let base = spawn_fake_upstream().await;
        let client = TmdbClient::new(&test_config(&base)).unwrap();

        let body = client.movie_details(42).await.unwrap();
        assert_eq!(body["title"], "Lagaan");
        assert_eq!(body["echo"]["append_to_response"], "credits,videos");
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let base = spawn_fake_upstream().await;
        let client = TmdbClient::new(&test_config(&base)).unwrap();

        let err = client.movie_details(999_999_999).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(404));

        let err = client.movie_details(503).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[tokio::test]
    async fn test_transport_failure_has_no_status() {
        // Nothing listens on the discard port.
        let client = TmdbClient::new(&test_config("http://127.0.0.1:9")).unwrap();
        let err = client.discover_by_genre(28, 1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Upstream { status: None, .. }));
    }
}
