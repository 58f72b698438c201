use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::models::GenreList;

/// Name used when a genre id is not in the reference list.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Reads and parses the reference file once, returning both the verbatim
/// document and its typed `{genres: [{id, name}]}` view.
async fn read_reference(path: &Path) -> Result<(Value, GenreList)> {
    let reference_error = |reason: String| CatalogError::GenreReference {
        path: path.to_path_buf(),
        reason,
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| reference_error(e.to_string()))?;
    let document: Value =
        serde_json::from_str(&raw).map_err(|e| reference_error(format!("invalid JSON: {}", e)))?;
    let list = GenreList::deserialize(&document)
        .map_err(|e| reference_error(format!("unexpected shape: {}", e)))?;

    Ok((document, list))
}

/// The reference document verbatim, after checking its shape.
pub async fn load_genre_document(path: &Path) -> Result<Value> {
    read_reference(path).await.map(|(document, _)| document)
}

pub async fn load_genres(path: &Path) -> Result<GenreList> {
    read_reference(path).await.map(|(_, list)| list)
}

/// Resolves a genre id to its display name, falling back to [`UNKNOWN_GENRE`]
/// when the reference file is unreadable or does not list the id.
pub async fn genre_name(path: &Path, genre_id: i64) -> String {
    match load_genres(path).await {
        Ok(list) => list
            .find(genre_id)
            .map(|genre| genre.name.clone())
            .unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
        Err(e) => {
            tracing::debug!("Genre lookup for {} fell back to {}: {}", genre_id, UNKNOWN_GENRE, e);
            UNKNOWN_GENRE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn write_reference(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("genres.json");
        tokio::fs::write(&path, body).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_genres() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_reference(
            dir.path(),
            r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 10749, "name": "Romance"}]}"#,
        )
        .await;

        let list = load_genres(&path).await.unwrap();
        assert_eq!(list.genres.len(), 2);
        assert_eq!(list.genres[1].name, "Romance");

        let document = load_genre_document(&path).await.unwrap();
        assert_eq!(document["genres"][0], json!({"id": 28, "name": "Action"}));
    }

    #[tokio::test]
    async fn test_document_and_list_come_from_one_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_reference(
            dir.path(),
            r#"{"genres": [{"id": 18, "name": "Drama", "slug": "drama"}], "source": "tmdb"}"#,
        )
        .await;

        let (document, list) = read_reference(&path).await.unwrap();
        assert_eq!(document["source"], "tmdb");
        assert_eq!(document["genres"][0]["slug"], "drama");
        assert_eq!(list.genres, vec![crate::models::Genre::new(18, "Drama")]);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_reference() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_genres(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, CatalogError::GenreReference { .. }));

        let path = write_reference(dir.path(), "{ not json").await;
        assert!(matches!(
            load_genre_document(&path).await,
            Err(CatalogError::GenreReference { .. })
        ));

        let path = write_reference(dir.path(), r#"{"genres": [{"id": "x"}]}"#).await;
        assert!(matches!(
            load_genre_document(&path).await,
            Err(CatalogError::GenreReference { .. })
        ));
    }

    #[tokio::test]
    async fn test_genre_name_falls_back_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_reference(dir.path(), r#"{"genres": [{"id": 35, "name": "Comedy"}]}"#).await;

        assert_eq!(genre_name(&path, 35).await, "Comedy");
        assert_eq!(genre_name(&path, 1).await, UNKNOWN_GENRE);
        assert_eq!(genre_name(&dir.path().join("gone.json"), 35).await, UNKNOWN_GENRE);
    }
}
