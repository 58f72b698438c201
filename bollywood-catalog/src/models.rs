use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A category label used to partition the movie cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl Genre {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The static genre reference document: `{"genres": [{id, name}, ...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

impl GenreList {
    pub fn find(&self, genre_id: i64) -> Option<&Genre> {
        self.genres.iter().find(|genre| genre.id == genre_id)
    }
}

/// A movie record exactly as the upstream API returned it.
///
/// Only a handful of fields are ever read; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Movie(pub Map<String, Value>);

impl Movie {
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn title(&self) -> &str {
        self.str_field("title")
    }

    pub fn overview(&self) -> &str {
        self.str_field("overview")
    }

    /// Missing or non-numeric popularity counts as zero.
    pub fn popularity(&self) -> f64 {
        self.0
            .get("popularity")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

/// Contents of one genre cache file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenreMovies {
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u64,
    /// Any other top-level fields from the upstream document (e.g. `page`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenreMovies {
    /// Keeps the first `limit` results and rewrites the totals so the document
    /// describes exactly one page.
    pub fn truncate_to_single_page(&mut self, limit: usize) {
        self.results.truncate(limit);
        self.total_results = self.results.len() as u64;
        self.total_pages = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movie(value: Value) -> Movie {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_movie_accessors() {
        let m = movie(json!({
            "id": 42,
            "title": "Sholay",
            "overview": "Two ex-convicts are hired",
            "popularity": 12.5,
            "poster_path": "/x.jpg"
        }));
        assert_eq!(m.id(), Some(42));
        assert_eq!(m.title(), "Sholay");
        assert_eq!(m.overview(), "Two ex-convicts are hired");
        assert_eq!(m.popularity(), 12.5);
    }

    #[test]
    fn test_movie_missing_fields() {
        let m = movie(json!({ "title": null }));
        assert_eq!(m.id(), None);
        assert_eq!(m.title(), "");
        assert_eq!(m.overview(), "");
        assert_eq!(m.popularity(), 0.0);
    }

    #[test]
    fn test_genre_movies_keeps_unknown_fields() {
        let doc: GenreMovies = serde_json::from_value(json!({
            "page": 1,
            "results": [{ "id": 1 }, { "id": 2 }, { "id": 3 }],
            "total_results": 900,
            "total_pages": 45
        }))
        .unwrap();
        assert_eq!(doc.extra.get("page"), Some(&json!(1)));

        let mut doc = doc;
        doc.truncate_to_single_page(2);
        assert_eq!(doc.results.len(), 2);
        assert_eq!(doc.total_results, 2);
        assert_eq!(doc.total_pages, 1);

        let written = serde_json::to_value(&doc).unwrap();
        assert_eq!(written["page"], json!(1));
        assert_eq!(written["total_results"], json!(2));
    }

    #[test]
    fn test_genre_list_find() {
        let list = GenreList {
            genres: vec![Genre::new(28, "Action"), Genre::new(35, "Comedy")],
        };
        assert_eq!(list.find(35).map(|g| g.name.as_str()), Some("Comedy"));
        assert!(list.find(99).is_none());
    }
}
