/// TMDB catalog provider
///
/// Thin adapter over TMDB's paginated /discover/movie endpoint and the
/// /movie/{id} detail endpoint. Pages are returned verbatim in provider
/// order; all aggregation policy (dedup, poster filter, fallback locale)
/// lives in the caller.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CatalogMovie, DiscoverPage, MovieDetails},
    services::providers::MovieCatalog,
};

/// Discover pages drift slowly; half an hour keeps repeat quizzes cheap.
const DISCOVER_CACHE_TTL: u64 = 1800;
/// Detail payloads are close to immutable.
const DETAILS_CACHE_TTL: u64 = 21600; // 6 hours

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    /// Advisory page cache; `None` runs every call against the API
    cache: Option<Cache>,
}

impl TmdbCatalog {
    pub fn new(cache: Option<Cache>, api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::builder()
                .timeout(REQUEST_TIMEOUT)
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            api_key,
            api_url,
            cache,
        }
    }

    /// Credential precondition, checked before any network attempt
    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::MissingCredential("No TMDB API key configured".to_string())
            })
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn discover_page(
        &self,
        locale: &str,
        region: &str,
        genre_id: u32,
        page: u32,
    ) -> AppResult<Vec<CatalogMovie>> {
        let api_key = self.api_key()?;

        let key = CacheKey::DiscoverPage {
            locale: locale.to_string(),
            region: region.to_string(),
            genre_id,
            page,
        };

        cached!(
            self.cache.as_ref(),
            key,
            DISCOVER_CACHE_TTL,
            async move {
                let url = format!("{}/discover/movie", self.api_url);
                let genre = genre_id.to_string();
                let page_number = page.to_string();

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("api_key", api_key),
                        ("language", locale),
                        ("region", region),
                        ("with_genres", genre.as_str()),
                        ("sort_by", "popularity.desc"),
                        ("include_adult", "false"),
                        ("page", page_number.as_str()),
                    ])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::Upstream(format!(
                        "TMDB discover returned status {}: {}",
                        status, body
                    )));
                }

                let discover: DiscoverPage = response.json().await?;

                tracing::debug!(
                    locale = %locale,
                    region = %region,
                    genre_id = genre_id,
                    page = page,
                    results = discover.results.len(),
                    provider = "tmdb",
                    "Discover page fetched"
                );

                Ok(discover.results)
            }
        )
    }

    async fn movie_details(&self, locale: &str, movie_id: u64) -> AppResult<MovieDetails> {
        let api_key = self.api_key()?;

        let key = CacheKey::MovieDetails {
            locale: locale.to_string(),
            movie_id,
        };

        cached!(
            self.cache.as_ref(),
            key,
            DETAILS_CACHE_TTL,
            async move {
                let url = format!("{}/movie/{}", self.api_url, movie_id);

                let response = self
                    .http_client
                    .get(&url)
                    .query(&[
                        ("api_key", api_key),
                        ("language", locale),
                        ("append_to_response", "videos,credits"),
                    ])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::Upstream(format!(
                        "TMDB details returned status {}: {}",
                        status, body
                    )));
                }

                let details: MovieDetails = response.json().await?;

                tracing::debug!(
                    movie_id = movie_id,
                    locale = %locale,
                    provider = "tmdb",
                    "Movie details fetched"
                );

                Ok(details)
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn discover_body() -> serde_json::Value {
        serde_json::json!({
            "page": 1,
            "results": [
                {"id": 1, "title": "First", "vote_average": 8.1, "overview": "one", "poster_path": "/1.jpg"},
                {"id": 2, "title": "Second", "vote_average": 7.4, "overview": null, "poster_path": null}
            ],
            "total_pages": 3
        })
    }

    #[tokio::test]
    async fn test_discover_page_parses_results_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("with_genres", "18"))
            .and(query_param("page", "1"))
            .and(query_param("language", "ko-KR"))
            .and(query_param("region", "KR"))
            .and(query_param("sort_by", "popularity.desc"))
            .and(query_param("include_adult", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(discover_body()))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(None, Some("test-key".to_string()), server.uri());
        let movies = catalog.discover_page("ko-KR", "KR", 18, 1).await.unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 1);
        assert_eq!(movies[1].id, 2);
        assert!(movies[0].has_poster());
        assert!(!movies[1].has_poster());
    }

    #[tokio::test]
    async fn test_discover_page_non_success_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(None, Some("test-key".to_string()), server.uri());
        let result = catalog.discover_page("ko-KR", "KR", 18, 1).await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_discover_page_without_key_never_calls_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(discover_body()))
            .expect(0)
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(None, None, server.uri());
        let result = catalog.discover_page("ko-KR", "KR", 18, 1).await;

        assert!(matches!(result, Err(AppError::MissingCredential(_))));
    }

    #[tokio::test]
    async fn test_blank_key_is_missing_credential() {
        let catalog = TmdbCatalog::new(None, Some("   ".to_string()), "http://unused".to_string());
        let result = catalog.movie_details("ko-KR", 603).await;

        assert!(matches!(result, Err(AppError::MissingCredential(_))));
    }

    #[tokio::test]
    async fn test_movie_details_appends_videos() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movie/603"))
            .and(query_param("append_to_response", "videos,credits"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 603,
                "title": "The Matrix",
                "overview": "A hacker learns the truth.",
                "videos": {"results": [
                    {"key": "tr1", "site": "YouTube", "type": "Trailer"}
                ]},
                "credits": {"cast": [{"name": "Keanu Reeves"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = TmdbCatalog::new(None, Some("test-key".to_string()), server.uri());
        let details = catalog.movie_details("en-US", 603).await.unwrap();

        assert_eq!(details.id, 603);
        assert_eq!(details.trailer_key(), Some("tr1"));
        assert_eq!(details.top_cast(3), vec!["Keanu Reeves"]);
    }
}
