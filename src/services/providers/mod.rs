/// External provider abstractions
///
/// Both outbound integrations sit behind traits so the aggregation and
/// planning logic can be exercised against mocks: a paginated movie catalog
/// (TMDB) and a chat-completion endpoint (any OpenAI-compatible API).
use crate::{
    error::AppResult,
    models::{CatalogMovie, MovieDetails},
};

#[cfg(test)]
use mockall::automock;

pub mod openai;
pub mod tmdb;

pub use openai::OpenAiCompletions;
pub use tmdb::TmdbCatalog;

/// Paginated movie catalog
///
/// `discover_page` mirrors the provider's discovery endpoint for a single
/// genre code: popularity-descending, adult content excluded, 1-based page
/// numbers, page order preserved verbatim. An empty page means the genre
/// has no further results upstream.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn discover_page(
        &self,
        locale: &str,
        region: &str,
        genre_id: u32,
        page: u32,
    ) -> AppResult<Vec<CatalogMovie>>;

    /// Localized detail lookup with appended videos, used to enrich
    /// already-picked recommendations.
    async fn movie_details(&self, locale: &str, movie_id: u64) -> AppResult<MovieDetails>;
}

/// Chat-completion provider for the planner
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one system+user prompt pair and returns the raw completion text
    async fn complete(&self, model: &str, system: &str, user: &str) -> AppResult<String>;
}
