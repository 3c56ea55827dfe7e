use serde::Deserialize;

/// Application configuration loaded from environment variables
///
/// Secrets are optional at startup: requests that need a missing key fail
/// with a credential error before any network call, so the quiz endpoints
/// stay usable without a completion key and vice versa.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key (v3 auth)
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// API key for the completion provider
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Completion API base URL (any OpenAI-compatible endpoint)
    #[serde(default = "default_completions_api_url")]
    pub completions_api_url: String,

    /// Default model for goal reduction when the request names none
    #[serde(default = "default_completions_model")]
    pub completions_model: String,

    /// Redis connection URL; unset runs without the discover-page cache
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Primary locale for catalog text
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Fallback locale used when the primary under-fills a result set
    #[serde(default = "default_fallback_locale")]
    pub fallback_locale: String,

    /// Release region for catalog availability and ranking
    #[serde(default = "default_region")]
    pub region: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_completions_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_completions_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_locale() -> String {
    "ko-KR".to_string()
}

fn default_fallback_locale() -> String {
    "en-US".to_string()
}

fn default_region() -> String {
    "KR".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
