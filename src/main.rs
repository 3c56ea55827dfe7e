use std::sync::Arc;

use reelsteps_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
    services::providers::{OpenAiCompletions, TmdbCatalog},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration and logging
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelsteps_api=info,tower_http=info".into()),
        )
        .init();

    // The page cache is advisory: without a Redis URL every catalog call
    // goes straight to the provider.
    let mut cache_writer = None;
    let cache = match config.redis_url.as_deref() {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            let (cache, writer) = Cache::new(client).await;
            cache_writer = Some(writer);
            tracing::info!("Discover-page cache enabled");
            Some(cache)
        }
        None => {
            tracing::info!("No REDIS_URL set, running without the discover-page cache");
            None
        }
    };

    let catalog = Arc::new(TmdbCatalog::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let completions = Arc::new(OpenAiCompletions::new(
        config.openai_api_key.clone(),
        config.completions_api_url.clone(),
    ));

    // Initialize application state and the router
    let state = AppState::new(config.clone(), catalog, completions);
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "reelsteps API listening");

    axum::serve(listener, app).await?;

    // Flush any queued cache writes before exiting.
    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    Ok(())
}
