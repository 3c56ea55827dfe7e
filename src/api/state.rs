use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::models::SessionRecord;
use crate::services::providers::{CompletionProvider, MovieCatalog};

/// Shared application state
///
/// Providers are injected behind trait objects so endpoint tests can mount
/// the router over stubs. The session map is the only mutable state and
/// belongs to this layer alone; the scoring and aggregation services never
/// see it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<dyn MovieCatalog>,
    pub completions: Arc<dyn CompletionProvider>,
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        completions: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            config,
            catalog,
            completions,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
