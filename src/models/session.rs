use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Recommendation, TasteProfile};

/// Per-session tool state owned by the API layer
///
/// Survives re-reads within one session, never a process restart. The core
/// scoring and aggregation functions take plain arguments and return plain
/// values; handlers copy results in and out of this record.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub id: Uuid,
    /// Last reduced micro action, if the planner has run
    pub micro_action: Option<String>,
    /// Whether the user marked the current micro action done
    pub micro_action_done: bool,
    /// Last quiz outcome, if the quiz has run
    pub last_profile: Option<TasteProfile>,
    pub last_recommendations: Vec<Recommendation>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            micro_action: None,
            micro_action_done: false,
            last_profile: None,
            last_recommendations: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}
