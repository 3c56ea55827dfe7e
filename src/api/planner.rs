use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::SessionRecord,
    services::planner,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ReduceRequest {
    pub goal: String,
    /// Overrides the configured completion model
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReduceResponse {
    pub session_id: Uuid,
    pub micro_action: String,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkDoneRequest {
    pub session_id: Uuid,
}

// Handlers

/// Reduces a goal to one micro action and remembers it for the session
pub async fn reduce(
    State(state): State<AppState>,
    Json(request): Json<ReduceRequest>,
) -> AppResult<Json<ReduceResponse>> {
    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.config.completions_model.clone());

    let micro_action =
        planner::reduce_goal(state.completions.as_ref(), &request.goal, &model).await?;

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    {
        let mut sessions = state.sessions.write().await;
        let record = sessions
            .entry(session_id)
            .or_insert_with(|| SessionRecord::new(session_id));
        record.micro_action = Some(micro_action.clone());
        record.micro_action_done = false;
        record.updated_at = Utc::now();
    }

    Ok(Json(ReduceResponse {
        session_id,
        micro_action,
        model,
    }))
}

/// Marks the session's current micro action as done
pub async fn mark_done(
    State(state): State<AppState>,
    Json(request): Json<MarkDoneRequest>,
) -> AppResult<Json<SessionRecord>> {
    let mut sessions = state.sessions.write().await;

    let record = sessions
        .get_mut(&request.session_id)
        .ok_or_else(|| AppError::NotFound(format!("No session {}", request.session_id)))?;

    if record.micro_action.is_none() {
        return Err(AppError::InvalidInput(
            "Session has no micro action to mark done".to_string(),
        ));
    }

    record.micro_action_done = true;
    record.updated_at = Utc::now();

    Ok(Json(record.clone()))
}
