use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{QuizAnswer, Recommendation, SessionRecord, TasteProfile},
    services::{
        classifier,
        recommend::{self, RecommendParams, DEFAULT_TARGET_COUNT},
    },
};

use super::AppState;

/// Upper bound on requested result sizes; the quiz UI asks for 5.
const MAX_TARGET_COUNT: usize = 20;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub answers: Vec<QuizAnswer>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub fallback_locale: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub target_count: Option<usize>,
    /// Fetch localized details and trailer links for the picked titles
    #[serde(default)]
    pub append_details: bool,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub session_id: Uuid,
    pub profile: TasteProfile,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
}

// Handlers

/// Scores an answer sheet without touching the catalog
pub async fn classify(
    Json(request): Json<ClassifyRequest>,
) -> AppResult<Json<TasteProfile>> {
    let profile = classifier::classify(&request.answers)?;
    Ok(Json(profile))
}

/// Full quiz pipeline: score the sheet, aggregate recommendations for the
/// winning category, remember the outcome for the session
pub async fn recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let profile = classifier::classify(&request.answers)?;

    let target_count = request.target_count.unwrap_or(DEFAULT_TARGET_COUNT);
    if target_count == 0 || target_count > MAX_TARGET_COUNT {
        return Err(AppError::InvalidInput(format!(
            "target_count must be between 1 and {}",
            MAX_TARGET_COUNT
        )));
    }

    let locale = request
        .locale
        .unwrap_or_else(|| state.config.locale.clone());
    let fallback_locale = request
        .fallback_locale
        .or_else(|| Some(state.config.fallback_locale.clone()))
        .filter(|fallback| *fallback != locale);

    let params = RecommendParams {
        category: profile.winner,
        locale,
        fallback_locale,
        region: request.region.unwrap_or_else(|| state.config.region.clone()),
        target_count,
    };

    let mut recommendations = recommend::recommend(state.catalog.as_ref(), &params).await?;

    if request.append_details {
        recommend::enrich(state.catalog.as_ref(), &params.locale, &mut recommendations).await;
    }

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    {
        let mut sessions = state.sessions.write().await;
        let record = sessions
            .entry(session_id)
            .or_insert_with(|| SessionRecord::new(session_id));
        record.last_profile = Some(profile.clone());
        record.last_recommendations = recommendations.clone();
        record.updated_at = Utc::now();
    }

    tracing::info!(
        winner = ?profile.winner,
        results = recommendations.len(),
        session_id = %session_id,
        "Quiz pipeline completed"
    );

    Ok(Json(RecommendationsResponse {
        session_id,
        profile,
        recommendations,
        generated_at: Utc::now(),
    }))
}
