use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::{planner, quiz, session, AppState};

/// Creates the main API router with all routes
///
/// The tools are driven from single-page browser frontends, hence the
/// permissive CORS layer.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Quiz family
        .route("/quiz/classify", post(quiz::classify))
        .route("/quiz/recommendations", post(quiz::recommendations))
        // Planner family
        .route("/planner/reduce", post(planner::reduce))
        .route("/planner/done", post(planner::mark_done))
        // Session state
        .route("/session/:id", get(session::get_session))
}

/// Health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}
