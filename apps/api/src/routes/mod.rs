pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(handlers::handle_upload).get(handlers::handle_list),
        )
        .route("/api/v1/resumes/:id", get(handlers::handle_get))
        .route(
            "/api/v1/resumes/:id/match",
            post(handlers::handle_match_stored),
        )
        // Stateless analysis API
        .route("/api/v1/analyze/categorize", post(handlers::handle_categorize))
        .route("/api/v1/analyze/match", post(handlers::handle_analyze_match))
        .route("/api/v1/stats", get(handlers::handle_stats))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
