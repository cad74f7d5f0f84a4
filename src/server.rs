//! Liveness HTTP endpoint for external process supervisors.

use axum::{Json, Router, response::IntoResponse, routing::get};

/// Build the router serving `GET /health`.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}
