//! Visitor-facing routes

use axum::{Json, extract::State, response::IntoResponse};

use crate::state::AppState;
use crate::view::PublicContent;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// GET /api/content
pub async fn content(State(state): State<AppState>) -> Json<PublicContent> {
    let content = state.store.snapshot().await;
    Json(PublicContent::from(&*content))
}
