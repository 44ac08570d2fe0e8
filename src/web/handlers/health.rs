//! Health check handler

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::web::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let genres = state.catalog.genres().await;
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "genres": genres.len(),
        "timestamp": chrono::Utc::now(),
    }))
}
