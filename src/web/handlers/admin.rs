//! Administrative handlers

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::errors::AppError;
use crate::web::{AppState, responses::handle_error};

/// `POST /admin/regenerate`: rebuild the playlist and reload the cache
pub async fn regenerate(State(state): State<AppState>) -> Response {
    match state.regeneration.run().await {
        Ok(report) => Json(json!({
            "success": true,
            "channels": report.channel_count,
        }))
        .into_response(),
        Err(e) => handle_error(AppError::from(e)),
    }
}
