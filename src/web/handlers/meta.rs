//! Meta handler

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use super::CONTENT_TYPE;
use crate::web::{AppState, extractors::resource_id, responses::MetaResponse};

/// `GET /meta/{kind}/{id}.json`
pub async fn meta(
    State(state): State<AppState>,
    Path((kind, file)): Path<(String, String)>,
) -> impl IntoResponse {
    let meta = if kind == CONTENT_TYPE {
        state
            .catalog
            .describe_channel(resource_id(&file), &state.user_config)
            .await
    } else {
        None
    };
    Json(MetaResponse { meta })
}
