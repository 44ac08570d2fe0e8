//! Stream handler

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;

use super::CONTENT_TYPE;
use crate::services::ControlCommand;
use crate::web::{AppState, extractors::resource_id, responses::StreamsResponse};

/// `GET /stream/{kind}/{id}.json`
///
/// Reserved control ids are dispatched to their command before any channel
/// lookup.
pub async fn streams(
    State(state): State<AppState>,
    Path((kind, file)): Path<(String, String)>,
) -> impl IntoResponse {
    let channel_id = resource_id(&file);

    if let Some(command) = ControlCommand::parse(channel_id) {
        info!("Control command {:?} requested via stream endpoint", command);
        let descriptor = state.regeneration.execute(command).await;
        return Json(StreamsResponse {
            streams: vec![descriptor],
        });
    }

    let streams = if kind == CONTENT_TYPE {
        state.streams.resolve_streams(channel_id, &state.user_config).await
    } else {
        Vec::new()
    };
    Json(StreamsResponse { streams })
}
