//! Catalog handlers

use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use super::{CATALOG_ID, CONTENT_TYPE};
use crate::services::CatalogRequest;
use crate::web::{
    AppState,
    extractors::{parse_catalog_extra, resource_id},
    responses::CatalogResponse,
};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub skip: Option<String>,
    pub cursor: Option<String>,
}

impl From<CatalogQuery> for CatalogRequest {
    fn from(query: CatalogQuery) -> Self {
        Self {
            search: query.search,
            genre: query.genre,
            skip: query.skip,
            cursor: query.cursor,
        }
    }
}

/// `GET /catalog/{kind}/{id}.json`, extras may come as query parameters
pub async fn catalog(
    State(state): State<AppState>,
    Path((kind, file)): Path<(String, String)>,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    serve_catalog(&state, &kind, resource_id(&file), query.into()).await
}

/// `GET /catalog/{kind}/{id}/{extra}.json`
///
/// Path parameters arrive percent-decoded, which would let an encoded `&`
/// inside a genre split the extra into extra pairs. The extra segment is
/// therefore taken from the raw request path and each value decoded once.
pub async fn catalog_with_extra(
    State(state): State<AppState>,
    Path((kind, catalog_id, _)): Path<(String, String, String)>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let extra = uri.path().rsplit('/').next().unwrap_or_default();

    let mut request = parse_catalog_extra(extra);
    if request.cursor.is_none() {
        request.cursor = query.cursor;
    }
    serve_catalog(&state, &kind, &catalog_id, request).await
}

async fn serve_catalog(
    state: &AppState,
    kind: &str,
    catalog_id: &str,
    request: CatalogRequest,
) -> Json<CatalogResponse> {
    if kind != CONTENT_TYPE || catalog_id != CATALOG_ID {
        tracing::debug!("Unknown catalog {}/{}", kind, catalog_id);
        return Json(CatalogResponse {
            metas: Vec::new(),
            genres: Vec::new(),
            next_cursor: None,
        });
    }

    let page = state.catalog.query_catalog(&request, &state.user_config).await;
    Json(CatalogResponse {
        metas: page.entries,
        genres: page.genres,
        next_cursor: page.next_cursor,
    })
}
