//! Addon manifest

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};

use super::{CATALOG_ID, CONTENT_TYPE};
use crate::web::AppState;

pub async fn manifest(State(state): State<AppState>) -> impl IntoResponse {
    let genres = state.catalog.genres().await;
    Json(build_manifest(&genres))
}

pub fn build_manifest(genres: &[String]) -> Value {
    json!({
        "id": "org.livecatalog.tv",
        "version": env!("CARGO_PKG_VERSION"),
        "name": "Live Catalog",
        "description": "Live TV channels with program guide",
        "resources": ["catalog", "meta", "stream"],
        "types": [CONTENT_TYPE],
        "catalogs": [{
            "type": CONTENT_TYPE,
            "id": CATALOG_ID,
            "name": "Live TV",
            "extra": [
                { "name": "genre", "isRequired": false, "options": genres },
                { "name": "search", "isRequired": false },
                { "name": "skip", "isRequired": false }
            ]
        }],
        "behaviorHints": { "configurable": false, "configurationRequired": false }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lists_genres() {
        let manifest = build_manifest(&["Sport".to_string(), "News".to_string()]);
        assert_eq!(manifest["catalogs"][0]["id"], CATALOG_ID);
        assert_eq!(manifest["catalogs"][0]["extra"][0]["options"][1], "News");
    }
}
