//! Request path parsing
//!
//! Player clients put every parameter in the path: resources end in `.json`
//! and catalog extras arrive as a `key=value&key=value` segment.

use crate::services::CatalogRequest;

const JSON_SUFFIX: &str = ".json";

/// Strip the `.json` suffix from a path segment
pub fn resource_id(file: &str) -> &str {
    file.strip_suffix(JSON_SUFFIX).unwrap_or(file)
}

fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    urlencoding::decode(&value)
        .map(|v| v.into_owned())
        .unwrap_or(value)
}

/// Parse a catalog extra segment such as `genre=Sport&skip=100.json`.
///
/// Pairs are split before decoding, so an encoded `&skip=` inside the genre
/// value stays part of the genre and is handled by the filter resolution.
pub fn parse_catalog_extra(extra: &str) -> CatalogRequest {
    let mut request = CatalogRequest::default();
    for pair in resource_id(extra).split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = decode_component(value);
        match key {
            "search" => request.search = Some(value),
            "genre" => request.genre = Some(value),
            "skip" => request.skip = Some(value),
            "cursor" => request.cursor = Some(value),
            _ => {}
        }
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id() {
        assert_eq!(resource_id("rai1.json"), "rai1");
        assert_eq!(resource_id("rai1"), "rai1");
    }

    #[test]
    fn test_parse_catalog_extra() {
        let request = parse_catalog_extra("genre=Sport&skip=100.json");
        assert_eq!(request.genre.as_deref(), Some("Sport"));
        assert_eq!(request.skip.as_deref(), Some("100"));
        assert_eq!(request.search, None);
    }

    #[test]
    fn test_parse_catalog_extra_decodes_values() {
        let request = parse_catalog_extra("search=sky+sport%201.json");
        assert_eq!(request.search.as_deref(), Some("sky sport 1"));
    }

    #[test]
    fn test_encoded_skip_stays_in_genre() {
        let request = parse_catalog_extra("genre=Sport%26skip%3D200.json");
        assert_eq!(request.genre.as_deref(), Some("Sport&skip=200"));
        assert_eq!(request.skip, None);
    }

    #[test]
    fn test_unknown_and_malformed_pairs_are_ignored() {
        let request = parse_catalog_extra("foo=bar&skip&search=rai.json");
        assert_eq!(request.search.as_deref(), Some("rai"));
        assert_eq!(request.skip, None);
    }
}
