//! Catalog filter carry-over and pagination cursors
//!
//! Clients page through a filtered catalog by sending only `skip` on follow-up
//! requests, so the last filter is remembered in a deployment-wide slot:
//!
//! - a new `search` or `genre` value replaces the stored filter
//! - `skip` without a filter value reuses the stored filter
//! - neither clears it
//!
//! The slot is shared by every client. Responses therefore also carry a
//! [`CatalogCursor`]; a request echoing one back is resolved from the cursor
//! alone and leaves the shared slot untouched.

use std::sync::Mutex;
use tracing::debug;

use crate::cache::ChannelFilter;

const GENRE_SKIP_MARKER: &str = "&skip=";

/// Raw catalog request parameters as received from the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRequest {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub skip: Option<String>,
    pub cursor: Option<String>,
}

impl CatalogRequest {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
            ..Self::default()
        }
    }

    pub fn with_skip(mut self, skip: impl ToString) -> Self {
        self.skip = Some(skip.to_string());
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

/// Filter and offset a catalog request resolves to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogCursor {
    pub filter: ChannelFilter,
    pub skip: usize,
}

impl CatalogCursor {
    /// Opaque token form: `<kind>:<percent-encoded value>:<skip>`
    pub fn encode(&self) -> String {
        let (kind, value) = match &self.filter {
            ChannelFilter::None => ("n", ""),
            ChannelFilter::Search(term) => ("s", term.as_str()),
            ChannelFilter::Genre(genre) => ("g", genre.as_str()),
        };
        format!("{}:{}:{}", kind, urlencoding::encode(value), self.skip)
    }

    /// Decode a token; malformed tokens yield `None`
    pub fn decode(token: &str) -> Option<Self> {
        let mut parts = token.splitn(3, ':');
        let kind = parts.next()?;
        let value = urlencoding::decode(parts.next()?).ok()?.into_owned();
        let skip = parts.next()?.parse().ok()?;

        let filter = match kind {
            "n" => ChannelFilter::None,
            "s" if !value.is_empty() => ChannelFilter::Search(value),
            "g" if !value.is_empty() => ChannelFilter::Genre(value),
            _ => return None,
        };
        Some(Self { filter, skip })
    }
}

/// Parse `skip`, defaulting malformed or negative values to zero
pub fn parse_skip(skip: Option<&str>) -> usize {
    skip.and_then(|s| s.trim().parse::<usize>().ok()).unwrap_or(0)
}

/// Split `"<genre>&skip=<n>"` into the clean genre and the embedded skip
pub fn split_genre_skip(genre: &str) -> (String, Option<usize>) {
    match genre.split_once(GENRE_SKIP_MARKER) {
        Some((clean, skip)) => (clean.to_string(), Some(parse_skip(Some(skip)))),
        None => (genre.to_string(), None),
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The deployment-wide "last filter" slot
#[derive(Debug, Default)]
pub struct FilterState {
    last: Mutex<ChannelFilter>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently stored filter
    pub fn last_filter(&self) -> ChannelFilter {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn store(&self, filter: ChannelFilter) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = filter;
    }

    /// Resolve a request into the filter and offset to serve, updating the
    /// shared slot according to the carry-over rules.
    pub fn resolve(&self, request: &CatalogRequest) -> CatalogCursor {
        let mut skip = parse_skip(non_blank(&request.skip));
        let mut skip_present = non_blank(&request.skip).is_some();

        let genre = non_blank(&request.genre).map(|raw| {
            let (clean, embedded_skip) = split_genre_skip(raw);
            if let Some(embedded) = embedded_skip {
                skip = embedded;
                skip_present = true;
            }
            clean
        });
        let genre = genre.filter(|g| !g.trim().is_empty());

        if let Some(search) = non_blank(&request.search) {
            let filter = ChannelFilter::Search(search.to_string());
            self.store(filter.clone());
            return CatalogCursor { filter, skip };
        }

        if let Some(genre) = genre {
            let filter = ChannelFilter::Genre(genre);
            self.store(filter.clone());
            return CatalogCursor { filter, skip };
        }

        if let Some(cursor) = non_blank(&request.cursor).and_then(CatalogCursor::decode) {
            debug!("Catalog request resolved from cursor {:?}", cursor);
            return CatalogCursor {
                filter: cursor.filter,
                skip: if skip_present { skip } else { cursor.skip },
            };
        }

        if skip_present {
            return CatalogCursor {
                filter: self.last_filter(),
                skip,
            };
        }

        self.store(ChannelFilter::None);
        CatalogCursor {
            filter: ChannelFilter::None,
            skip: 0,
        }
    }
}
