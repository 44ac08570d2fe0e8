//! Catalog query engine
//!
//! Turns a filter/pagination request plus the cached channel set into a page
//! of display-ready [`CatalogEntry`] values enriched with program guide data.
//! Entries are rebuilt on every request so guide text is always current.

use chrono_tz::Tz;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::defaults::CATALOG_PAGE_SIZE;
use crate::config::{Config, UserConfig};
use crate::errors::AppResult;
use crate::models::{CatalogEntry, Channel, Program};
use crate::services::filter_state::{CatalogCursor, CatalogRequest, FilterState};
use crate::services::traits::{ChannelCache, EpgView};
use crate::utils::{format_clock, normalize_id, placeholder_image};

const LIVE_MARKER: &str = "ON AIR";
const STATIC_RELEASE_INFO: &str = "LIVE";
const SQUARE_IMAGE: &str = "500x500";
const WIDE_IMAGE: &str = "1280x720";

/// One page of the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    /// Every genre of the snapshot, not paginated
    pub genres: Vec<String>,
    /// Token for the following page, when there is one
    pub next_cursor: Option<String>,
}

/// Rendering settings that are not part of the per-request user config
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub timezone: Tz,
    pub placeholder_image_base: String,
}

impl CatalogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timezone: config.timezone(),
            placeholder_image_base: config.catalog.placeholder_image_base.clone(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Builds a [`CatalogEntry`] for one channel
#[derive(Clone)]
pub struct CatalogEntryBuilder {
    epg: Arc<dyn EpgView>,
    settings: CatalogSettings,
}

impl CatalogEntryBuilder {
    pub fn new(epg: Arc<dyn EpgView>, settings: CatalogSettings) -> Self {
        Self { epg, settings }
    }

    pub async fn build(&self, channel: &Channel, config: &UserConfig) -> CatalogEntry {
        let tag = config.language_tag();
        let name = match channel.tvg_chno.as_deref().map(str::trim) {
            Some(chno) if !chno.is_empty() => format!("{}. {} [{}]", chno, channel.name, tag),
            _ => format!("{} [{}]", channel.name, tag),
        };

        let icon = match channel.linkage_id() {
            Some(linkage_id) if channel.missing_artwork() => self.epg.channel_icon(linkage_id).await,
            _ => None,
        };
        let artwork = |explicit: &Option<String>, size: &str| {
            explicit
                .clone()
                .or_else(|| icon.clone())
                .unwrap_or_else(|| {
                    placeholder_image(&self.settings.placeholder_image_base, size, &channel.name)
                })
        };
        let poster = artwork(&channel.poster, SQUARE_IMAGE);
        let background = artwork(&channel.background, WIDE_IMAGE);
        let logo = artwork(&channel.logo, SQUARE_IMAGE);

        let (description, release_info) = self.describe(channel, config).await;

        CatalogEntry {
            id: channel.id.clone(),
            kind: "tv".to_string(),
            name,
            description,
            release_info,
            poster,
            background,
            logo,
            poster_shape: "square".to_string(),
            genres: channel.genre.clone(),
        }
    }

    /// Description and release info, guide-derived when a program is on air
    async fn describe(&self, channel: &Channel, config: &UserConfig) -> (String, String) {
        let static_text = || {
            (
                format!("Live channel: {}", channel.name),
                STATIC_RELEASE_INFO.to_string(),
            )
        };

        if !config.epg_enabled {
            return static_text();
        }
        let Some(linkage_id) = channel.linkage_id() else {
            return static_text();
        };

        let normalized = normalize_id(linkage_id);
        let Some(current) = self.epg.current_program(&normalized).await else {
            debug!("No current program for {} ({})", channel.id, normalized);
            return static_text();
        };
        let upcoming = self.epg.upcoming_programs(&normalized).await;

        (
            self.program_block(&current, &upcoming),
            format!("{}: {}", LIVE_MARKER, current.title),
        )
    }

    fn program_block(&self, current: &Program, upcoming: &[Program]) -> String {
        let tz = self.settings.timezone;
        let mut lines = vec![format!("🔴 {}: {}", LIVE_MARKER, current.title)];

        if let Some(description) = current.description.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(description.to_string());
        }
        lines.push(format!(
            "⏰ {} - {}",
            format_clock(current.start, tz),
            format_clock(current.stop, tz)
        ));
        if let Some(category) = current.category.as_deref().filter(|c| !c.trim().is_empty()) {
            lines.push(format!("🏷️ {category}"));
        }

        if !upcoming.is_empty() {
            lines.push(String::new());
            lines.push("NEXT UP:".to_string());
            for program in upcoming {
                lines.push(format!("{} - {}", format_clock(program.start, tz), program.title));
            }
        }

        lines.join("\n")
    }
}

pub struct CatalogQueryEngine {
    cache: Arc<dyn ChannelCache>,
    entries: CatalogEntryBuilder,
    filter_state: FilterState,
}

impl CatalogQueryEngine {
    pub fn new(cache: Arc<dyn ChannelCache>, entries: CatalogEntryBuilder) -> Self {
        Self {
            cache,
            entries,
            filter_state: FilterState::new(),
        }
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    /// Serve one catalog page. Never fails: internal errors are logged and
    /// produce an empty page with an empty genre list.
    pub async fn query_catalog(&self, request: &CatalogRequest, config: &UserConfig) -> CatalogPage {
        match self.try_query_catalog(request, config).await {
            Ok(page) => page,
            Err(e) => {
                error!("Catalog query failed: {}", e);
                CatalogPage::default()
            }
        }
    }

    async fn try_query_catalog(
        &self,
        request: &CatalogRequest,
        config: &UserConfig,
    ) -> AppResult<CatalogPage> {
        let cursor = self.filter_state.resolve(request);
        let snapshot = self.cache.snapshot().await?;

        let filtered = snapshot.filtered(&cursor.filter);
        let page: Vec<&Channel> = filtered
            .iter()
            .skip(cursor.skip)
            .take(CATALOG_PAGE_SIZE)
            .copied()
            .collect();

        debug!(
            "Catalog {:?}: {} matches, serving {} from {}",
            cursor.filter,
            filtered.len(),
            page.len(),
            cursor.skip
        );

        let next_skip = cursor.skip + page.len();
        let next_cursor = (next_skip < filtered.len()).then(|| {
            CatalogCursor {
                filter: cursor.filter.clone(),
                skip: next_skip,
            }
            .encode()
        });

        let entries = join_all(page.iter().map(|channel| self.entries.build(channel, config))).await;

        Ok(CatalogPage {
            entries,
            genres: snapshot.genres().to_vec(),
            next_cursor,
        })
    }

    /// Genre list of the current snapshot, empty when the cache is unavailable
    pub async fn genres(&self) -> Vec<String> {
        match self.cache.snapshot().await {
            Ok(snapshot) => snapshot.genres().to_vec(),
            Err(e) => {
                warn!("Genre lookup failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Catalog entry for a single channel, if it exists in the current snapshot
    pub async fn describe_channel(&self, id: &str, config: &UserConfig) -> Option<CatalogEntry> {
        let snapshot = match self.cache.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Channel lookup for {} failed: {}", id, e);
                return None;
            }
        };
        let channel = snapshot.channel(id)?;
        Some(self.entries.build(channel, config).await)
    }
}
