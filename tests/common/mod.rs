//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use live_catalog::cache::PlaylistCache;
use live_catalog::config::UserConfig;
use live_catalog::epg::GuideStore;
use live_catalog::errors::{StreamError, StreamResult};
use live_catalog::models::{
    Channel, ResolvedStream, StreamCandidate, StreamDescriptor, StreamUrl,
};
use live_catalog::services::{
    CatalogEntryBuilder, CatalogQueryEngine, CatalogSettings, PlaylistRegenerator,
    RegenerationReport, StreamProxy, StreamResolutionPipeline, StreamResolver,
};

pub fn channel(id: &str, name: &str, genres: &[&str]) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        genre: genres.iter().map(|g| g.to_string()).collect(),
        poster: None,
        background: None,
        logo: None,
        stream_urls: vec![],
        tvg_id: None,
        tvg_chno: None,
    }
}

pub fn stream_url(url: &str) -> StreamUrl {
    StreamUrl {
        url: url.to_string(),
        name: None,
        headers: HashMap::new(),
    }
}

/// `count` channels named `Channel NNN`, alternating Sport and News genres
pub fn numbered_channels(count: usize) -> Vec<Channel> {
    (0..count)
        .map(|i| {
            let genre = if i % 2 == 0 { "Sport" } else { "News" };
            channel(&format!("ch-{i:03}"), &format!("Channel {i:03}"), &[genre])
        })
        .collect()
}

pub fn catalog_engine(channels: Vec<Channel>) -> CatalogQueryEngine {
    CatalogQueryEngine::new(
        Arc::new(PlaylistCache::from_channels(channels)),
        entry_builder(),
    )
}

pub fn entry_builder() -> CatalogEntryBuilder {
    CatalogEntryBuilder::new(Arc::new(GuideStore::empty()), CatalogSettings::default())
}

pub fn proxy_config() -> UserConfig {
    UserConfig {
        proxy_url: Some("http://relay:8888".to_string()),
        proxy_password: Some("secret".to_string()),
        ..UserConfig::default()
    }
}

pub fn resolver_config() -> UserConfig {
    UserConfig {
        resolver_enabled: true,
        resolver_script: Some("/opt/resolver.py".into()),
        ..UserConfig::default()
    }
}

/// Resolver returning a fixed answer and counting calls
pub struct FakeResolver {
    answer: Result<Vec<ResolvedStream>, String>,
    pub calls: AtomicUsize,
}

impl FakeResolver {
    pub fn returning(streams: Vec<ResolvedStream>) -> Self {
        Self {
            answer: Ok(streams),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamResolver for FakeResolver {
    async fn resolve(
        &self,
        _urls: &[StreamUrl],
        _config: &UserConfig,
    ) -> StreamResult<Vec<ResolvedStream>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .map_err(StreamError::resolver_failed)
    }
}

pub fn resolved(name: &str, url: &str) -> ResolvedStream {
    ResolvedStream {
        name: name.to_string(),
        title: format!("🔄 {name}"),
        url: url.to_string(),
        headers: None,
    }
}

/// Proxy yielding one `<url>#proxied` variant per candidate; listed URLs fail
pub struct FakeProxy {
    failing_urls: Vec<String>,
}

impl FakeProxy {
    pub fn new() -> Self {
        Self {
            failing_urls: Vec::new(),
        }
    }

    pub fn failing_for(urls: &[&str]) -> Self {
        Self {
            failing_urls: urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

pub fn proxied(url: &str) -> String {
    format!("{url}#proxied")
}

#[async_trait]
impl StreamProxy for FakeProxy {
    async fn proxy(
        &self,
        candidate: &StreamCandidate,
        config: &UserConfig,
    ) -> StreamResult<Vec<StreamDescriptor>> {
        if !config.proxy_configured() {
            return Err(StreamError::ProxyNotConfigured);
        }
        if self.failing_urls.contains(&candidate.url) {
            return Err(StreamError::proxy_failed(&candidate.url, "relay refused"));
        }
        Ok(vec![StreamDescriptor::new(
            candidate.name.clone(),
            format!("🌐 {}", candidate.name),
            proxied(&candidate.url),
            HashMap::new(),
        )])
    }
}

pub fn pipeline(
    channels: Vec<Channel>,
    resolver: Arc<dyn StreamResolver>,
    proxy: Arc<dyn StreamProxy>,
) -> StreamResolutionPipeline {
    StreamResolutionPipeline::new(
        Arc::new(PlaylistCache::from_channels(channels)),
        resolver,
        proxy,
        entry_builder(),
    )
}

pub fn urls(streams: &[StreamDescriptor]) -> Vec<String> {
    streams.iter().map(|s| s.url.clone()).collect()
}

/// Regenerator with a canned outcome
pub struct FixedRegenerator {
    channel_count: Option<usize>,
}

impl FixedRegenerator {
    pub fn succeeding(channel_count: usize) -> Self {
        Self {
            channel_count: Some(channel_count),
        }
    }

    pub fn failing() -> Self {
        Self { channel_count: None }
    }
}

#[async_trait]
impl PlaylistRegenerator for FixedRegenerator {
    async fn regenerate(&self) -> StreamResult<RegenerationReport> {
        match self.channel_count {
            Some(channel_count) => Ok(RegenerationReport { channel_count }),
            None => Err(StreamError::regeneration_failed("generator exited with status 1")),
        }
    }
}
