//! Relay proxy for stream URLs
//!
//! Streams are re-served through an HTTP relay that takes the upstream URL and
//! its request headers as query parameters. HLS and DASH manifests use the
//! relay's manifest endpoints, everything else the plain stream endpoint.
//! Relay reachability is checked before handing out URLs and the answer is
//! cached for a short while.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::config::UserConfig;
use crate::errors::{StreamError, StreamResult};
use crate::models::{StreamCandidate, StreamDescriptor};
use crate::services::traits::StreamProxy;

const HLS_ENDPOINT: &str = "/proxy/hls/manifest.m3u8";
const MPD_ENDPOINT: &str = "/proxy/mpd/manifest.m3u8";
const STREAM_ENDPOINT: &str = "/proxy/stream";
const HEALTH_ENDPOINT: &str = "/health";

/// Relay endpoint matching the stream's container type
pub fn endpoint_for(stream_url: &str) -> &'static str {
    let path = Url::parse(stream_url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_else(|_| stream_url.to_lowercase());

    if path.ends_with(".m3u8") || path.ends_with(".m3u") {
        HLS_ENDPOINT
    } else if path.ends_with(".mpd") {
        MPD_ENDPOINT
    } else {
        STREAM_ENDPOINT
    }
}

/// Build the relay URL for a candidate. Header parameters are emitted in
/// name order so the same stream always maps to the same URL.
pub fn build_proxy_url(
    proxy_base: &str,
    password: &str,
    candidate: &StreamCandidate,
) -> StreamResult<String> {
    let base = proxy_base.trim().trim_end_matches('/');
    let mut url = Url::parse(&format!("{}{}", base, endpoint_for(&candidate.url)))
        .map_err(|e| StreamError::proxy_failed(&candidate.url, format!("invalid proxy url: {e}")))?;

    let mut headers: Vec<(&String, &String)> = candidate.headers.iter().collect();
    headers.sort_by_key(|(name, _)| name.to_lowercase());

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api_password", password);
        query.append_pair("d", &candidate.url);
        for (name, value) in headers {
            query.append_pair(&format!("h_{}", name.to_lowercase()), value);
        }
    }
    Ok(url.into())
}

pub struct RelayProxy {
    client: reqwest::Client,
    health_check: bool,
    health_ttl: Duration,
    health: Mutex<HashMap<String, (Instant, bool)>>,
}

impl RelayProxy {
    pub fn new(health_timeout: Duration, health_ttl: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(health_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            health_check: true,
            health_ttl,
            health: Mutex::new(HashMap::new()),
        }
    }

    /// Enable or disable the reachability check before building URLs
    pub fn with_health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    async fn is_healthy(&self, base: &str) -> bool {
        if !self.health_check {
            return true;
        }
        if let Some((checked_at, healthy)) = self.health.lock().await.get(base)
            && checked_at.elapsed() < self.health_ttl
        {
            return *healthy;
        }

        let healthy = match self.client.get(format!("{base}{HEALTH_ENDPOINT}")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Proxy health check for {} failed: {}", base, e);
                false
            }
        };
        debug!("Proxy {} healthy: {}", base, healthy);
        self.health
            .lock()
            .await
            .insert(base.to_string(), (Instant::now(), healthy));
        healthy
    }
}

#[async_trait]
impl StreamProxy for RelayProxy {
    async fn proxy(
        &self,
        candidate: &StreamCandidate,
        config: &UserConfig,
    ) -> StreamResult<Vec<StreamDescriptor>> {
        let (Some(base), Some(password)) = (&config.proxy_url, &config.proxy_password) else {
            return Err(StreamError::ProxyNotConfigured);
        };
        if !config.proxy_configured() {
            return Err(StreamError::ProxyNotConfigured);
        }

        let base = base.trim().trim_end_matches('/');
        if !self.is_healthy(base).await {
            return Err(StreamError::proxy_failed(&candidate.url, "proxy is unreachable"));
        }

        let url = build_proxy_url(base, password, candidate)?;
        Ok(vec![StreamDescriptor::new(
            candidate.name.clone(),
            format!("🌐 {} [{}]", candidate.name, config.language_tag()),
            url,
            HashMap::new(),
        )])
    }
}
