//! Stream resolution pipeline
//!
//! Produces the ordered list of playable streams for a channel. The fallback
//! policy is an explicit chain of steps:
//!
//! 1. When the resolver is active, ask it for candidates. A non-empty answer
//!    ends the chain with the resolver branch; an empty answer or a failure
//!    falls through.
//! 2. Otherwise build one descriptor per declared URL, pairing each with its
//!    proxied variants.
//!
//! List order is what the player shows, so concurrent proxy calls are always
//! reassembled in source order.

use futures::future::join_all;
use std::collections::HashMap;
use std::iter;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::UserConfig;
use crate::models::{Channel, ResolvedStream, StreamCandidate, StreamDescriptor, StreamUrl};
use crate::services::catalog::CatalogEntryBuilder;
use crate::services::traits::{ChannelCache, StreamProxy, StreamResolver};

const USER_AGENT_HEADER: &str = "User-Agent";

/// Result of one step of the fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome<T> {
    Success(T),
    Empty,
    Failed(String),
}

pub struct StreamResolutionPipeline {
    cache: Arc<dyn ChannelCache>,
    resolver: Arc<dyn StreamResolver>,
    proxy: Arc<dyn StreamProxy>,
    entries: CatalogEntryBuilder,
}

impl StreamResolutionPipeline {
    pub fn new(
        cache: Arc<dyn ChannelCache>,
        resolver: Arc<dyn StreamResolver>,
        proxy: Arc<dyn StreamProxy>,
        entries: CatalogEntryBuilder,
    ) -> Self {
        Self {
            cache,
            resolver,
            proxy,
            entries,
        }
    }

    /// Ordered stream list for a channel. Never fails: an unknown channel or
    /// an unavailable cache yields an empty list.
    pub async fn resolve_streams(&self, channel_id: &str, config: &UserConfig) -> Vec<StreamDescriptor> {
        let snapshot = match self.cache.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Stream lookup for {} failed: {}", channel_id, e);
                return Vec::new();
            }
        };
        let Some(channel) = snapshot.channel(channel_id) else {
            debug!("Channel {} not found", channel_id);
            return Vec::new();
        };

        let streams = self.resolve_channel(channel, config).await;
        info!("Resolved {} streams for {}", streams.len(), channel.id);
        self.attach_channel_header(channel, config, streams).await
    }

    async fn resolve_channel(&self, channel: &Channel, config: &UserConfig) -> Vec<StreamDescriptor> {
        if config.resolver_active() {
            match self.resolver_step(channel, config).await {
                BranchOutcome::Success(resolved) => {
                    return self.resolver_branch(resolved, config).await;
                }
                BranchOutcome::Empty => {
                    info!("Resolver returned nothing for {}, using original streams", channel.id);
                }
                BranchOutcome::Failed(reason) => {
                    warn!(
                        "Resolver failed for {}, using original streams: {}",
                        channel.id, reason
                    );
                }
            }
        }
        self.original_branch(channel, config).await
    }

    pub async fn resolver_step(
        &self,
        channel: &Channel,
        config: &UserConfig,
    ) -> BranchOutcome<Vec<ResolvedStream>> {
        match self.resolver.resolve(&channel.stream_urls, config).await {
            Ok(streams) if streams.is_empty() => BranchOutcome::Empty,
            Ok(streams) => BranchOutcome::Success(streams),
            Err(e) => BranchOutcome::Failed(e.to_string()),
        }
    }

    /// Resolver output, optionally followed (or, when forced, replaced) by
    /// proxied variants. Forcing only applies when the proxy is usable.
    async fn resolver_branch(
        &self,
        resolved: Vec<ResolvedStream>,
        config: &UserConfig,
    ) -> Vec<StreamDescriptor> {
        let candidates: Vec<StreamCandidate> = resolved.iter().map(StreamCandidate::from).collect();

        if config.force_proxy {
            if config.proxy_configured() {
                return self.proxy_all(&candidates, config).await.into_iter().flatten().collect();
            }
            warn!("force_proxy is set without proxy credentials, serving resolver streams unproxied");
            return resolved.into_iter().map(StreamDescriptor::from).collect();
        }

        let proxied = if config.proxy_configured() {
            self.proxy_all(&candidates, config).await
        } else {
            Vec::new()
        };

        resolved
            .into_iter()
            .map(StreamDescriptor::from)
            .chain(proxied.into_iter().flatten())
            .collect()
    }

    /// Declared URLs, each directly followed by its proxied variants
    async fn original_branch(&self, channel: &Channel, config: &UserConfig) -> Vec<StreamDescriptor> {
        let originals: Vec<StreamDescriptor> = channel
            .stream_urls
            .iter()
            .map(|stream| original_descriptor(channel, stream, config))
            .collect();
        let candidates: Vec<StreamCandidate> = originals.iter().map(StreamDescriptor::candidate).collect();

        if config.force_proxy {
            if !config.proxy_configured() {
                warn!("force_proxy is set without proxy credentials, no streams for {}", channel.id);
                return Vec::new();
            }
            return self.proxy_all(&candidates, config).await.into_iter().flatten().collect();
        }

        if !config.proxy_configured() {
            return originals;
        }

        let proxied = self.proxy_all(&candidates, config).await;
        originals
            .into_iter()
            .zip(proxied)
            .flat_map(|(original, variants)| iter::once(original).chain(variants))
            .collect()
    }

    /// Proxy every candidate concurrently; one result slot per candidate, in order
    async fn proxy_all(
        &self,
        candidates: &[StreamCandidate],
        config: &UserConfig,
    ) -> Vec<Vec<StreamDescriptor>> {
        join_all(candidates.iter().map(|candidate| self.proxy_one(candidate, config))).await
    }

    async fn proxy_one(&self, candidate: &StreamCandidate, config: &UserConfig) -> Vec<StreamDescriptor> {
        match self.proxy.proxy(candidate, config).await {
            Ok(variants) => variants,
            Err(e) => {
                warn!("Proxy failed for {}: {}", candidate.url, e);
                Vec::new()
            }
        }
    }

    /// Give every descriptor the same channel header
    async fn attach_channel_header(
        &self,
        channel: &Channel,
        config: &UserConfig,
        mut streams: Vec<StreamDescriptor>,
    ) -> Vec<StreamDescriptor> {
        if streams.is_empty() {
            return streams;
        }
        let header = self.entries.build(channel, config).await.header();
        for stream in &mut streams {
            stream.channel = Some(header.clone());
        }
        streams
    }
}

/// Descriptor for a declared URL, with the default User-Agent filled in
fn original_descriptor(channel: &Channel, stream: &StreamUrl, config: &UserConfig) -> StreamDescriptor {
    let mut headers: HashMap<String, String> = stream.headers.clone();
    let has_user_agent = headers
        .keys()
        .any(|key| key.eq_ignore_ascii_case(USER_AGENT_HEADER));
    if !has_user_agent {
        headers.insert(
            USER_AGENT_HEADER.to_string(),
            config.default_user_agent.clone(),
        );
    }

    let label = stream
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(channel.name.as_str());

    StreamDescriptor::new(
        channel.name.clone(),
        format!("📺 {} [{}]", label, config.language_tag()),
        stream.url.clone(),
        headers,
    )
}
