//! Collaborator trait definitions
//!
//! The catalog engine and the stream pipeline only talk to the outside world
//! through these traits. Concrete implementations live in `cache`, `epg`,
//! `resolver` and `proxy`; tests substitute in-memory fakes.

use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::ChannelSnapshot;
use crate::config::UserConfig;
use crate::errors::StreamResult;
use crate::models::{Program, ResolvedStream, StreamCandidate, StreamDescriptor, StreamUrl};

/// Read access to the cached channel set
#[async_trait]
pub trait ChannelCache: Send + Sync {
    /// The snapshot in effect right now. A request holds on to one snapshot
    /// for its whole duration, so filtering, paging and lookups agree.
    async fn snapshot(&self) -> StreamResult<Arc<ChannelSnapshot>>;
}

/// Program guide lookups keyed by normalized linkage id
#[async_trait]
pub trait EpgView: Send + Sync {
    async fn current_program(&self, normalized_id: &str) -> Option<Program>;

    async fn upcoming_programs(&self, normalized_id: &str) -> Vec<Program>;

    /// Icon lookup takes the raw linkage id
    async fn channel_icon(&self, linkage_id: &str) -> Option<String>;
}

/// Turns declared (possibly indirect) URLs into directly playable streams
#[async_trait]
pub trait StreamResolver: Send + Sync {
    async fn resolve(
        &self,
        urls: &[StreamUrl],
        config: &UserConfig,
    ) -> StreamResult<Vec<ResolvedStream>>;
}

/// Produces relayed variants of a single stream
#[async_trait]
pub trait StreamProxy: Send + Sync {
    async fn proxy(
        &self,
        candidate: &StreamCandidate,
        config: &UserConfig,
    ) -> StreamResult<Vec<StreamDescriptor>>;
}

/// Outcome of a successful playlist regeneration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerationReport {
    pub channel_count: usize,
}

/// Administrative command rebuilding the playlist and the channel cache
#[async_trait]
pub trait PlaylistRegenerator: Send + Sync {
    async fn regenerate(&self) -> StreamResult<RegenerationReport>;
}
