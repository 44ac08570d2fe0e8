//! In-memory channel cache
//!
//! Channels are loaded from a JSON snapshot file. A reload builds a complete
//! new [`ChannelSnapshot`] and swaps it in, so readers holding the previous
//! `Arc` keep a consistent view until they finish.

pub mod snapshot;

pub use snapshot::{ChannelFilter, ChannelSnapshot};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::{StreamError, StreamResult};
use crate::models::Channel;
use crate::services::traits::ChannelCache;

pub struct PlaylistCache {
    path: Option<PathBuf>,
    snapshot: RwLock<Option<Arc<ChannelSnapshot>>>,
}

impl PlaylistCache {
    /// Cache backed by a snapshot file; nothing is read until `reload`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            snapshot: RwLock::new(None),
        }
    }

    /// Cache holding a fixed channel list
    pub fn from_channels(channels: Vec<Channel>) -> Self {
        Self {
            path: None,
            snapshot: RwLock::new(Some(Arc::new(ChannelSnapshot::new(channels)))),
        }
    }

    /// Re-read the snapshot file and swap it in. Returns the channel count.
    pub async fn reload(&self) -> StreamResult<usize> {
        let Some(path) = &self.path else {
            let current = self.snapshot.read().await;
            return Ok(current.as_ref().map(|s| s.len()).unwrap_or(0));
        };

        let channels = read_channels(path).await?;
        let snapshot = Arc::new(ChannelSnapshot::new(channels));
        let count = snapshot.len();
        *self.snapshot.write().await = Some(snapshot);

        info!("Loaded {} channels from {}", count, path.display());
        Ok(count)
    }

    /// Replace the channel set directly
    pub async fn replace(&self, channels: Vec<Channel>) {
        *self.snapshot.write().await = Some(Arc::new(ChannelSnapshot::new(channels)));
    }
}

async fn read_channels(path: &Path) -> StreamResult<Vec<Channel>> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        StreamError::no_playlist(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        warn!("Channel snapshot {} is malformed: {}", path.display(), e);
        StreamError::no_playlist(format!("malformed snapshot {}: {}", path.display(), e))
    })
}

#[async_trait]
impl ChannelCache for PlaylistCache {
    async fn snapshot(&self) -> StreamResult<Arc<ChannelSnapshot>> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or_else(|| StreamError::no_playlist("channel cache has not been loaded"))
    }
}
