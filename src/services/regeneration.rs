//! Playlist regeneration command
//!
//! Regeneration is an administrative action: run the playlist generator, then
//! reload the channel cache. It is exposed as its own endpoint, and the stream
//! endpoint maps the reserved channel id suffix onto the same command before
//! any channel lookup happens.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::cache::PlaylistCache;
use crate::config::defaults::REGENERATE_CHANNEL_SUFFIX;
use crate::errors::{StreamError, StreamResult};
use crate::models::StreamDescriptor;
use crate::resolver::script_command;
use crate::services::traits::{PlaylistRegenerator, RegenerationReport};

/// Out-of-band actions reachable through the stream endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    RegeneratePlaylist,
}

impl ControlCommand {
    /// Recognize a reserved channel id by its exact suffix
    pub fn parse(channel_id: &str) -> Option<Self> {
        channel_id
            .ends_with(REGENERATE_CHANNEL_SUFFIX)
            .then_some(ControlCommand::RegeneratePlaylist)
    }
}

/// Runs the regenerator and reports the result as a single synthetic stream
pub struct RegenerationCommand {
    regenerator: Arc<dyn PlaylistRegenerator>,
    placeholder_video_url: String,
    running: Mutex<()>,
}

impl RegenerationCommand {
    pub fn new(regenerator: Arc<dyn PlaylistRegenerator>, placeholder_video_url: impl Into<String>) -> Self {
        Self {
            regenerator,
            placeholder_video_url: placeholder_video_url.into(),
            running: Mutex::new(()),
        }
    }

    /// Run the regeneration; concurrent requests are rejected while one is in flight
    pub async fn run(&self) -> StreamResult<RegenerationReport> {
        let Ok(_guard) = self.running.try_lock() else {
            return Err(StreamError::regeneration_failed("a regeneration is already running"));
        };
        self.regenerator.regenerate().await
    }

    /// Execute a control command, always answering with one descriptor
    pub async fn execute(&self, command: ControlCommand) -> StreamDescriptor {
        match command {
            ControlCommand::RegeneratePlaylist => {
                let title = match self.run().await {
                    Ok(report) => {
                        info!("Playlist regenerated with {} channels", report.channel_count);
                        format!("✅ Playlist regenerated: {} channels", report.channel_count)
                    }
                    Err(e) => {
                        error!("Playlist regeneration failed: {}", e);
                        format!("❌ Playlist regeneration failed: {e}")
                    }
                };
                StreamDescriptor::new(
                    "Playlist",
                    title,
                    self.placeholder_video_url.clone(),
                    HashMap::new(),
                )
            }
        }
    }
}

/// Regenerates the playlist with an external command, then reloads the cache
pub struct ScriptRegenerator {
    command: Option<PathBuf>,
    timeout: Duration,
    cache: Arc<PlaylistCache>,
}

impl ScriptRegenerator {
    pub fn new(command: Option<PathBuf>, timeout: Duration, cache: Arc<PlaylistCache>) -> Self {
        Self {
            command,
            timeout,
            cache,
        }
    }

    async fn run_generator(&self, command: &Path) -> StreamResult<()> {
        info!("Running playlist generator {}", command.display());
        let mut cmd = script_command(command);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                StreamError::regeneration_failed(format!(
                    "generator timed out after {:?}",
                    self.timeout
                ))
            })?
            .map_err(|e| StreamError::regeneration_failed(format!("cannot run generator: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StreamError::regeneration_failed(format!(
                "generator exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PlaylistRegenerator for ScriptRegenerator {
    async fn regenerate(&self) -> StreamResult<RegenerationReport> {
        match &self.command {
            Some(command) => self.run_generator(command).await?,
            None => warn!("No playlist generator configured, only reloading the channel cache"),
        }
        let channel_count = self.cache.reload().await?;
        Ok(RegenerationReport { channel_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::traits::ChannelCache;

    struct FixedRegenerator(Result<usize, String>);

    #[async_trait]
    impl PlaylistRegenerator for FixedRegenerator {
        async fn regenerate(&self) -> StreamResult<RegenerationReport> {
            match &self.0 {
                Ok(count) => Ok(RegenerationReport {
                    channel_count: *count,
                }),
                Err(message) => Err(StreamError::regeneration_failed(message.clone())),
            }
        }
    }

    #[test]
    fn test_control_command_requires_exact_suffix() {
        assert_eq!(
            ControlCommand::parse("tv|regenerate-playlist"),
            Some(ControlCommand::RegeneratePlaylist)
        );
        assert_eq!(ControlCommand::parse("regenerate-playlist-rai1"), None);
        assert_eq!(ControlCommand::parse("rai1"), None);
    }

    #[tokio::test]
    async fn test_execute_reports_success() {
        let command = RegenerationCommand::new(Arc::new(FixedRegenerator(Ok(42))), "http://video");
        let descriptor = command.execute(ControlCommand::RegeneratePlaylist).await;
        assert_eq!(descriptor.title, "✅ Playlist regenerated: 42 channels");
        assert_eq!(descriptor.url, "http://video");
    }

    #[tokio::test]
    async fn test_execute_reports_failure() {
        let command = RegenerationCommand::new(
            Arc::new(FixedRegenerator(Err("boom".to_string()))),
            "http://video",
        );
        let descriptor = command.execute(ControlCommand::RegeneratePlaylist).await;
        assert!(descriptor.title.starts_with("❌ Playlist regeneration failed"));
        assert!(descriptor.title.contains("boom"));
    }

    #[tokio::test]
    async fn test_regenerator_without_command_reloads_cache() {
        let cache = Arc::new(PlaylistCache::from_channels(vec![]));
        let regenerator = ScriptRegenerator::new(None, Duration::from_secs(1), cache);
        assert_eq!(regenerator.regenerate().await.unwrap().channel_count, 0);
    }

    #[tokio::test]
    async fn test_regenerator_reports_missing_command() {
        let cache = Arc::new(PlaylistCache::from_channels(vec![]));
        let regenerator = ScriptRegenerator::new(
            Some(PathBuf::from("/nonexistent/generate-playlist")),
            Duration::from_secs(1),
            cache,
        );
        assert!(matches!(
            regenerator.regenerate().await,
            Err(StreamError::RegenerationFailed { .. })
        ));
    }

    fn generator_script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("generate.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_generator_rewrites_snapshot_before_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let snapshot = dir.path().join("channels.json");
        std::fs::write(&snapshot, r#"[{"id": "old", "name": "Old"}]"#).unwrap();
        let script = generator_script(
            &dir,
            &format!(
                "printf '%s' '[{{\"id\":\"a\",\"name\":\"A\"}},{{\"id\":\"b\",\"name\":\"B\"}}]' > '{}'\n",
                snapshot.display()
            ),
        );

        let cache = Arc::new(PlaylistCache::new(&snapshot));
        cache.reload().await.unwrap();
        let regenerator =
            ScriptRegenerator::new(Some(script), Duration::from_secs(10), cache.clone());

        assert_eq!(regenerator.regenerate().await.unwrap().channel_count, 2);
        let current = cache.snapshot().await.unwrap();
        assert!(current.channel("b").is_some());
        assert!(current.channel("old").is_none());
    }

    #[tokio::test]
    async fn test_generator_failure_keeps_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = generator_script(&dir, "echo 'upstream down' >&2\nexit 1\n");
        let cache = Arc::new(PlaylistCache::from_channels(vec![]));
        let regenerator = ScriptRegenerator::new(Some(script), Duration::from_secs(10), cache);

        match regenerator.regenerate().await {
            Err(StreamError::RegenerationFailed { message }) => {
                assert!(message.contains("upstream down"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_generator_times_out() {
        let dir = tempfile::TempDir::new().unwrap();
        let script = generator_script(&dir, "sleep 5\n");
        let cache = Arc::new(PlaylistCache::from_channels(vec![]));
        let regenerator = ScriptRegenerator::new(Some(script), Duration::from_millis(200), cache);

        match regenerator.regenerate().await {
            Err(StreamError::RegenerationFailed { message }) => {
                assert!(message.contains("timed out"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
