//! Script-backed stream resolver
//!
//! The resolver script receives the channel's declared URLs as JSON on stdin
//! and prints a JSON array of resolved streams on stdout. Python scripts are
//! started through `python3`, shell scripts through `sh`; anything else is
//! executed directly.

use async_trait::async_trait;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::UserConfig;
use crate::errors::{StreamError, StreamResult};
use crate::models::{ResolvedStream, StreamUrl};
use crate::services::traits::StreamResolver;

#[derive(Serialize)]
struct ResolverInput<'a> {
    urls: &'a [StreamUrl],
}

pub struct ScriptResolver {
    timeout: Duration,
}

impl ScriptResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run(&self, script: &Path, input: Vec<u8>) -> StreamResult<Vec<u8>> {
        let mut cmd = script_command(script);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| StreamError::resolver_failed(format!("cannot start {}: {}", script.display(), e)))?;

        // Writing the input and collecting the output share one deadline
        let exchange = async move {
            if let Some(mut stdin) = child.stdin.take() {
                match stdin.write_all(&input).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        debug!("Resolver closed stdin before reading all input");
                    }
                    Err(e) => {
                        return Err(StreamError::resolver_failed(format!("cannot write input: {e}")));
                    }
                }
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| StreamError::resolver_failed(e.to_string()))
        };

        let output = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| StreamError::ResolverTimeout {
                seconds: self.timeout.as_secs(),
            })??;

        if !output.status.success() {
            return Err(StreamError::resolver_failed(format!(
                "{} exited with {}: {}",
                script.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

/// Command starting a script through the interpreter its extension names
pub fn script_command(script: &Path) -> Command {
    let interpreter = match script.extension().and_then(|ext| ext.to_str()) {
        Some("py") => Some("python3"),
        Some("sh") => Some("sh"),
        _ => None,
    };
    match interpreter {
        Some(interpreter) => {
            let mut cmd = Command::new(interpreter);
            cmd.arg(script);
            cmd
        }
        None => Command::new(script),
    }
}

/// Parse resolver stdout; blank output means "nothing resolved"
pub fn parse_resolver_output(stdout: &[u8]) -> StreamResult<Vec<ResolvedStream>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(stdout)
        .map_err(|e| StreamError::resolver_failed(format!("invalid resolver output: {e}")))
}

#[async_trait]
impl StreamResolver for ScriptResolver {
    async fn resolve(
        &self,
        urls: &[StreamUrl],
        config: &UserConfig,
    ) -> StreamResult<Vec<ResolvedStream>> {
        let Some(script) = &config.resolver_script else {
            return Err(StreamError::resolver_failed("no resolver script configured"));
        };
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let input = serde_json::to_vec(&ResolverInput { urls })
            .map_err(|e| StreamError::resolver_failed(e.to_string()))?;
        let stdout = self.run(script, input).await?;
        let streams = parse_resolver_output(&stdout)?;
        debug!("Resolver returned {} streams", streams.len());
        Ok(streams)
    }
}
