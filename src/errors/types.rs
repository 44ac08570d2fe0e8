//! Error type definitions for the live catalog service

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Collaborator errors (cache, resolver, proxy, regeneration)
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the external collaborators of the core
#[derive(Error, Debug)]
pub enum StreamError {
    /// No channel snapshot has been loaded
    #[error("No playlist configured or loaded: {message}")]
    NoPlaylist { message: String },

    /// The resolver script failed or returned garbage
    #[error("Resolver failed: {message}")]
    ResolverFailed { message: String },

    /// The resolver script did not finish in time
    #[error("Resolver timed out after {seconds}s")]
    ResolverTimeout { seconds: u64 },

    /// A proxy variant could not be produced
    #[error("Proxy failed for {url}: {message}")]
    ProxyFailed { url: String, message: String },

    /// Proxy use was requested without credentials
    #[error("Proxy is not configured")]
    ProxyNotConfigured,

    /// The playlist generator command failed
    #[error("Playlist regeneration failed: {message}")]
    RegenerationFailed { message: String },
}

impl StreamError {
    pub fn no_playlist<S: Into<String>>(message: S) -> Self {
        Self::NoPlaylist {
            message: message.into(),
        }
    }

    pub fn resolver_failed<S: Into<String>>(message: S) -> Self {
        Self::ResolverFailed {
            message: message.into(),
        }
    }

    pub fn proxy_failed<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::ProxyFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn regeneration_failed<S: Into<String>>(message: S) -> Self {
        Self::RegenerationFailed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_wraps_into_app_error() {
        let err: AppError = StreamError::ProxyNotConfigured.into();
        assert_eq!(err.to_string(), "Stream error: Proxy is not configured");
    }

    #[test]
    fn test_guide_load_errors_convert() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Json(_)));

        let err: AppError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
