use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub streams: StreamsConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Display language, the first three letters become the title tag
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_epg_enabled")]
    pub epg_enabled: bool,
    /// IANA timezone used to render program times
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_placeholder_image_base")]
    pub placeholder_image_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamsConfig {
    #[serde(default)]
    pub resolver_enabled: bool,
    pub resolver_script: Option<PathBuf>,
    #[serde(default = "default_resolver_timeout")]
    pub resolver_timeout: String,
    #[serde(default)]
    pub force_proxy: bool,
    pub proxy_url: Option<String>,
    pub proxy_password: Option<String>,
    #[serde(default = "default_proxy_health_ttl")]
    pub proxy_health_ttl: String,
    #[serde(default = "default_proxy_health_timeout")]
    pub proxy_health_timeout: String,
    #[serde(default = "default_user_agent")]
    pub default_user_agent: String,
    #[serde(default = "default_placeholder_video_url")]
    pub placeholder_video_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_channels_path")]
    pub channels_path: PathBuf,
    #[serde(default = "default_guide_path")]
    pub guide_path: PathBuf,
    /// Command that rebuilds the channel snapshot file
    pub playlist_generator: Option<PathBuf>,
    #[serde(default = "default_regenerate_timeout")]
    pub regenerate_timeout: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_epg_enabled() -> bool {
    DEFAULT_EPG_ENABLED
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_placeholder_image_base() -> String {
    DEFAULT_PLACEHOLDER_IMAGE_BASE.to_string()
}

fn default_resolver_timeout() -> String {
    DEFAULT_RESOLVER_TIMEOUT.to_string()
}

fn default_proxy_health_ttl() -> String {
    DEFAULT_PROXY_HEALTH_TTL.to_string()
}

fn default_proxy_health_timeout() -> String {
    DEFAULT_PROXY_HEALTH_TIMEOUT.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_placeholder_video_url() -> String {
    DEFAULT_PLACEHOLDER_VIDEO_URL.to_string()
}

fn default_channels_path() -> PathBuf {
    PathBuf::from(DEFAULT_CHANNELS_PATH)
}

fn default_guide_path() -> PathBuf {
    PathBuf::from(DEFAULT_GUIDE_PATH)
}

fn default_regenerate_timeout() -> String {
    DEFAULT_REGENERATE_TIMEOUT.to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: default_base_url(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            epg_enabled: default_epg_enabled(),
            timezone: default_timezone(),
            placeholder_image_base: default_placeholder_image_base(),
        }
    }
}

impl Default for StreamsConfig {
    fn default() -> Self {
        Self {
            resolver_enabled: false,
            resolver_script: None,
            resolver_timeout: default_resolver_timeout(),
            force_proxy: false,
            proxy_url: None,
            proxy_password: None,
            proxy_health_ttl: default_proxy_health_ttl(),
            proxy_health_timeout: default_proxy_health_timeout(),
            default_user_agent: default_user_agent(),
            placeholder_video_url: default_placeholder_video_url(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            channels_path: default_channels_path(),
            guide_path: default_guide_path(),
            playlist_generator: None,
            regenerate_timeout: default_regenerate_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            catalog: CatalogConfig::default(),
            streams: StreamsConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

/// Per-request settings consumed by the catalog engine and stream pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub language: String,
    pub epg_enabled: bool,
    pub resolver_enabled: bool,
    pub resolver_script: Option<PathBuf>,
    pub force_proxy: bool,
    pub proxy_url: Option<String>,
    pub proxy_password: Option<String>,
    pub default_user_agent: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            epg_enabled: default_epg_enabled(),
            resolver_enabled: false,
            resolver_script: None,
            force_proxy: false,
            proxy_url: None,
            proxy_password: None,
            default_user_agent: default_user_agent(),
        }
    }
}

impl UserConfig {
    /// Three-letter uppercase language tag appended to titles
    pub fn language_tag(&self) -> String {
        let language = if self.language.trim().is_empty() {
            DEFAULT_LANGUAGE
        } else {
            self.language.trim()
        };
        language.chars().take(3).collect::<String>().to_uppercase()
    }

    /// Resolver branch is only taken when it is switched on and has a script
    pub fn resolver_active(&self) -> bool {
        self.resolver_enabled && self.resolver_script.is_some()
    }

    /// Proxy credentials are present
    pub fn proxy_configured(&self) -> bool {
        matches!(
            (&self.proxy_url, &self.proxy_password),
            (Some(url), Some(password)) if !url.trim().is_empty() && !password.is_empty()
        )
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }

    /// Settings handed to the catalog engine and the stream pipeline
    pub fn user_config(&self) -> UserConfig {
        UserConfig {
            language: self.catalog.language.clone(),
            epg_enabled: self.catalog.epg_enabled,
            resolver_enabled: self.streams.resolver_enabled,
            resolver_script: self.streams.resolver_script.clone(),
            force_proxy: self.streams.force_proxy,
            proxy_url: self.streams.proxy_url.clone(),
            proxy_password: self.streams.proxy_password.clone(),
            default_user_agent: self.streams.default_user_agent.clone(),
        }
    }

    /// Timezone used for program times, falling back to the default on bad input
    pub fn timezone(&self) -> chrono_tz::Tz {
        self.catalog.timezone.parse().unwrap_or_else(|_| {
            warn!(
                "Invalid timezone '{}', using {}",
                self.catalog.timezone, DEFAULT_TIMEZONE
            );
            chrono_tz::Europe::Rome
        })
    }
}

/// Parse a human duration like "20s", "5m", "1h30m" or "1500ms"
pub fn parse_duration(value: &str) -> Option<Duration> {
    humantime::parse_duration(value.trim()).ok()
}

/// Parse a duration setting, falling back to the given default
pub fn duration_or(value: &str, fallback: Duration) -> Duration {
    parse_duration(value).unwrap_or_else(|| {
        warn!("Invalid duration '{}', using {:?}", value, fallback);
        fallback
    })
}
