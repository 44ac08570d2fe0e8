/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7860;
pub const DEFAULT_BASE_URL: &str = "http://localhost:7860";

// Catalog defaults
pub const DEFAULT_LANGUAGE: &str = "Italiano";
pub const DEFAULT_TIMEZONE: &str = "Europe/Rome";
pub const DEFAULT_EPG_ENABLED: bool = true;
pub const CATALOG_PAGE_SIZE: usize = 100;
pub const DEFAULT_PLACEHOLDER_IMAGE_BASE: &str = "https://dummyimage.com";

// Stream defaults
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_RESOLVER_TIMEOUT: &str = "20s";
pub const DEFAULT_PROXY_HEALTH_TTL: &str = "1m";
pub const DEFAULT_PROXY_HEALTH_TIMEOUT: &str = "5s";
pub const DEFAULT_PLACEHOLDER_VIDEO_URL: &str =
    "https://test-videos.co.uk/vids/bigbuckbunny/mp4/h264/360/Big_Buck_Bunny_360_10s_1MB.mp4";

// Source defaults
pub const DEFAULT_CHANNELS_PATH: &str = "./data/channels.json";
pub const DEFAULT_GUIDE_PATH: &str = "./data/guide.json";
pub const DEFAULT_REGENERATE_TIMEOUT: &str = "5m";

/// Channel id suffix that triggers playlist regeneration from the stream endpoint
pub const REGENERATE_CHANNEL_SUFFIX: &str = "regenerate-playlist";
