use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use live_catalog::{
    cache::PlaylistCache,
    config::{Config, duration_or},
    epg::GuideStore,
    proxy::RelayProxy,
    resolver::ScriptResolver,
    services::{
        CatalogEntryBuilder, CatalogQueryEngine, CatalogSettings, RegenerationCommand,
        ScriptRegenerator, StreamResolutionPipeline,
    },
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "live-catalog")]
#[command(version)]
#[command(about = "Live TV catalog and stream resolution service with EPG enrichment")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("live_catalog={},tower_http=trace", cli.log_level)
    } else {
        format!("live_catalog={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Live Catalog v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    let cache = Arc::new(PlaylistCache::new(config.sources.channels_path.clone()));
    if let Err(e) = cache.reload().await {
        warn!("Channel cache not loaded, catalog will be empty until regeneration: {}", e);
    }

    let guide = match GuideStore::load(&config.sources.guide_path).await {
        Ok(guide) => guide,
        Err(e) => {
            warn!(
                "Program guide {} not loaded: {}",
                config.sources.guide_path.display(),
                e
            );
            GuideStore::empty()
        }
    };

    let entries = CatalogEntryBuilder::new(Arc::new(guide), CatalogSettings::from_config(&config));
    let catalog = Arc::new(CatalogQueryEngine::new(cache.clone(), entries.clone()));

    let resolver = ScriptResolver::new(duration_or(
        &config.streams.resolver_timeout,
        Duration::from_secs(20),
    ));
    let proxy = RelayProxy::new(
        duration_or(&config.streams.proxy_health_timeout, Duration::from_secs(5)),
        duration_or(&config.streams.proxy_health_ttl, Duration::from_secs(60)),
    );
    let streams = Arc::new(StreamResolutionPipeline::new(
        cache.clone(),
        Arc::new(resolver),
        Arc::new(proxy),
        entries,
    ));

    let regenerator = ScriptRegenerator::new(
        config.sources.playlist_generator.clone(),
        duration_or(&config.sources.regenerate_timeout, Duration::from_secs(300)),
        cache,
    );
    let regeneration = Arc::new(RegenerationCommand::new(
        Arc::new(regenerator),
        config.streams.placeholder_video_url.clone(),
    ));

    let web_server = WebServer::new(AppState::new(config, catalog, streams, regeneration))?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
