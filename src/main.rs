use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_catalog::{
    cache::CacheStore,
    config::Config,
    refresh::RefreshService,
    sources::GitHubTreeFetcher,
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "image-catalog")]
#[command(version)]
#[command(about = "A searchable image catalog service with periodic refresh from remote source trees")]
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

    /// Source tree contents URL (overrides config file)
    #[arg(short = 's', long, value_name = "URL")]
    source_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = format!("image_catalog={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting image catalog service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(source_url) = cli.source_url {
        config.source.contents_url = source_url;
    }

    info!("Cataloging source tree: {}", config.source.contents_url);

    // Warm-start the cache from the durable mirror before anything else
    let cache = Arc::new(CacheStore::new(Some(config.cache.mirror_path.clone())));
    match cache.load_from_mirror().await {
        Ok(count) => info!(
            "Warm-started cache with {} records from {:?}",
            count, config.cache.mirror_path
        ),
        Err(e) => warn!("Starting with an empty cache: {}", e),
    }

    let fetcher = Arc::new(GitHubTreeFetcher::new(&config.source)?);
    let refresh = Arc::new(RefreshService::new(fetcher, cache.clone(), &config.cache));

    let shutdown = CancellationToken::new();

    let web_server = WebServer::new(AppState {
        cache,
        refresh: refresh.clone(),
        config,
        start_time: chrono::Utc::now(),
    })?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    // Create a channel to signal when the server is ready or fails to bind
    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();

    let server_shutdown = shutdown.clone();
    let server_handle = tokio::spawn(async move {
        // Signals immediately when bind succeeds/fails, then blocks until shutdown
        if let Err(e) = web_server
            .serve_with_signal(server_ready_tx, server_shutdown)
            .await
        {
            tracing::error!("Web server failed: {}", e);
        }
    });

    // Wait for the server bind result (success or failure)
    match server_ready_rx.await {
        Ok(Ok(())) => {
            info!("Web server is now listening, starting refresh scheduler...");
        }
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => {
            tracing::error!("Web server task completed without signaling");
            return Err(anyhow::anyhow!("Web server failed to start"));
        }
    }

    // Startup refresh plus the periodic schedule, all inside the scheduler
    let scheduler_shutdown = shutdown.clone();
    tokio::spawn(async move {
        refresh.start(scheduler_shutdown).await;
    });

    // Stop scheduling and drain the server on SIGINT/SIGTERM
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
            let mut sigint =
                signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
            info!("Received Ctrl+C, shutting down gracefully");
        }

        shutdown.cancel();
    });

    info!("All services started successfully");

    // Block until shutdown completes
    server_handle.await?;

    Ok(())
}
