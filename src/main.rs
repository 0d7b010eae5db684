// =============================================================================
// ta-stream: Main Entry Point
// =============================================================================
//
// Loads the indicator table, builds the shared engine state, optionally
// starts the tick feed adapter and serves the HTTP / WebSocket API until
// Ctrl+C.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ta_stream::api;
use ta_stream::app_state::AppState;
use ta_stream::market_data::feed::run_tick_feed;
use ta_stream::runtime_config::EngineConfig;

const DEFAULT_CONFIG_PATH: &str = "engine_config.json";
const FEED_RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("ta-stream starting up");

    let config_path =
        std::env::var("TA_STREAM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let mut config = EngineConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, path = %config_path, "failed to load config, using defaults");
        EngineConfig::default()
    });

    if let Ok(addr) = std::env::var("TA_STREAM_BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(url) = std::env::var("TA_STREAM_FEED_URL") {
        let url = url.trim().to_string();
        config.feed.url = (!url.is_empty()).then_some(url);
    }

    info!(
        rsi_periods = ?config.rsi_periods,
        history_capacity = config.history_capacity,
        warmup = config.warmup_period(),
        "indicator table configured"
    );

    let bind_addr = config.bind_addr.clone();
    let feed = config.feed.clone();

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Tick feed adapter ─────────────────────────────────────────────
    if let Some(url) = feed.url {
        let feed_state = state.clone();
        let bucket = Duration::from_secs(feed.bucket_secs);
        tokio::spawn(async move {
            loop {
                if let Err(e) = run_tick_feed(&url, bucket, &feed_state).await {
                    error!(url = %url, error = %e, "tick feed error, reconnecting in 5s");
                }
                tokio::time::sleep(FEED_RECONNECT_DELAY).await;
            }
        });
    } else {
        info!("no feed URL configured, accepting bars over HTTP only");
    }

    // ── 4. API server ────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    let app = api::rest::router(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!(
        bars = state.bar_count(),
        version = state.current_state_version(),
        "ta-stream shut down complete"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("shutdown signal received, stopping gracefully");
}
