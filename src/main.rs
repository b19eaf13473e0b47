//! Sandwich Sentinel - real-time sandwich-attack risk monitor for Solana
//!
//! This is the main entry point for the monitoring service. It wires the
//! RPC-backed transaction source into a monitoring session and runs until
//! interrupted.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sandwich_sentinel::alerts::AlertManager;
use sandwich_sentinel::config::AppConfig;
use sandwich_sentinel::metrics::MetricsState;
use sandwich_sentinel::monitoring::SandwichMonitor;
use sandwich_sentinel::source::{ProgramIdDecoder, RpcTransactionSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    tracing::info!("Starting Sandwich Sentinel v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;
    tracing::info!(
        account = %config.monitoring.account,
        rpc = %config.rpc.http_url,
        poll_interval_ms = config.monitoring.poll_interval_ms,
        "Configuration loaded"
    );

    // Shared alert set consumed by the presentation sink
    let alerts = Arc::new(AlertManager::with_ttl_secs(config.alerts.ttl_secs as i64));

    // Prometheus registry for an external scraper
    let metrics = Arc::new(MetricsState::new());

    // RPC-backed transaction source with program-id swap decoding
    let decoder = Arc::new(ProgramIdDecoder::new(
        config.detection.assumed_pool_depth_sol,
    ));
    let source = Arc::new(RpcTransactionSource::new(
        config.rpc.http_url.clone(),
        config.rpc.ws_url.clone(),
        decoder,
    ));

    // Start the monitoring session (polling + push flows)
    let mut monitor = SandwichMonitor::new(&config, alerts, metrics);
    monitor.start(source);
    tracing::info!("Monitoring session started");

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received");

    monitor.shutdown().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sandwich_sentinel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Load and validate configuration
fn load_config() -> anyhow::Result<AppConfig> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    Ok(config)
}
