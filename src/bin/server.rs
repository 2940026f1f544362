//! Trendcast Server - headless prediction service
//!
//! Loads the trained horizon models once at startup and serves predictions
//! over newline-delimited JSON on TCP. Metrics are pushed via structured
//! JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! ARTIFACTS_DIR=artifacts cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `ARTIFACTS_DIR` - Directory holding the model bundles (default: artifacts)
//! - `ARTIFACT_PREFIX` - Bundle file prefix (default: model_spy)
//! - `TIMESTAMP_COLUMN` - Request timestamp column name (default: 日期)
//! - `BIND_ADDRESS` / `PORT` - Listen address (default: 127.0.0.1:8000)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Seconds between metric outputs (default: 60)

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;
use trendcast::application::normalizer::RequestNormalizer;
use trendcast::application::service::PredictionService;
use trendcast::config::Config;
use trendcast::infrastructure::artifacts;
use trendcast::infrastructure::observability::{Metrics, MetricsReporter};
use trendcast::infrastructure::transport::LineServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stdout only)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Trendcast Server {} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: artifacts={:?}, prefix={}, bind={}",
        config.model.artifacts_dir,
        config.model.artifact_prefix,
        config.server.socket_addr()
    );

    // Load the trained models; failure here is fatal to process start.
    let (scorer, schema) = artifacts::load_scorer(&config.model)?;
    info!("Models ready: {} feature columns per horizon", schema.len());

    let metrics = Metrics::new()?;
    let service = Arc::new(PredictionService::new(
        Arc::new(schema),
        RequestNormalizer::new(&config.model.timestamp_column),
        scorer,
        metrics.clone(),
    ));

    // Start metrics reporter if enabled
    if config.observability.enabled {
        let reporter = MetricsReporter::new(metrics.clone(), config.observability.interval_seconds);
        tokio::spawn(async move {
            reporter.run().await;
        });
        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability.interval_seconds
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    let listener = TcpListener::bind(config.server.socket_addr())
        .await
        .with_context(|| format!("binding {}", config.server.socket_addr()))?;
    info!("Listening on {}. Press Ctrl+C to shutdown.", config.server.socket_addr());

    let server = LineServer::new(service);
    tokio::select! {
        result = server.serve(listener) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting...");
        }
    }

    Ok(())
}
