//! Push-based metrics reporter for Trendcast
//!
//! Periodically outputs metrics as structured JSON to stdout.
//! No metrics endpoint, no incoming connections - only outbound data.

use crate::infrastructure::observability::metrics::Metrics;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics snapshot for JSON output
#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub requests: RequestsSnapshot,
}

#[derive(Serialize)]
pub struct RequestsSnapshot {
    pub ok: u64,
    pub rejected: u64,
    pub failed: u64,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
pub struct MetricsReporter {
    metrics: Metrics,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(metrics: Metrics, interval_seconds: u64) -> Self {
        Self {
            metrics,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            let snapshot = self.collect_snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => {
                    // Prefixed so log shippers can filter these lines out.
                    println!("METRICS_JSON:{}", json);
                    info!(
                        "Requests: ok={} rejected={} failed={} | Uptime: {}s",
                        snapshot.requests.ok,
                        snapshot.requests.rejected,
                        snapshot.requests.failed,
                        snapshot.uptime_seconds
                    );
                }
                Err(e) => {
                    info!("MetricsReporter: failed to serialize snapshot: {}", e);
                }
            }
        }
    }

    fn collect_snapshot(&self) -> MetricsSnapshot {
        let uptime = self.start_time.elapsed().as_secs();
        self.metrics.uptime_seconds.set(uptime as f64);

        let count = |outcome: &str| {
            self.metrics
                .requests_total
                .with_label_values(&[outcome])
                .get() as u64
        };

        MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            requests: RequestsSnapshot {
                ok: count("ok"),
                rejected: count("rejected"),
                failed: count("failed"),
            },
        }
    }
}
