//! Push-based observability for Trendcast
//!
//! This module provides observability through **outbound data only** - no
//! metrics endpoint, no incoming requests. Metrics are pushed via periodic
//! structured JSON output to stdout (for Loki, Fluentd, CloudWatch).

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;
