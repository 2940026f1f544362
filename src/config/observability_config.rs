//! Observability configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 60,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let enabled = match env::var("OBSERVABILITY_ENABLED") {
            Ok(raw) => raw
                .parse::<bool>()
                .with_context(|| format!("invalid OBSERVABILITY_ENABLED: {}", raw))?,
            Err(_) => defaults.enabled,
        };
        let interval_seconds = match env::var("OBSERVABILITY_INTERVAL") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid OBSERVABILITY_INTERVAL: {}", raw))?,
            Err(_) => defaults.interval_seconds,
        };
        Ok(Self {
            enabled,
            interval_seconds,
        })
    }
}
