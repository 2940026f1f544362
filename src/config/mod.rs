//! Configuration module for Trendcast.
//!
//! Structured configuration loading from environment variables, organized by
//! domain: Model, Server, and Observability.

mod model_config;
mod observability_config;
mod server_config;

pub use model_config::ModelEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::Result;

/// Main service configuration.
///
/// Aggregates all configuration from the per-domain sub-modules. Absent
/// variables fall back to defaults; present-but-invalid values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelEnvConfig,
    pub server: ServerEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            model: ModelEnvConfig::from_env(),
            server: ServerEnvConfig::from_env()?,
            observability: ObservabilityEnvConfig::from_env()?,
        })
    }
}
