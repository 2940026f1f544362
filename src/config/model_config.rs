//! Model artifact configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;

/// Model environment configuration
///
/// `timestamp_column` defaults to the training data's date column name,
/// which is non-ASCII; column names are matched byte-for-byte against the
/// request payload.
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub artifacts_dir: PathBuf,
    pub artifact_prefix: String,
    pub timestamp_column: String,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts"),
            artifact_prefix: "model_spy".to_string(),
            timestamp_column: "日期".to_string(),
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            artifacts_dir: env::var("ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifacts_dir),
            artifact_prefix: env::var("ARTIFACT_PREFIX").unwrap_or(defaults.artifact_prefix),
            timestamp_column: env::var("TIMESTAMP_COLUMN").unwrap_or(defaults.timestamp_column),
        }
    }
}
