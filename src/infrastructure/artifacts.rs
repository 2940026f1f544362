//! Trained-model bundle loading.
//!
//! Each horizon ships as a pair of files produced by the offline training
//! job: `<prefix>_<tag>.onnx` (the classifier) and
//! `<prefix>_<tag>.features.json` (the ordered feature columns it was
//! trained on). Bundles are loaded once at startup and shared read-only for
//! the process lifetime; any load failure is fatal.

use crate::application::ml::onnx::OnnxClassifier;
use crate::application::scoring::MultiHorizonScorer;
use crate::config::ModelEnvConfig;
use crate::domain::horizon::Horizon;
use crate::domain::schema::FeatureSchema;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
struct FeatureSidecar {
    feature_cols: Vec<String>,
}

/// Loads one horizon's classifier and its declared feature columns.
pub fn load_bundle(
    dir: &Path,
    prefix: &str,
    horizon: Horizon,
) -> anyhow::Result<(OnnxClassifier, Vec<String>)> {
    let sidecar_path = dir.join(format!("{}_{}.features.json", prefix, horizon.tag()));
    let file = File::open(&sidecar_path)
        .with_context(|| format!("opening feature sidecar {}", sidecar_path.display()))?;
    let sidecar: FeatureSidecar = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing feature sidecar {}", sidecar_path.display()))?;

    let model_path = dir.join(format!("{}_{}.onnx", prefix, horizon.tag()));
    let classifier = OnnxClassifier::load(&model_path, sidecar.feature_cols.len())?;
    Ok((classifier, sidecar.feature_cols))
}

/// Loads all three horizon bundles and the schema they share.
///
/// The three bundles must declare identical feature-column lists; divergence
/// is a deployment error caught here at startup, never at request time. The
/// 5-day bundle is canonical, matching the original training pipeline.
pub fn load_scorer(config: &ModelEnvConfig) -> anyhow::Result<(MultiHorizonScorer, FeatureSchema)> {
    let dir = config.artifacts_dir.as_path();
    let prefix = config.artifact_prefix.as_str();

    let (one_day, cols_1d) = load_bundle(dir, prefix, Horizon::OneDay)?;
    let (five_day, cols_5d) = load_bundle(dir, prefix, Horizon::FiveDay)?;
    let (twenty_day, cols_20d) = load_bundle(dir, prefix, Horizon::TwentyDay)?;

    if cols_1d != cols_5d {
        bail!("feature columns of the 1d bundle diverge from the 5d bundle");
    }
    if cols_20d != cols_5d {
        bail!("feature columns of the 20d bundle diverge from the 5d bundle");
    }

    let schema = FeatureSchema::new(cols_5d)?;
    info!(
        "Loaded {} horizon models sharing {} feature columns",
        Horizon::all().len(),
        schema.len()
    );

    let scorer = MultiHorizonScorer::new(Arc::new(one_day), Arc::new(five_day), Arc::new(twenty_day));
    Ok((scorer, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_sidecar_is_fatal() {
        let result = load_bundle(Path::new("/nonexistent"), "model_spy", Horizon::OneDay);
        assert!(result.is_err());
    }

    #[test]
    fn test_sidecar_parsing_requires_feature_cols() {
        let dir = std::env::temp_dir().join("trendcast_sidecar_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("model_spy_1d.features.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(br#"{"wrong_key": []}"#).unwrap();

        let result = load_bundle(&dir, "model_spy", Horizon::OneDay);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("parsing feature sidecar"), "{}", message);
    }
}
