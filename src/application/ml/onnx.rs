//! ONNX Runtime classifier wrapper.
//!
//! Each horizon's trained classifier is exported to ONNX offline; this
//! module only runs inference. `Session::run` needs `&mut`, so the session
//! sits behind a mutex held for the duration of a single bounded call.

use super::predictor::HorizonClassifier;
use crate::domain::table::FeatureVector;
use anyhow::Context;
use ndarray::Array2;
use ort::session::{Session, SessionOutputs, builder::GraphOptimizationLevel};
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

#[derive(Debug)]
pub struct OnnxClassifier {
    session: Mutex<Session>,
    model_path: PathBuf,
    feature_count: usize,
}

impl OnnxClassifier {
    /// Loads the model file. A missing or unreadable model is fatal: the
    /// service must not start without its scoring capability.
    pub fn load(model_path: &Path, feature_count: usize) -> anyhow::Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(model_path)
            .with_context(|| format!("loading ONNX model from {}", model_path.display()))?;

        info!("Loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
            feature_count,
        })
    }
}

impl HorizonClassifier for OnnxClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, String> {
        if features.len() != self.feature_count {
            return Err(format!(
                "expected {} features, got {}",
                self.feature_count,
                features.len()
            ));
        }

        let data: Vec<f32> = features.as_slice().iter().map(|&v| v as f32).collect();
        let input = Array2::from_shape_vec((1, self.feature_count), data)
            .map_err(|e| format!("input tensor shape: {}", e))?;
        let input_value =
            Value::from_array(input).map_err(|e| format!("input value creation failed: {}", e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("session lock poisoned: {}", e))?;

        let inputs = ort::inputs![input_value].map_err(|e| e.to_string())?;
        let outputs = session.run(inputs).map_err(|e| e.to_string())?;
        extract_up_probability(&outputs)
    }

    fn name(&self) -> &str {
        self.model_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("onnx-model")
    }
}

/// Pulls p(class = 1) out of the model outputs.
///
/// Classifier exports carry a `probabilities` tensor of shape [1, 2]; some
/// converters emit a single-value score instead, taken as p(up) directly.
fn extract_up_probability(outputs: &SessionOutputs) -> Result<f64, String> {
    if let Some(value) = outputs.get("probabilities") {
        let data = value
            .try_extract_raw_tensor::<f32>()
            .map_err(|e| e.to_string())?;
        return up_probability_from(data.1);
    }

    // Fall back to the first float tensor among the outputs; the companion
    // `label` output is int64 and fails extraction, which is fine.
    for (_, value) in outputs.iter() {
        if let Ok(data) = value.try_extract_raw_tensor::<f32>() {
            return up_probability_from(data.1);
        }
    }
    Err("no float tensor among model outputs".to_string())
}

fn up_probability_from(values: &[f32]) -> Result<f64, String> {
    match values {
        [] => Err("empty model output".to_string()),
        [score] => Ok(*score as f64),
        [_, up] => Ok(*up as f64),
        other => Err(format!(
            "unexpected model output width {} for a binary classifier",
            other.len()
        )),
    }
}
