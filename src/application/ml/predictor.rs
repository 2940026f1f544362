use crate::domain::table::FeatureVector;

/// Interface to one trained directional classifier.
///
/// Implementations must be deterministic and side-effect-free: the same
/// vector scored twice yields the identical probability.
pub trait HorizonClassifier: Send + Sync {
    /// Probability of an upward move over the classifier's horizon.
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, String>;

    /// Model name, for logs.
    fn name(&self) -> &str;
}
