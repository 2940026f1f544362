//! Multi-horizon scoring over one aligned feature vector.

use crate::application::ml::predictor::HorizonClassifier;
use crate::domain::errors::PredictionError;
use crate::domain::horizon::Horizon;
use crate::domain::table::FeatureVector;
use std::sync::Arc;
use tracing::error;

/// Classification threshold: probability at or above this labels an
/// up-move. Fixed design constant, identical for every horizon.
pub const LABEL_THRESHOLD: f64 = 0.5;

/// Probability and derived label for one horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringResult {
    pub probability: f64,
    pub label: u8,
}

/// One result per horizon, all computed from the identical vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonScores {
    pub one_day: ScoringResult,
    pub five_day: ScoringResult,
    pub twenty_day: ScoringResult,
}

/// Holds one classifier per horizon and applies each to the same vector.
///
/// Classifiers are invoked independently; the first failing horizon fails
/// the whole call, so a partial multi-horizon response never escapes.
pub struct MultiHorizonScorer {
    one_day: Arc<dyn HorizonClassifier>,
    five_day: Arc<dyn HorizonClassifier>,
    twenty_day: Arc<dyn HorizonClassifier>,
}

impl MultiHorizonScorer {
    pub fn new(
        one_day: Arc<dyn HorizonClassifier>,
        five_day: Arc<dyn HorizonClassifier>,
        twenty_day: Arc<dyn HorizonClassifier>,
    ) -> Self {
        Self {
            one_day,
            five_day,
            twenty_day,
        }
    }

    pub fn score(&self, vector: &FeatureVector) -> Result<HorizonScores, PredictionError> {
        Ok(HorizonScores {
            one_day: self.score_horizon(Horizon::OneDay, vector)?,
            five_day: self.score_horizon(Horizon::FiveDay, vector)?,
            twenty_day: self.score_horizon(Horizon::TwentyDay, vector)?,
        })
    }

    fn classifier(&self, horizon: Horizon) -> &dyn HorizonClassifier {
        match horizon {
            Horizon::OneDay => self.one_day.as_ref(),
            Horizon::FiveDay => self.five_day.as_ref(),
            Horizon::TwentyDay => self.twenty_day.as_ref(),
        }
    }

    fn score_horizon(
        &self,
        horizon: Horizon,
        vector: &FeatureVector,
    ) -> Result<ScoringResult, PredictionError> {
        let classifier = self.classifier(horizon);

        let probability = classifier.predict_proba(vector).map_err(|reason| {
            // Full diagnostics stay server-side; the caller sees an opaque kind.
            error!(
                "Scoring failed for horizon {} ({}): {}",
                horizon,
                classifier.name(),
                reason
            );
            PredictionError::ScoringFailure { horizon }
        })?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            error!(
                "Classifier {} returned out-of-range probability {} for horizon {}",
                classifier.name(),
                probability,
                horizon
            );
            return Err(PredictionError::ScoringFailure { horizon });
        }

        Ok(ScoringResult {
            probability,
            label: u8::from(probability >= LABEL_THRESHOLD),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbability(f64);

    impl HorizonClassifier for FixedProbability {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, String> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Failing;

    impl HorizonClassifier for Failing {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, String> {
            Err("model exploded".to_string())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn scorer(p1: f64, p5: f64, p20: f64) -> MultiHorizonScorer {
        MultiHorizonScorer::new(
            Arc::new(FixedProbability(p1)),
            Arc::new(FixedProbability(p5)),
            Arc::new(FixedProbability(p20)),
        )
    }

    fn vector() -> FeatureVector {
        FeatureVector::new(vec![0.0, 0.0])
    }

    #[test]
    fn test_labels_derived_per_horizon() {
        let scores = scorer(0.2, 0.6, 0.9).score(&vector()).unwrap();
        assert_eq!(scores.one_day.label, 0);
        assert_eq!(scores.five_day.label, 1);
        assert_eq!(scores.twenty_day.label, 1);
    }

    #[test]
    fn test_threshold_is_inclusive_on_the_upper_side() {
        let scores = scorer(0.5, 0.5, 0.5).score(&vector()).unwrap();
        assert_eq!(scores.one_day.label, 1);
        assert_eq!(scores.five_day.label, 1);
        assert_eq!(scores.twenty_day.label, 1);
    }

    #[test]
    fn test_failing_horizon_fails_the_whole_call() {
        let scorer = MultiHorizonScorer::new(
            Arc::new(FixedProbability(0.4)),
            Arc::new(Failing),
            Arc::new(FixedProbability(0.4)),
        );
        let result = scorer.score(&vector());
        assert_eq!(
            result.unwrap_err(),
            PredictionError::ScoringFailure {
                horizon: Horizon::FiveDay
            }
        );
    }

    #[test]
    fn test_out_of_range_probability_is_a_contract_violation() {
        for bad in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let result = scorer(bad, 0.5, 0.5).score(&vector());
            assert_eq!(
                result.unwrap_err(),
                PredictionError::ScoringFailure {
                    horizon: Horizon::OneDay
                }
            );
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = scorer(0.42, 0.42, 0.42);
        let first = scorer.score(&vector()).unwrap();
        let second = scorer.score(&vector()).unwrap();
        assert_eq!(first, second);
    }
}
