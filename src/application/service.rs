//! Request orchestration: normalize, align, score.
//!
//! The pipeline order is fixed and nothing is retried; trained models are
//! deterministic, so a retry could not change the outcome.

use crate::application::aligner::FeatureAligner;
use crate::application::normalizer::RequestNormalizer;
use crate::application::scoring::{HorizonScores, MultiHorizonScorer};
use crate::domain::errors::PredictionError;
use crate::domain::rows::RawRow;
use crate::domain::schema::FeatureSchema;
use crate::infrastructure::observability::Metrics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// The six-field response contract: one probability/label pair per horizon,
/// all derived from one shared feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prob_1d: f64,
    pub label_1d: u8,
    pub prob_5d: f64,
    pub label_5d: u8,
    pub prob_20d: f64,
    pub label_20d: u8,
}

impl From<HorizonScores> for PredictionResponse {
    fn from(scores: HorizonScores) -> Self {
        Self {
            prob_1d: scores.one_day.probability,
            label_1d: scores.one_day.label,
            prob_5d: scores.five_day.probability,
            label_5d: scores.five_day.label,
            prob_20d: scores.twenty_day.probability,
            label_20d: scores.twenty_day.label,
        }
    }
}

/// Stateless per-request pipeline over process-wide read-only model state.
pub struct PredictionService {
    schema: Arc<FeatureSchema>,
    normalizer: RequestNormalizer,
    scorer: MultiHorizonScorer,
    metrics: Metrics,
}

impl PredictionService {
    pub fn new(
        schema: Arc<FeatureSchema>,
        normalizer: RequestNormalizer,
        scorer: MultiHorizonScorer,
        metrics: Metrics,
    ) -> Self {
        Self {
            schema,
            normalizer,
            scorer,
            metrics,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Runs one request through the pipeline and records its outcome.
    pub fn predict(&self, rows: &[RawRow]) -> Result<PredictionResponse, PredictionError> {
        let started = Instant::now();
        let result = self.run_pipeline(rows);

        match &result {
            Ok(_) => {
                self.metrics.requests_total.with_label_values(&["ok"]).inc();
            }
            Err(error) => {
                let outcome = if error.is_client_error() {
                    debug!("Rejected request: {}", error);
                    "rejected"
                } else {
                    "failed"
                };
                self.metrics
                    .requests_total
                    .with_label_values(&[outcome])
                    .inc();
                self.metrics
                    .errors_total
                    .with_label_values(&[error.kind()])
                    .inc();
            }
        }
        self.metrics
            .request_latency_seconds
            .observe(started.elapsed().as_secs_f64());

        result
    }

    fn run_pipeline(&self, rows: &[RawRow]) -> Result<PredictionResponse, PredictionError> {
        let table = self.normalizer.normalize(rows, &self.schema)?;
        let vector = FeatureAligner::align(&table, &self.schema);
        let scores = self.scorer.score(&vector)?;
        Ok(PredictionResponse::from(scores))
    }
}
