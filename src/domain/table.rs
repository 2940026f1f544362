use crate::domain::rows::RawRow;
use chrono::NaiveDate;

/// A validated, chronologically ordered feature table.
///
/// Built only by the normalizer. Guarantees once constructed: at least one
/// row, rows sorted ascending by timestamp (stable for ties), and every row
/// holding exactly one finite value per schema column, in schema order.
/// Extraneous caller columns survive in `source_rows` but are never scored.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    timestamps: Vec<NaiveDate>,
    features: Vec<Vec<f64>>,
    source_rows: Vec<RawRow>,
}

impl NormalizedTable {
    pub(crate) fn new(
        timestamps: Vec<NaiveDate>,
        features: Vec<Vec<f64>>,
        source_rows: Vec<RawRow>,
    ) -> Self {
        debug_assert!(!features.is_empty());
        debug_assert_eq!(timestamps.len(), features.len());
        debug_assert_eq!(timestamps.len(), source_rows.len());
        Self {
            timestamps,
            features,
            source_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Parsed timestamps, ascending.
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Feature values, row-major, in schema column order.
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// The caller's rows in sorted order, extraneous columns included.
    pub fn source_rows(&self) -> &[RawRow] {
        &self.source_rows
    }

    /// The most recent observation, in schema column order.
    pub fn last_row(&self) -> &[f64] {
        // Non-empty by construction (normalization rejects empty input).
        self.features.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The single most-recent feature row handed to every scorer.
///
/// Length and element order match the `FeatureSchema` the models were
/// trained with; all three horizons score this identical vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
