//! Request normalization: the validation half of the inference contract.
//!
//! Turns arbitrary caller-supplied rows into a table the aligner can trust:
//! required columns present, timestamps parsed and sorted, gaps
//! forward-filled, every feature cell a finite number. Fails as a whole or
//! succeeds as a whole; a partially valid request never produces a table.

use crate::domain::errors::PredictionError;
use crate::domain::rows::{self, RawRow};
use crate::domain::schema::FeatureSchema;
use crate::domain::table::NormalizedTable;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashSet;

/// Validates and orders raw request rows against the model schema.
#[derive(Debug, Clone)]
pub struct RequestNormalizer {
    timestamp_column: String,
}

impl RequestNormalizer {
    pub fn new(timestamp_column: impl Into<String>) -> Self {
        Self {
            timestamp_column: timestamp_column.into(),
        }
    }

    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    /// Runs the full validation pipeline over the request rows.
    ///
    /// Check order is part of the contract: empty input, then the timestamp
    /// column, then the complete set of missing feature columns, then
    /// timestamp parsing, then (after sort + forward-fill) numeric coercion
    /// of every schema column.
    pub fn normalize(
        &self,
        input: &[RawRow],
        schema: &FeatureSchema,
    ) -> Result<NormalizedTable, PredictionError> {
        if input.is_empty() {
            return Err(PredictionError::EmptyInput);
        }

        // The column set is the union of every row's keys, matching how a
        // column-oriented frame would see the payload.
        let present: HashSet<&str> = input
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();

        if !present.contains(self.timestamp_column.as_str()) {
            return Err(PredictionError::MissingField {
                column: self.timestamp_column.clone(),
            });
        }

        // Report every absent feature column in one failure, before any
        // value-level conversion runs.
        let missing = schema.missing_from(&present);
        if !missing.is_empty() {
            return Err(PredictionError::MissingFeatureColumns { columns: missing });
        }

        let sorted = self.sort_by_timestamp(input)?;
        let features = fill_and_coerce(&sorted, schema)?;

        let (timestamps, source_rows): (Vec<_>, Vec<_>) = sorted.into_iter().unzip();
        Ok(NormalizedTable::new(timestamps, features, source_rows))
    }

    /// Parses every row's timestamp and stably sorts rows ascending.
    ///
    /// A row without a parseable timestamp (absent, null, wrong type, wrong
    /// format) fails the whole request; there is no natural place for such a
    /// row in a chronological table.
    fn sort_by_timestamp(
        &self,
        input: &[RawRow],
    ) -> Result<Vec<(NaiveDate, RawRow)>, PredictionError> {
        let mut stamped = Vec::with_capacity(input.len());
        for row in input {
            let cell = row.get(&self.timestamp_column).unwrap_or(&Value::Null);
            let timestamp =
                rows::parse_timestamp(cell).ok_or_else(|| PredictionError::InvalidTimestamp {
                    value: rows::display_cell(cell),
                })?;
            stamped.push((timestamp, row.clone()));
        }
        // Stable: rows sharing a timestamp keep their original relative order.
        stamped.sort_by_key(|(timestamp, _)| *timestamp);
        Ok(stamped)
    }
}

/// Forward-fills and coerces every schema column over the sorted rows.
///
/// Each column is filled independently: a missing cell takes the nearest
/// earlier non-missing value; leading gaps stay missing (no backward fill)
/// and are reported as non-numeric. Coercion never touches extraneous
/// columns, so the failure always names a column the models actually need.
fn fill_and_coerce(
    sorted: &[(NaiveDate, RawRow)],
    schema: &FeatureSchema,
) -> Result<Vec<Vec<f64>>, PredictionError> {
    let mut features = vec![vec![0.0; schema.len()]; sorted.len()];
    let mut bad_columns: Vec<String> = Vec::new();

    for (col_idx, column) in schema.iter().enumerate() {
        let mut carried: Option<&Value> = None;
        let mut column_ok = true;

        for (row_idx, (_, row)) in sorted.iter().enumerate() {
            let cell = row
                .get(column)
                .filter(|value| !rows::is_missing(value))
                .or(carried);

            match cell {
                Some(value) => {
                    carried = Some(value);
                    match rows::coerce_numeric(value) {
                        Some(number) => features[row_idx][col_idx] = number,
                        None => column_ok = false,
                    }
                }
                // Leading gap: forward-fill only, nothing to take from.
                None => column_ok = false,
            }
        }

        if !column_ok {
            bad_columns.push(column.to_string());
        }
    }

    if !bad_columns.is_empty() {
        return Err(PredictionError::NonNumericFeature {
            columns: bad_columns,
        });
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn normalizer() -> RequestNormalizer {
        RequestNormalizer::new("日期")
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = normalizer().normalize(&[], &schema(&["a"]));
        assert_eq!(result.unwrap_err(), PredictionError::EmptyInput);
    }

    #[test]
    fn test_missing_timestamp_column_rejected() {
        let input = vec![row(&[("a", json!(1.0))])];
        let result = normalizer().normalize(&input, &schema(&["a"]));
        assert_eq!(
            result.unwrap_err(),
            PredictionError::MissingField {
                column: "日期".into()
            }
        );
    }

    #[test]
    fn test_all_missing_feature_columns_reported_at_once() {
        let input = vec![row(&[("日期", json!("2025-01-28")), ("b", json!(1.0))])];
        let result = normalizer().normalize(&input, &schema(&["a", "b", "c"]));
        assert_eq!(
            result.unwrap_err(),
            PredictionError::MissingFeatureColumns {
                columns: vec!["a".into(), "c".into()]
            }
        );
    }

    #[test]
    fn test_unparseable_timestamp_rejected() {
        let input = vec![row(&[("日期", json!("not-a-date")), ("a", json!(1.0))])];
        let result = normalizer().normalize(&input, &schema(&["a"]));
        assert_eq!(
            result.unwrap_err(),
            PredictionError::InvalidTimestamp {
                value: "not-a-date".into()
            }
        );
    }

    #[test]
    fn test_null_timestamp_in_one_row_rejected() {
        let input = vec![
            row(&[("日期", json!("2025-01-27")), ("a", json!(1.0))]),
            row(&[("日期", json!(null)), ("a", json!(2.0))]),
        ];
        let result = normalizer().normalize(&input, &schema(&["a"]));
        assert!(matches!(
            result.unwrap_err(),
            PredictionError::InvalidTimestamp { .. }
        ));
    }

    #[test]
    fn test_rows_sorted_ascending_by_timestamp() {
        let input = vec![
            row(&[("日期", json!("2025-01-28")), ("a", json!(2.0))]),
            row(&[("日期", json!("2025-01-27")), ("a", json!(1.0))]),
        ];
        let table = normalizer().normalize(&input, &schema(&["a"])).unwrap();
        assert_eq!(table.features(), &[vec![1.0], vec![2.0]]);
        assert!(table.timestamps()[0] < table.timestamps()[1]);
    }

    #[test]
    fn test_timestamp_ties_keep_original_relative_order() {
        let input = vec![
            row(&[("日期", json!("2025-01-28")), ("a", json!(1.0))]),
            row(&[("日期", json!("2025-01-28")), ("a", json!(2.0))]),
        ];
        let table = normalizer().normalize(&input, &schema(&["a"])).unwrap();
        assert_eq!(table.features(), &[vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_forward_fill_takes_nearest_earlier_value() {
        let input = vec![
            row(&[("日期", json!("2025-01-26")), ("a", json!(1.5))]),
            row(&[("日期", json!("2025-01-27")), ("a", json!(null))]),
            row(&[("日期", json!("2025-01-28")), ("a", json!(null))]),
        ];
        let table = normalizer().normalize(&input, &schema(&["a"])).unwrap();
        assert_eq!(table.features(), &[vec![1.5], vec![1.5], vec![1.5]]);
    }

    #[test]
    fn test_forward_fill_applies_in_sorted_order_not_input_order() {
        // The gap row arrives first in the payload but sits last in time.
        let input = vec![
            row(&[("日期", json!("2025-01-28")), ("a", json!(null))]),
            row(&[("日期", json!("2025-01-27")), ("a", json!(4.0))]),
        ];
        let table = normalizer().normalize(&input, &schema(&["a"])).unwrap();
        assert_eq!(table.features(), &[vec![4.0], vec![4.0]]);
    }

    #[test]
    fn test_leading_gap_is_not_backfilled() {
        let input = vec![
            row(&[("日期", json!("2025-01-27")), ("a", json!(null))]),
            row(&[("日期", json!("2025-01-28")), ("a", json!(1.0))]),
        ];
        let result = normalizer().normalize(&input, &schema(&["a"]));
        assert_eq!(
            result.unwrap_err(),
            PredictionError::NonNumericFeature {
                columns: vec!["a".into()]
            }
        );
    }

    #[test]
    fn test_non_numeric_columns_reported_in_schema_order() {
        let input = vec![row(&[
            ("日期", json!("2025-01-28")),
            ("a", json!("oops")),
            ("b", json!(1.0)),
            ("c", json!("also bad")),
        ])];
        let result = normalizer().normalize(&input, &schema(&["a", "b", "c"]));
        assert_eq!(
            result.unwrap_err(),
            PredictionError::NonNumericFeature {
                columns: vec!["a".into(), "c".into()]
            }
        );
    }

    #[test]
    fn test_extraneous_columns_preserved_but_never_coerced() {
        let input = vec![row(&[
            ("日期", json!("2025-01-28")),
            ("ETF代碼", json!("SPY")),
            ("a", json!(1.0)),
        ])];
        let table = normalizer().normalize(&input, &schema(&["a"])).unwrap();
        assert_eq!(table.features(), &[vec![1.0]]);
        assert_eq!(table.source_rows()[0]["ETF代碼"], json!("SPY"));
    }

    #[test]
    fn test_numeric_strings_coerced() {
        let input = vec![row(&[("日期", json!("2025-01-28")), ("a", json!("2.5"))])];
        let table = normalizer().normalize(&input, &schema(&["a"])).unwrap();
        assert_eq!(table.features(), &[vec![2.5]]);
    }
}
