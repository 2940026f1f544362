use crate::domain::errors::SchemaError;
use std::collections::HashSet;

/// Ordered list of feature columns a trained model expects.
///
/// The order MUST match exactly the column order used at training time.
/// Any change is a breaking change for the deployed models. Built once from
/// the artifacts at startup and shared read-only across all requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Builds a schema from an artifact's column list.
    ///
    /// An empty or duplicated column list means a corrupt artifact.
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Schema columns absent from `available`, in schema order.
    pub fn missing_from(&self, available: &HashSet<&str>) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| !available.contains(column.as_str()))
            .cloned()
            .collect()
    }
}
