//! Feature alignment: the projection half of the inference contract.

use crate::domain::schema::FeatureSchema;
use crate::domain::table::{FeatureVector, NormalizedTable};

/// Projects the most recent normalized observation onto schema order.
pub struct FeatureAligner;

impl FeatureAligner {
    /// Selects the last (most recent) row of the sorted table.
    ///
    /// Pure and total: the table already carries every schema column in
    /// schema order, so alignment cannot fail once normalization succeeded.
    /// Output length equals the schema length, element i is the value of
    /// schema column i in the selected row.
    pub fn align(table: &NormalizedTable, schema: &FeatureSchema) -> FeatureVector {
        let last = table.last_row();
        debug_assert_eq!(last.len(), schema.len());
        FeatureVector::new(last.to_vec())
    }
}
