//! Audit report produced alongside the transformed rows.

use indexmap::IndexMap;
use serde::Serialize;

/// What the transform observed while producing the reporting rows.
///
/// Unmapped city values and unmatched join keys are not errors (the
/// output contract is passthrough / null), but they are surfaced here so
/// callers can flag the gaps instead of discovering them downstream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformReport {
    /// Number of reporting rows produced. Always equals the number of
    /// input transactions.
    pub rows: usize,
    /// Distinct city values outside the normalization table, with
    /// occurrence counts, in first-seen order.
    pub unmapped_cities: IndexMap<String, usize>,
    /// Transactions whose `user_id` matched no customer.
    pub unmatched_transactions: usize,
}

impl TransformReport {
    pub(crate) fn record_unmapped_city(&mut self, city: &str) {
        *self.unmapped_cities.entry(city.to_string()).or_insert(0) += 1;
    }

    /// True when the transform hit a normalization or join gap.
    pub fn has_gaps(&self) -> bool {
        !self.unmapped_cities.is_empty() || self.unmatched_transactions > 0
    }
}
