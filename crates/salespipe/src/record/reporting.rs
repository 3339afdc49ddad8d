//! The derived reporting record and its fixed column order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column order of the reporting table. Must match the field order of
/// [`ReportingRecord`] exactly; a test pins the two together.
pub const REPORT_COLUMNS: [&str; 8] = [
    "transaction_id",
    "full_name",
    "product_name",
    "date",
    "final_price",
    "tax_amount",
    "city",
    "registration_date",
];

/// One row of the denormalized reporting table.
///
/// Customer-derived fields are `None` when a transaction's `user_id`
/// matched no customer (left-outer-join semantics). The raw `price` and
/// `tax_rate` are not retained; only the derived amounts appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingRecord {
    pub transaction_id: i64,
    pub full_name: Option<String>,
    pub product_name: String,
    pub date: NaiveDate,
    /// `price + tax_amount`.
    pub final_price: f64,
    /// `price * tax_rate`.
    pub tax_amount: f64,
    /// Normalized city name.
    pub city: Option<String>,
    pub registration_date: Option<NaiveDate>,
}
