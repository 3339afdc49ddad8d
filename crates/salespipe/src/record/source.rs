//! Source record types read from the delimited input files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Field-level checks beyond what type-driven parsing already enforces.
///
/// Violations are reported by the extractor as `InvalidRow` errors so
/// malformed data never reaches the transform.
pub trait SourceRecord {
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// One row of the transactions source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique transaction identifier.
    pub transaction_id: i64,
    /// Foreign key into the customer records.
    pub user_id: i64,
    pub product_name: String,
    pub date: NaiveDate,
    /// Pre-tax price. Non-negative.
    pub price: f64,
    /// Tax as a decimal fraction, e.g. 0.08.
    pub tax_rate: f64,
}

impl SourceRecord for TransactionRecord {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.price < 0.0 {
            return Err(format!("negative price: {}", self.price));
        }
        if self.tax_rate < 0.0 {
            return Err(format!("negative tax_rate: {}", self.tax_rate));
        }
        Ok(())
    }
}

/// One row of the customers source.
///
/// `city` is free text with inconsistent spelling and capitalization;
/// the transform maps it through a fixed normalization table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Unique customer identifier, joined against `TransactionRecord::user_id`.
    pub customer_id: i64,
    pub full_name: String,
    pub city: String,
    pub registration_date: NaiveDate,
}

impl SourceRecord for CustomerRecord {}
