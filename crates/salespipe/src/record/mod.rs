//! Typed records for the two source datasets and the reporting output.

mod reporting;
mod source;

pub use reporting::{REPORT_COLUMNS, ReportingRecord};
pub use source::{CustomerRecord, SourceRecord, TransactionRecord};
