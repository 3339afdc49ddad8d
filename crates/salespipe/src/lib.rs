//! Salespipe: sales reporting ETL and churn prediction toolkit.
//!
//! The core is a deterministic, pure reporting transform: two raw
//! tabular datasets (transactions, customers) in, one cleaned, joined,
//! reordered reporting dataset out.
//!
//! # Core Principles
//!
//! - **Pure transform**: the transform never fails for well-typed input
//!   and never touches a database or filesystem
//! - **Validated boundaries**: malformed rows are rejected at
//!   extraction, before they can reach the transform
//! - **No ambient state**: configuration is explicit and connections
//!   live only as long as the run that opened them
//!
//! # Example
//!
//! ```no_run
//! use salespipe::{Pipeline, PipelineConfig};
//!
//! # async fn example() -> salespipe::Result<()> {
//! let pipeline = Pipeline::with_config(PipelineConfig::default());
//! let summary = pipeline.run().await?;
//!
//! println!("Loaded {} rows into '{}'", summary.rows_loaded, summary.reporting_table);
//! # Ok(())
//! # }
//! ```

pub mod churn;
pub mod error;
pub mod extract;
pub mod load;
pub mod record;
pub mod transform;

mod pipeline;

pub use crate::pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use churn::{
    ChurnModel, ChurnObservation, ChurnPrediction, ContractTerm, TrainingConfig, TrainingSummary,
};
pub use error::{Result, SalespipeError};
pub use extract::{Extractor, ExtractorConfig, SourceMetadata};
pub use record::{CustomerRecord, REPORT_COLUMNS, ReportingRecord, TransactionRecord};
pub use transform::{TransformReport, transform};
