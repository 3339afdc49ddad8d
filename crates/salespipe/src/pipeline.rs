//! Pipeline orchestration: extract, transform, load.

use std::path::PathBuf;

use indexmap::IndexMap;
use log::info;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::Result;
use crate::extract::{Extractor, ExtractorConfig};
use crate::load::load;
use crate::transform::transform;

/// Configuration for one pipeline run.
///
/// Everything the run needs is carried here explicitly; there is no
/// ambient state, and the database connection lives only for the
/// duration of [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the transactions CSV.
    pub transactions_path: PathBuf,
    /// Path to the customers CSV.
    pub customers_path: PathBuf,
    /// Path to the SQLite database file (created if missing).
    pub database_path: PathBuf,
    /// Name of the reporting table. Fully replaced on every run.
    pub reporting_table: String,
    /// Extractor configuration.
    pub extractor: ExtractorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transactions_path: PathBuf::from("transactions.csv"),
            customers_path: PathBuf::from("customers.csv"),
            database_path: PathBuf::from("sales_data.db"),
            reporting_table: "sales_report".to_string(),
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Rows read from the transactions source.
    pub transactions_read: usize,
    /// Rows read from the customers source.
    pub customers_read: usize,
    /// Rows written to the reporting table.
    pub rows_loaded: usize,
    /// Transactions that matched no customer (still loaded, with empty
    /// customer fields).
    pub unmatched_transactions: usize,
    /// City values outside the normalization table, with counts.
    pub unmapped_cities: IndexMap<String, usize>,
    /// Name of the reporting table that was replaced.
    pub reporting_table: String,
}

/// The batch ETL pipeline.
///
/// Single-threaded, synchronous in shape: the whole dataset is
/// materialized in memory, transformed once, and loaded. One invocation
/// is independent of any other.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Extractor,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        let extractor = Extractor::with_config(config.extractor.clone());
        Self { config, extractor }
    }

    /// Run extract, transform, and load once.
    ///
    /// A missing source file aborts before the transform; a storage
    /// failure during load ends the run with the in-memory result
    /// discarded. The transform itself has no failure path.
    pub async fn run(&self) -> Result<RunSummary> {
        let (transactions, tx_meta) = self
            .extractor
            .read_transactions(&self.config.transactions_path)?;
        let (customers, cust_meta) = self
            .extractor
            .read_customers(&self.config.customers_path)?;
        info!(
            "extracted {} transactions, {} customers",
            tx_meta.row_count, cust_meta.row_count
        );

        let (rows, report) = transform(&transactions, &customers);
        info!("transformed {} reporting rows", report.rows);

        let options = SqliteConnectOptions::new()
            .filename(&self.config.database_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let rows_loaded = load(&pool, &self.config.reporting_table, &rows).await?;
        pool.close().await;

        Ok(RunSummary {
            transactions_read: tx_meta.row_count,
            customers_read: cust_meta.row_count,
            rows_loaded,
            unmatched_transactions: report.unmatched_transactions,
            unmapped_cities: report.unmapped_cities,
            reporting_table: self.config.reporting_table.clone(),
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
