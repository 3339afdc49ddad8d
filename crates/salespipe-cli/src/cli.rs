//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// salespipe: sales reporting ETL and churn prediction tools
#[derive(Parser)]
#[command(name = "salespipe")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the reporting pipeline: extract, transform, load
    Run {
        /// Path to the transactions CSV
        #[arg(long, default_value = "transactions.csv")]
        transactions: PathBuf,

        /// Path to the customers CSV
        #[arg(long, default_value = "customers.csv")]
        customers: PathBuf,

        /// SQLite database file (created if missing)
        #[arg(short, long, default_value = "sales_data.db")]
        database: PathBuf,

        /// Reporting table name (fully replaced on every run)
        #[arg(short, long, default_value = "sales_report")]
        table: String,
    },

    /// Train the churn classifier from a feature table
    Train {
        /// SQLite database holding the feature table
        #[arg(short, long, default_value = "churn.db")]
        database: PathBuf,

        /// Feature table name
        #[arg(short, long, default_value = "customers")]
        table: String,

        /// Output path for the fitted model
        #[arg(short, long, default_value = "model_churn.json")]
        output: PathBuf,

        /// Gradient descent epochs
        #[arg(long, default_value = "500")]
        epochs: usize,

        /// Gradient descent learning rate
        #[arg(long, default_value = "0.5")]
        learning_rate: f64,

        /// Seed for the train/test shuffle
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Serve churn predictions over HTTP
    Serve {
        /// Path to a fitted model file
        #[arg(short, long, default_value = "model_churn.json")]
        model: PathBuf,

        /// Port for the prediction server
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}
