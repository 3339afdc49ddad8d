//! Run command - execute the reporting pipeline once.

use std::path::PathBuf;

use colored::Colorize;
use salespipe::{Pipeline, PipelineConfig};

pub fn run(
    transactions: PathBuf,
    customers: PathBuf,
    database: PathBuf,
    table: String,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig {
        transactions_path: transactions,
        customers_path: customers,
        database_path: database.clone(),
        reporting_table: table,
        ..PipelineConfig::default()
    };

    if verbose {
        println!("Sources: {}", config.transactions_path.display());
        println!("         {}", config.customers_path.display());
        println!("Target:  {} in {}", config.reporting_table, database.display());
    }

    let pipeline = Pipeline::with_config(config);
    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(pipeline.run())?;

    println!(
        "{} {} rows into '{}'",
        "Loaded".green().bold(),
        summary.rows_loaded.to_string().white().bold(),
        summary.reporting_table
    );
    println!(
        "  {} transactions, {} customers read",
        summary.transactions_read, summary.customers_read
    );

    if summary.unmatched_transactions > 0 {
        println!(
            "{} {} transactions matched no customer (loaded with empty customer fields)",
            "Warning:".yellow().bold(),
            summary.unmatched_transactions
        );
    }
    if !summary.unmapped_cities.is_empty() {
        println!(
            "{} city values outside the normalization table (passed through):",
            "Warning:".yellow().bold()
        );
        for (city, count) in &summary.unmapped_cities {
            println!("  '{}' ({} rows)", city, count);
        }
    }

    Ok(())
}
