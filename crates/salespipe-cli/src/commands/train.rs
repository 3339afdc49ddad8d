//! Train command - fit the churn classifier and save it.

use std::path::PathBuf;

use colored::Colorize;
use salespipe::TrainingConfig;
use salespipe::churn::train_from_database;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub fn run(
    database: PathBuf,
    table: String,
    output: PathBuf,
    epochs: usize,
    learning_rate: f64,
    seed: u64,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !database.exists() {
        return Err(format!("Database not found: {}", database.display()).into());
    }

    let config = TrainingConfig {
        feature_table: table,
        epochs,
        learning_rate,
        seed,
        ..TrainingConfig::default()
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let (model, summary) = runtime.block_on(async {
        // Connection lives only for the training run.
        let options = SqliteConnectOptions::new().filename(&database);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let result = train_from_database(&pool, &config).await;
        pool.close().await;
        result
    })?;

    model.save(&output)?;

    println!(
        "{} churn model to {}",
        "Saved".green().bold(),
        output.display().to_string().cyan()
    );
    println!(
        "  {} rows read, {} train / {} test, holdout accuracy {:.1}%",
        summary.rows_read,
        summary.train_rows,
        summary.test_rows,
        summary.holdout_accuracy * 100.0
    );
    if summary.rows_skipped > 0 {
        println!(
            "{} {} rows skipped (unparseable contract or label)",
            "Warning:".yellow().bold(),
            summary.rows_skipped
        );
    }

    if verbose {
        for (name, weight) in model.feature_names.iter().zip(&model.weights) {
            println!("  weight[{}] = {:+.4}", name, weight);
        }
    }

    Ok(())
}
