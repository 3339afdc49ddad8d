//! Serve command - run the churn prediction API.

use std::path::PathBuf;

use colored::Colorize;
use salespipe::ChurnModel;

use crate::server::{app, state::AppState};

pub fn run(model: PathBuf, port: u16, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let churn_model = ChurnModel::load(&model)?;

    if verbose {
        println!(
            "Model trained {} (holdout accuracy {:.1}%)",
            churn_model.trained_at,
            churn_model.holdout_accuracy * 100.0
        );
    }

    let state = AppState::new(churn_model, model.clone());

    println!(
        "{} {}",
        "Starting prediction server at".cyan().bold(),
        format!("http://localhost:{}", port).white().bold()
    );
    println!("  Model: {}", model.display());
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        if let Err(e) = app::run_server(state, port).await {
            eprintln!("Server error: {}", e);
        }
    });

    println!();
    println!("{}", "Shutting down...".yellow());

    Ok(())
}
