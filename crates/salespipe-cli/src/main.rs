//! salespipe CLI - sales reporting ETL and churn prediction tools.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            transactions,
            customers,
            database,
            table,
        } => commands::run::run(transactions, customers, database, table, cli.verbose),

        Commands::Train {
            database,
            table,
            output,
            epochs,
            learning_rate,
            seed,
        } => commands::train::run(database, table, output, epochs, learning_rate, seed, cli.verbose),

        Commands::Serve { model, port } => commands::serve::run(model, port, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
