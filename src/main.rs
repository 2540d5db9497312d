mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod reports;
mod resolver;
mod settings;
mod store;
mod transactions;
mod upload;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("TALLY_LOG", "warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { file, json } => cli::import::run(&file, json),
        Commands::List { json } => cli::transactions::list(json),
        Commands::Add {
            title,
            kind,
            value,
            category,
            json,
        } => cli::transactions::add(&title, &kind, &value, &category, json),
        Commands::Delete { id } => cli::transactions::delete(&id),
        Commands::Categories => cli::categories::list(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(if e.is_validation() { 2 } else { 1 });
    }
}
