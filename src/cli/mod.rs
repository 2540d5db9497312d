pub mod categories;
pub mod import;
pub mod init;
pub mod transactions;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::load_settings;

/// Open the configured ledger database, creating the schema if needed.
pub(crate) fn open_db() -> Result<Connection> {
    let settings = load_settings();
    std::fs::create_dir_all(&settings.data_dir)?;
    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;
    Ok(conn)
}

#[derive(Parser)]
#[command(name = "tally", about = "Income/outcome ledger with bulk CSV import.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for ledger data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import transactions from a CSV file (title,type,value,category).
    Import {
        /// Path to the CSV file; the file itself is left untouched
        file: String,
        /// Print created transactions as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all transactions with the current balance.
    List {
        /// Print `{ transactions, balance }` as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a single transaction.
    Add {
        /// Transaction title
        title: String,
        /// Transaction type: income or outcome
        #[arg(long = "type")]
        kind: String,
        /// Amount (non-negative)
        #[arg(long)]
        value: String,
        /// Category title; created if it does not exist
        #[arg(long, default_value = "")]
        category: String,
        /// Print the created transaction as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a transaction by ID.
    Delete {
        /// Transaction ID (shown in `tally list`)
        id: String,
    },
    /// List categories.
    Categories,
}
