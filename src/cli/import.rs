use std::path::PathBuf;

use crate::error::Result;
use crate::importer::import_file;
use crate::settings::load_settings;
use crate::store::SqliteStore;
use crate::upload::stage;

use super::open_db;
use super::transactions::transactions_table;

pub fn run(file: &str, json: bool) -> Result<()> {
    let file_path = PathBuf::from(file);
    let staged = stage(&file_path, &load_settings().uploads_path())?;

    let conn = open_db()?;
    let mut store = SqliteStore::new(&conn);
    let result = import_file(&mut store, &staged)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.transactions)?);
        return Ok(());
    }

    println!("Imported\n{}", transactions_table(&result.transactions));
    println!(
        "{} imported, {} new categories",
        result.transactions.len(),
        result.new_categories.len()
    );
    Ok(())
}
