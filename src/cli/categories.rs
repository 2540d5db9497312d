use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::store::{LedgerStore, SqliteStore};

use super::open_db;

pub fn list() -> Result<()> {
    let conn = open_db()?;
    let categories = SqliteStore::new(&conn).find_all_categories()?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Created"]);
    for cat in categories {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(cat.title),
            Cell::new(cat.created_at),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
