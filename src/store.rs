use rusqlite::{params_from_iter, Connection, Row};

use crate::db::timestamp;
use crate::error::Result;
use crate::models::{Category, NewTransaction, Transaction, TransactionType};

/// Titles per `IN (...)` query; keeps well under SQLite's variable limit.
const TITLE_CHUNK: usize = 500;

/// Persistence port used by the import pipeline, the balance report and the
/// CRUD commands. Each write method is one batch: it either stores every
/// record it was given or none of them.
pub trait LedgerStore {
    fn find_categories_by_titles(&self, titles: &[String]) -> Result<Vec<Category>>;
    fn create_categories(&mut self, titles: &[String]) -> Result<Vec<Category>>;
    fn create_transactions(&mut self, rows: &[NewTransaction]) -> Result<Vec<Transaction>>;
    fn find_all_transactions(&self) -> Result<Vec<Transaction>>;
    fn find_all_categories(&self) -> Result<Vec<Category>>;
    /// Returns `false` when no transaction has that id.
    fn delete_transaction(&mut self, id: &str) -> Result<bool>;
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

fn category_from_row(row: &Row, offset: usize) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(offset)?,
        title: row.get(offset + 1)?,
        created_at: row.get(offset + 2)?,
        updated_at: row.get(offset + 3)?,
    })
}

fn kind_from_row(row: &Row, idx: usize) -> rusqlite::Result<TransactionType> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("invalid transaction type: {raw}").into(),
        )
    })
}

impl LedgerStore for SqliteStore<'_> {
    fn find_categories_by_titles(&self, titles: &[String]) -> Result<Vec<Category>> {
        let mut found = Vec::new();
        for chunk in titles.chunks(TITLE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT id, title, created_at, updated_at FROM categories \
                 WHERE title IN ({placeholders}) ORDER BY rowid"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| category_from_row(row, 0))?;
            for row in rows {
                found.push(row?);
            }
        }
        Ok(found)
    }

    fn create_categories(&mut self, titles: &[String]) -> Result<Vec<Category>> {
        let now = timestamp();
        let tx = self.conn.unchecked_transaction()?;
        let mut created = Vec::with_capacity(titles.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO categories (id, title, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            )?;
            for title in titles {
                let category = Category {
                    id: uuid::Uuid::new_v4().to_string(),
                    title: title.clone(),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                };
                stmt.execute(rusqlite::params![category.id, category.title, now])?;
                created.push(category);
            }
        }
        tx.commit()?;
        Ok(created)
    }

    fn create_transactions(&mut self, rows: &[NewTransaction]) -> Result<Vec<Transaction>> {
        let now = timestamp();
        let tx = self.conn.unchecked_transaction()?;
        let mut created = Vec::with_capacity(rows.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transactions (id, title, value, type, category_id, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            )?;
            for row in rows {
                let id = uuid::Uuid::new_v4().to_string();
                stmt.execute(rusqlite::params![
                    id,
                    row.title,
                    row.value,
                    row.kind.as_str(),
                    row.category.id,
                    now,
                ])?;
                created.push(Transaction {
                    id,
                    title: row.title.clone(),
                    value: row.value,
                    kind: row.kind,
                    category_id: row.category.id.clone(),
                    category: row.category.clone(),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                });
            }
        }
        tx.commit()?;
        Ok(created)
    }

    fn find_all_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.title, t.value, t.type, t.category_id, t.created_at, t.updated_at, \
                    c.id, c.title, c.created_at, c.updated_at \
             FROM transactions t JOIN categories c ON t.category_id = c.id \
             ORDER BY t.rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Transaction {
                id: row.get(0)?,
                title: row.get(1)?,
                value: row.get(2)?,
                kind: kind_from_row(row, 3)?,
                category_id: row.get(4)?,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
                category: category_from_row(row, 7)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn find_all_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, created_at, updated_at FROM categories ORDER BY title, rowid")?;
        let rows = stmt.query_map([], |row| category_from_row(row, 0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn delete_transaction(&mut self, id: &str) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}
