use log::info;

use crate::error::{LedgerError, Result};
use crate::importer::parse_value;
use crate::models::{Ledger, NewTransaction, Transaction, TransactionType};
use crate::reports::{balance_of, get_balance};
use crate::resolver::resolve_categories;
use crate::store::LedgerStore;

/// Category used by `add` when none is given.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

pub fn list_transactions<S: LedgerStore + ?Sized>(store: &S) -> Result<Ledger> {
    let transactions = store.find_all_transactions()?;
    let balance = balance_of(&transactions);
    Ok(Ledger {
        transactions,
        balance,
    })
}

/// Record a single transaction, creating its category if needed. An
/// outcome larger than the current balance is refused.
pub fn create_transaction<S: LedgerStore + ?Sized>(
    store: &mut S,
    title: &str,
    value: &str,
    kind: &str,
    category: &str,
) -> Result<Transaction> {
    let title = title.trim();
    if title.is_empty() {
        return Err(LedgerError::validation("Transaction title is required"));
    }
    let kind: TransactionType = kind
        .trim()
        .parse()
        .map_err(|_| LedgerError::validation(format!("Transaction type '{}' is invalid", kind.trim())))?;
    let value = parse_value(value)
        .ok_or_else(|| LedgerError::validation(format!("Transaction value '{}' is invalid", value.trim())))?;

    if kind == TransactionType::Outcome && value > get_balance(&*store)?.total {
        return Err(LedgerError::validation("Insufficient balance"));
    }

    let category_title = match category.trim() {
        "" => DEFAULT_CATEGORY,
        c => c,
    }
    .to_string();
    let resolution = resolve_categories(store, std::slice::from_ref(&category_title))?;
    let category = resolution
        .table
        .get(&category_title)
        .cloned()
        .ok_or_else(|| LedgerError::Other(format!("unresolved category: {category_title}")))?;

    let mut created = store.create_transactions(&[NewTransaction {
        title: title.to_string(),
        value,
        kind,
        category,
    }])?;
    let transaction = created
        .pop()
        .ok_or_else(|| LedgerError::Other("transaction was not stored".to_string()))?;
    info!("created transaction {} ({})", transaction.id, transaction.title);
    Ok(transaction)
}

pub fn delete_transaction<S: LedgerStore + ?Sized>(store: &mut S, id: &str) -> Result<()> {
    if !store.delete_transaction(id)? {
        return Err(LedgerError::validation("Transaction not found"));
    }
    info!("deleted transaction {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::store::SqliteStore;
    use rusqlite::Connection;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_create_and_list() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        create_transaction(&mut store, "Salary", "5000", "income", "Job").unwrap();
        create_transaction(&mut store, "Rent", "1200", "outcome", "Housing").unwrap();
        let ledger = list_transactions(&store).unwrap();
        assert_eq!(ledger.transactions.len(), 2);
        assert_eq!(ledger.balance.total, 3800.0);
    }

    #[test]
    fn test_create_without_category_uses_default() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        let t = create_transaction(&mut store, "Gift", "20", "income", "  ").unwrap();
        assert_eq!(t.category.title, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_create_reuses_category() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        let a = create_transaction(&mut store, "Salary", "5000", "income", "Job").unwrap();
        let b = create_transaction(&mut store, "Bonus", "500", "income", "Job").unwrap();
        assert_eq!(a.category_id, b.category_id);
        assert_eq!(store.find_all_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_type() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        let err = create_transaction(&mut store, "Move", "10", "transfer", "Misc").unwrap_err();
        assert!(err.is_validation());
        assert!(store.find_all_categories().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_invalid_value() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        assert!(create_transaction(&mut store, "Salary", "-5", "income", "Job").is_err());
        assert!(create_transaction(&mut store, "Salary", "five", "income", "Job").is_err());
        assert!(create_transaction(&mut store, " ", "5", "income", "Job").is_err());
    }

    #[test]
    fn test_create_rejects_outcome_over_balance() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        create_transaction(&mut store, "Salary", "100", "income", "Job").unwrap();
        let err = create_transaction(&mut store, "Rent", "150", "outcome", "Housing").unwrap_err();
        assert_eq!(err.to_string(), "Insufficient balance");
        create_transaction(&mut store, "Food", "100", "outcome", "Food").unwrap();
    }

    #[test]
    fn test_delete_transaction() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        let t = create_transaction(&mut store, "Salary", "100", "income", "Job").unwrap();
        delete_transaction(&mut store, &t.id).unwrap();
        assert!(list_transactions(&store).unwrap().transactions.is_empty());
        let err = delete_transaction(&mut store, &t.id).unwrap_err();
        assert_eq!(err.to_string(), "Transaction not found");
    }
}
