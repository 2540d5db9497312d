use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{money, signed_money};
use crate::models::{Balance, Transaction, TransactionType};
use crate::store::SqliteStore;
use crate::transactions::{create_transaction, delete_transaction, list_transactions};

use super::open_db;

pub(crate) fn transactions_table(transactions: &[Transaction]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Type", "Value", "Category", "Created"]);
    for t in transactions {
        let value = match t.kind {
            TransactionType::Income => signed_money(t.kind, t.value).green().to_string(),
            TransactionType::Outcome => signed_money(t.kind, t.value).red().to_string(),
        };
        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(&t.title),
            Cell::new(t.kind),
            Cell::new(value),
            Cell::new(&t.category.title),
            Cell::new(&t.created_at),
        ]);
    }
    table
}

fn print_balance(balance: &Balance) {
    let total = if balance.total >= 0.0 {
        money(balance.total).green()
    } else {
        money(balance.total).red()
    };
    println!("Income:   {}", money(balance.income));
    println!("Outcome:  {}", money(balance.outcome));
    println!("{}  {total}", "Balance:".bold());
}

pub fn list(json: bool) -> Result<()> {
    let conn = open_db()?;
    let ledger = list_transactions(&SqliteStore::new(&conn))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ledger)?);
        return Ok(());
    }
    println!("Transactions\n{}", transactions_table(&ledger.transactions));
    println!();
    print_balance(&ledger.balance);
    Ok(())
}

pub fn add(title: &str, kind: &str, value: &str, category: &str, json: bool) -> Result<()> {
    let conn = open_db()?;
    let mut store = SqliteStore::new(&conn);
    let transaction = create_transaction(&mut store, title, value, kind, category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transaction)?);
    } else {
        println!(
            "Added {} {}: {} ({})",
            transaction.kind,
            transaction.title,
            money(transaction.value),
            transaction.category.title
        );
    }
    Ok(())
}

pub fn delete(id: &str) -> Result<()> {
    let conn = open_db()?;
    delete_transaction(&mut SqliteStore::new(&conn), id)?;
    println!("Deleted transaction {id}");
    Ok(())
}
