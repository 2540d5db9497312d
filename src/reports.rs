use crate::error::Result;
use crate::models::{Balance, Transaction, TransactionType};
use crate::store::LedgerStore;

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

pub fn balance_of(transactions: &[Transaction]) -> Balance {
    let (income, outcome) = transactions
        .iter()
        .fold((0.0, 0.0), |(income, outcome), t| match t.kind {
            TransactionType::Income => (income + t.value, outcome),
            TransactionType::Outcome => (income, outcome + t.value),
        });
    Balance {
        income,
        outcome,
        total: income - outcome,
    }
}

/// Recomputed from every stored transaction on each call.
pub fn get_balance<S: LedgerStore + ?Sized>(store: &S) -> Result<Balance> {
    Ok(balance_of(&store.find_all_transactions()?))
}
