use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Outcome,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Outcome => "outcome",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    /// Exact, case-sensitive match on `income` / `outcome`.
    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "income" => Ok(Self::Income),
            "outcome" => Ok(Self::Outcome),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub title: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: String,
    pub category: Category,
    pub created_at: String,
    pub updated_at: String,
}

/// A transaction linked to its resolved category, ready for insert.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub value: f64,
    pub kind: TransactionType,
    pub category: Category,
}

/// One CSV row after trimming. `kind` and `value` are still raw text;
/// they are checked for the whole batch once the file is drained.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTransaction {
    pub title: String,
    pub kind: String,
    pub value: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Balance {
    pub income: f64,
    pub outcome: f64,
    pub total: f64,
}

/// Body of the list view: every transaction plus the running balance.
#[derive(Debug, Clone, Serialize)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub balance: Balance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse_is_exact() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("outcome".parse(), Ok(TransactionType::Outcome));
        assert!("Income".parse::<TransactionType>().is_err());
        assert!("transfer".parse::<TransactionType>().is_err());
        assert!("".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_transaction_serializes_type_key() {
        let category = Category {
            id: "c1".to_string(),
            title: "Job".to_string(),
            created_at: "2025-01-01 00:00:00".to_string(),
            updated_at: "2025-01-01 00:00:00".to_string(),
        };
        let txn = Transaction {
            id: "t1".to_string(),
            title: "Salary".to_string(),
            value: 5000.0,
            kind: TransactionType::Income,
            category_id: category.id.clone(),
            category,
            created_at: "2025-01-01 00:00:00".to_string(),
            updated_at: "2025-01-01 00:00:00".to_string(),
        };
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["category"]["title"], "Job");
        assert!(json.get("kind").is_none());
    }
}
