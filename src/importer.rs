use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use log::{debug, info, warn};

use crate::error::{LedgerError, Result};
use crate::models::{Category, CsvTransaction, NewTransaction, Transaction, TransactionType};
use crate::resolver::resolve_categories;
use crate::store::LedgerStore;

/// Data lines carry title, type, value, category and nothing more.
pub const FIELD_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Row validation
// ---------------------------------------------------------------------------

/// Trim the four cells (title, type, value, category) of a raw row. Rows
/// missing a title, type or value are dropped. A blank category is kept as
/// an empty title.
pub fn validate_row(record: &StringRecord) -> Option<CsvTransaction> {
    let cell = |i: usize| record.get(i).map(str::trim).unwrap_or("");
    let (title, kind, value) = (cell(0), cell(1), cell(2));
    if title.is_empty() || kind.is_empty() || value.is_empty() {
        return None;
    }
    Some(CsvTransaction {
        title: title.to_string(),
        kind: kind.to_string(),
        value: value.to_string(),
        category: cell(3).to_string(),
    })
}

/// Remove thousands separators, but only when every group after the first
/// has exactly three digits ("1,200" yes, "1,2,3" no).
fn strip_thousands(int_part: &str) -> Option<String> {
    if !int_part.contains(',') {
        return Some(int_part.to_string());
    }
    let mut groups = int_part.split(',');
    let lead = groups.next()?.trim_start_matches(['+', '-']);
    if lead.is_empty() || lead.len() > 3 || !lead.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    Some(int_part.replace(',', ""))
}

/// Strict amount parse: optional leading `$` and well-placed thousands
/// separators, must be a finite number >= 0.
pub fn parse_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    let cleaned = match s.split_once('.') {
        Some((int_part, frac)) => format!("{}.{frac}", strip_thousands(int_part)?),
        None => strip_thousands(s)?,
    };
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

// ---------------------------------------------------------------------------
// Streaming reader
// ---------------------------------------------------------------------------

/// Finite, non-restartable sequence of validated rows. The header line is
/// skipped and incomplete rows are dropped; the file is read record by
/// record through a buffered reader. A line with more than four fields is
/// an error that ends the batch.
pub struct CsvRows<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    header_skipped: bool,
}

impl CsvRows<BufReader<File>> {
    pub fn open(file_path: &Path) -> Result<Self> {
        let file = File::open(file_path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> CsvRows<R> {
    pub fn from_reader(reader: R) -> Self {
        let records = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Self {
            records,
            header_skipped: false,
        }
    }
}

impl<R: Read> Iterator for CsvRows<R> {
    type Item = Result<CsvTransaction>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };
            if !self.header_skipped {
                self.header_skipped = true;
                continue;
            }
            if record.len() > FIELD_COUNT {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Some(Err(LedgerError::validation(format!(
                    "Line {line} has {} fields, expected {FIELD_COUNT}",
                    record.len()
                ))));
            }
            match validate_row(&record) {
                Some(row) => return Some(Ok(row)),
                None => {
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    debug!("dropping incomplete row at line {line}");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Batch accumulation and checks
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Batch {
    pub rows: Vec<CsvTransaction>,
    /// Distinct category titles in first-seen order.
    pub categories: Vec<String>,
}

/// Drain `rows` to the end before returning. Stops at the first read error.
pub fn read_batch<I>(rows: I) -> Result<Batch>
where
    I: IntoIterator<Item = Result<CsvTransaction>>,
{
    let mut batch = Batch::default();
    let mut seen = HashSet::new();
    for row in rows {
        let row = row?;
        if seen.insert(row.category.clone()) {
            batch.categories.push(row.category.clone());
        }
        batch.rows.push(row);
    }
    Ok(batch)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckedRow {
    pub title: String,
    pub value: f64,
    pub kind: TransactionType,
    pub category: String,
}

#[derive(Debug, Default)]
pub struct CheckedBatch {
    pub rows: Vec<CheckedRow>,
    pub categories: Vec<String>,
}

/// Batch-level checks over a fully drained batch. Every bad type is listed
/// in one error; values are checked only once all types are valid.
pub fn check_batch(batch: Batch) -> Result<CheckedBatch> {
    let wrong_types: Vec<&str> = batch
        .rows
        .iter()
        .filter(|r| r.kind.parse::<TransactionType>().is_err())
        .map(|r| r.kind.as_str())
        .collect();
    if !wrong_types.is_empty() {
        return Err(LedgerError::validation(format!(
            "Transactions [{}] type is invalid",
            wrong_types.join(", ")
        )));
    }

    let wrong_values: Vec<&str> = batch
        .rows
        .iter()
        .filter(|r| parse_value(&r.value).is_none())
        .map(|r| r.value.as_str())
        .collect();
    if !wrong_values.is_empty() {
        return Err(LedgerError::validation(format!(
            "Transactions [{}] value is invalid",
            wrong_values.join(", ")
        )));
    }

    let mut rows = Vec::with_capacity(batch.rows.len());
    for row in batch.rows {
        let (Ok(kind), Some(value)) = (row.kind.parse::<TransactionType>(), parse_value(&row.value)) else {
            return Err(LedgerError::Other(format!("row '{}' changed after checks", row.title)));
        };
        rows.push(CheckedRow {
            title: row.title,
            value,
            kind,
            category: row.category,
        });
    }
    Ok(CheckedBatch {
        rows,
        categories: batch.categories,
    })
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ImportResult {
    pub transactions: Vec<Transaction>,
    pub new_categories: Vec<Category>,
}

/// Resolve categories, then write all transactions in one batch, then
/// remove `source`. Categories committed before a failed transaction write
/// are left in place.
pub fn persist_batch<S: LedgerStore + ?Sized>(
    store: &mut S,
    batch: CheckedBatch,
    source: &Path,
) -> Result<ImportResult> {
    let resolution = resolve_categories(store, &batch.categories)?;

    let mut linked = Vec::with_capacity(batch.rows.len());
    for row in batch.rows {
        let category = resolution
            .table
            .get(&row.category)
            .cloned()
            .ok_or_else(|| LedgerError::Other(format!("unresolved category: {}", row.category)))?;
        linked.push(NewTransaction {
            title: row.title,
            value: row.value,
            kind: row.kind,
            category,
        });
    }

    let transactions = store.create_transactions(&linked)?;
    std::fs::remove_file(source)?;

    Ok(ImportResult {
        transactions,
        new_categories: resolution.created,
    })
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

pub fn import_file<S: LedgerStore + ?Sized>(store: &mut S, file_path: &Path) -> Result<ImportResult> {
    let batch = read_batch(CsvRows::open(file_path)?)?;
    let checked = check_batch(batch).map_err(|e| {
        warn!("import of {} rejected: {e}", file_path.display());
        e
    })?;
    let result = persist_batch(store, checked, file_path)?;
    info!(
        "imported {} transactions ({} new categories) from {}",
        result.transactions.len(),
        result.new_categories.len(),
        file_path.display()
    );
    Ok(result)
}
