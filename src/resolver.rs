use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::models::Category;
use crate::store::LedgerStore;

/// Title -> persisted category, valid for one import call.
pub type ResolutionTable = HashMap<String, Category>;

pub struct Resolution {
    pub table: ResolutionTable,
    pub created: Vec<Category>,
}

/// Look up `titles` in the store and create whichever are missing, in one
/// batch write. Matching is exact and case-sensitive. A title repeated in
/// the input still yields at most one new category.
pub fn resolve_categories<S: LedgerStore + ?Sized>(store: &mut S, titles: &[String]) -> Result<Resolution> {
    let existent = store.find_categories_by_titles(titles)?;
    let existent_titles: HashSet<&str> = existent.iter().map(|c| c.title.as_str()).collect();

    let mut seen: HashSet<&String> = HashSet::new();
    let new_titles: Vec<String> = titles
        .iter()
        .filter(|t| !existent_titles.contains(t.as_str()))
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect();

    let created = if new_titles.is_empty() {
        Vec::new()
    } else {
        store.create_categories(&new_titles)?
    };

    let mut table = ResolutionTable::with_capacity(existent.len() + created.len());
    // Earliest row wins if the store already holds duplicate titles.
    for category in existent.into_iter().chain(created.iter().cloned()) {
        table.entry(category.title.clone()).or_insert(category);
    }

    Ok(Resolution { table, created })
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

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_creates_only_missing_titles() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        let existing = store.create_categories(&titles(&["Job"])).unwrap();

        let res = resolve_categories(&mut store, &titles(&["Job", "Housing"])).unwrap();
        assert_eq!(res.created.len(), 1);
        assert_eq!(res.created[0].title, "Housing");
        assert_eq!(res.table["Job"].id, existing[0].id);
        assert_eq!(res.table.len(), 2);
        assert_eq!(store.find_all_categories().unwrap().len(), 2);
    }

    #[test]
    fn test_repeated_title_creates_one_category() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        let res = resolve_categories(&mut store, &titles(&["Travel", "Travel"])).unwrap();
        assert_eq!(res.created.len(), 1);
        assert_eq!(store.find_all_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_all_existing_creates_nothing() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        store.create_categories(&titles(&["Job", "Housing"])).unwrap();
        let res = resolve_categories(&mut store, &titles(&["Housing", "Job"])).unwrap();
        assert!(res.created.is_empty());
        assert_eq!(res.table.len(), 2);
        assert_eq!(store.find_all_categories().unwrap().len(), 2);
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        store.create_categories(&titles(&["food"])).unwrap();
        let res = resolve_categories(&mut store, &titles(&["Food"])).unwrap();
        assert_eq!(res.created.len(), 1);
        assert_eq!(store.find_all_categories().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let (_dir, conn) = test_db();
        let mut store = SqliteStore::new(&conn);
        let res = resolve_categories(&mut store, &[]).unwrap();
        assert!(res.table.is_empty());
        assert!(res.created.is_empty());
    }
}
