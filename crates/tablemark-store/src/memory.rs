//! In-memory table store.
//!
//! A test double with the same contract as the sled backend. Queries scan the
//! table; there is nothing here worth indexing.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::entity::{Customer, EntityKey};
use crate::error::Error;
use crate::store::TableStore;

type Table = BTreeMap<EntityKey, Customer>;

/// In-process [`TableStore`] for tests and offline runs.
///
/// Interior mutability keeps the trait surface `&self` like the sled backend.
/// The benchmark is single-threaded by design, so a `RefCell` suffices.
#[derive(Default)]
pub struct MemoryStore {
    tables: RefCell<HashMap<String, Table>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held by a table.
    pub fn len(&self, table: &str) -> usize {
        self.tables
            .borrow()
            .get(table)
            .map_or(0, |rows| rows.len())
    }

    /// Whether a table holds no rows.
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }
}

impl TableStore for MemoryStore {
    fn ensure_table(&self, table: &str) -> Result<(), Error> {
        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default();
        Ok(())
    }

    fn insert(&self, table: &str, customer: &Customer) -> Result<(), Error> {
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(table.to_string()).or_default();
        if rows.contains_key(&customer.key) {
            return Err(Error::AlreadyExists(customer.key.clone()));
        }
        rows.insert(customer.key.clone(), customer.clone());
        Ok(())
    }

    fn retrieve(&self, table: &str, key: &EntityKey) -> Result<Option<Customer>, Error> {
        Ok(self
            .tables
            .borrow()
            .get(table)
            .and_then(|rows| rows.get(key))
            .cloned())
    }

    fn query_by_email(&self, table: &str, email: &str) -> Result<Vec<Customer>, Error> {
        Ok(self
            .tables
            .borrow()
            .get(table)
            .map(|rows| {
                rows.values()
                    .filter(|c| c.email == email)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn replace(&self, table: &str, customer: &Customer) -> Result<(), Error> {
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(table.to_string()).or_default();
        match rows.get_mut(&customer.key) {
            Some(existing) => {
                *existing = customer.clone();
                Ok(())
            }
            None => Err(Error::NotFound(customer.key.clone())),
        }
    }

    fn delete(&self, table: &str, key: &EntityKey) -> Result<(), Error> {
        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(table.to_string()).or_default();
        match rows.remove(key) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(key.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crud_cycle() {
        let store = MemoryStore::new();
        store.ensure_table("people").unwrap();

        let mut item = Customer::new(
            EntityKey::new("p1", "r1"),
            "a@contoso.com",
            "425-555-0102",
            "bio",
        );
        store.insert("people", &item).unwrap();
        assert_eq!(store.len("people"), 1);

        assert_eq!(
            store.retrieve("people", &item.key).unwrap(),
            Some(item.clone())
        );
        assert_eq!(
            store.query_by_email("people", "a@contoso.com").unwrap(),
            vec![item.clone()]
        );

        item.phone_number = "425-555-5555".to_string();
        store.replace("people", &item).unwrap();
        let found = store.retrieve("people", &item.key).unwrap().unwrap();
        assert_eq!(found.phone_number, "425-555-5555");

        store.delete("people", &item.key).unwrap();
        assert!(store.is_empty("people"));
        assert!(matches!(
            store.delete("people", &item.key),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_query_missing_table_is_empty() {
        let store = MemoryStore::new();
        assert!(store.query_by_email("nope", "a@b").unwrap().is_empty());
    }
}
