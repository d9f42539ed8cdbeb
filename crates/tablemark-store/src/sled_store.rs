//! Sled-backed table store.
//!
//! Each table maps to two sled trees: a data tree holding the rows keyed by
//! the encoded entity key, and an email tree mapping an email value to the
//! list of entity keys carrying it. Durability, recovery, and the ordered
//! lookup structures all belong to sled.

use std::path::Path;

use sled::{Db, Tree};

use crate::entity::{Customer, EntityKey};
use crate::error::Error;
use crate::store::TableStore;

/// Tree name prefix for table data.
const DATA_TREE_PREFIX: &str = "table:";

/// Tree name prefix for the per-table email lookup.
const EMAIL_TREE_PREFIX: &str = "index:email:";

/// Sled-backed [`TableStore`].
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let db = sled::open(path)?;
        if db.was_recovered() {
            tracing::info!("sled database recovered from previous run");
        }
        Ok(Self { db })
    }

    /// Open a temporary store that is discarded on drop.
    pub fn temporary() -> Result<Self, Error> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Flush dirty buffers to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }

    fn data_tree(&self, table: &str) -> Result<Tree, Error> {
        Ok(self.db.open_tree(format!("{DATA_TREE_PREFIX}{table}"))?)
    }

    fn email_tree(&self, table: &str) -> Result<Tree, Error> {
        Ok(self.db.open_tree(format!("{EMAIL_TREE_PREFIX}{table}"))?)
    }

    /// Add a key to the email tree entry for `email`.
    fn index_email(tree: &Tree, email: &str, key: &EntityKey) -> Result<(), Error> {
        let mut keys = Self::indexed_keys(tree, email)?;
        if !keys.contains(key) {
            keys.push(key.clone());
            tree.insert(email.as_bytes(), serde_json::to_vec(&keys)?)?;
        }
        Ok(())
    }

    /// Drop a key from the email tree entry for `email`.
    fn unindex_email(tree: &Tree, email: &str, key: &EntityKey) -> Result<(), Error> {
        let mut keys = Self::indexed_keys(tree, email)?;
        keys.retain(|k| k != key);
        if keys.is_empty() {
            tree.remove(email.as_bytes())?;
        } else {
            tree.insert(email.as_bytes(), serde_json::to_vec(&keys)?)?;
        }
        Ok(())
    }

    fn indexed_keys(tree: &Tree, email: &str) -> Result<Vec<EntityKey>, Error> {
        match tree.get(email.as_bytes())? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }
}

impl TableStore for SledStore {
    fn ensure_table(&self, table: &str) -> Result<(), Error> {
        // open_tree creates on first call and is a no-op afterwards.
        self.data_tree(table)?;
        self.email_tree(table)?;
        tracing::debug!(table, "table ensured");
        Ok(())
    }

    fn insert(&self, table: &str, customer: &Customer) -> Result<(), Error> {
        let data = self.data_tree(table)?;
        let key_bytes = customer.key.encode();
        if data.contains_key(&key_bytes)? {
            return Err(Error::AlreadyExists(customer.key.clone()));
        }
        data.insert(key_bytes, serde_json::to_vec(customer)?)?;
        Self::index_email(&self.email_tree(table)?, &customer.email, &customer.key)?;
        Ok(())
    }

    fn retrieve(&self, table: &str, key: &EntityKey) -> Result<Option<Customer>, Error> {
        match self.data_tree(table)?.get(key.encode())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn query_by_email(&self, table: &str, email: &str) -> Result<Vec<Customer>, Error> {
        let data = self.data_tree(table)?;
        let keys = Self::indexed_keys(&self.email_tree(table)?, email)?;

        let mut matches = Vec::with_capacity(keys.len());
        for key in keys {
            // A stale index entry for a deleted row is skipped, not an error.
            if let Some(bytes) = data.get(key.encode())? {
                matches.push(serde_json::from_slice(&bytes)?);
            }
        }
        Ok(matches)
    }

    fn replace(&self, table: &str, customer: &Customer) -> Result<(), Error> {
        let data = self.data_tree(table)?;
        let key_bytes = customer.key.encode();

        let previous: Customer = match data.get(&key_bytes)? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => return Err(Error::NotFound(customer.key.clone())),
        };

        data.insert(key_bytes, serde_json::to_vec(customer)?)?;

        if previous.email != customer.email {
            let emails = self.email_tree(table)?;
            Self::unindex_email(&emails, &previous.email, &customer.key)?;
            Self::index_email(&emails, &customer.email, &customer.key)?;
        }
        Ok(())
    }

    fn delete(&self, table: &str, key: &EntityKey) -> Result<(), Error> {
        let data = self.data_tree(table)?;
        let removed = match data.remove(key.encode())? {
            Some(bytes) => serde_json::from_slice::<Customer>(&bytes)?,
            None => return Err(Error::NotFound(key.clone())),
        };
        Self::unindex_email(&self.email_tree(table)?, &removed.email, key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(pk: &str, rk: &str, email: &str) -> Customer {
        Customer::new(EntityKey::new(pk, rk), email, "425-555-0102", "bio")
    }

    #[test]
    fn test_insert_then_retrieve() {
        let store = SledStore::temporary().unwrap();
        store.ensure_table("people").unwrap();

        let item = customer("p1", "r1", "a@contoso.com");
        store.insert("people", &item).unwrap();

        let found = store.retrieve("people", &item.key).unwrap();
        assert_eq!(found, Some(item));
    }

    #[test]
    fn test_insert_duplicate_fails() {
        let store = SledStore::temporary().unwrap();
        let item = customer("p1", "r1", "a@contoso.com");
        store.insert("people", &item).unwrap();

        let err = store.insert("people", &item).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn test_replace_updates_row_and_email_index() {
        let store = SledStore::temporary().unwrap();
        let mut item = customer("p1", "r1", "old@contoso.com");
        store.insert("people", &item).unwrap();

        item.email = "new@contoso.com".to_string();
        item.phone_number = "425-555-5555".to_string();
        store.replace("people", &item).unwrap();

        let found = store.retrieve("people", &item.key).unwrap().unwrap();
        assert_eq!(found.phone_number, "425-555-5555");

        assert!(store
            .query_by_email("people", "old@contoso.com")
            .unwrap()
            .is_empty());
        assert_eq!(
            store.query_by_email("people", "new@contoso.com").unwrap(),
            vec![item]
        );
    }

    #[test]
    fn test_replace_missing_fails() {
        let store = SledStore::temporary().unwrap();
        let item = customer("p1", "r1", "a@contoso.com");
        let err = store.replace("people", &item).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_row_and_index_entry() {
        let store = SledStore::temporary().unwrap();
        let item = customer("p1", "r1", "a@contoso.com");
        store.insert("people", &item).unwrap();

        store.delete("people", &item.key).unwrap();

        assert_eq!(store.retrieve("people", &item.key).unwrap(), None);
        assert!(store
            .query_by_email("people", "a@contoso.com")
            .unwrap()
            .is_empty());

        let err = store.delete("people", &item.key).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_shared_email_indexes_both_keys() {
        let store = SledStore::temporary().unwrap();
        let a = customer("p1", "r1", "shared@contoso.com");
        let b = customer("p2", "r2", "shared@contoso.com");
        store.insert("people", &a).unwrap();
        store.insert("people", &b).unwrap();

        let matches = store.query_by_email("people", "shared@contoso.com").unwrap();
        assert_eq!(matches.len(), 2);

        store.delete("people", &a.key).unwrap();
        let matches = store.query_by_email("people", "shared@contoso.com").unwrap();
        assert_eq!(matches, vec![b]);
    }

    #[test]
    fn test_reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let item = customer("p1", "r1", "a@contoso.com");

        {
            let store = SledStore::open(dir.path()).unwrap();
            store.insert("people", &item).unwrap();
            store.flush().unwrap();
        }

        let store = SledStore::open(dir.path()).unwrap();
        assert_eq!(store.retrieve("people", &item.key).unwrap(), Some(item));
    }
}
