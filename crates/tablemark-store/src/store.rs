//! The table-store seam the benchmark phases drive.

use crate::entity::{Customer, EntityKey};
use crate::error::Error;

/// Table name used when the caller does not pick one.
pub const DEFAULT_TABLE: &str = "people";

/// A named-table entity store.
///
/// One method per benchmark phase, plus the idempotent table-ensure step that
/// runs before any phase. Implementations own durability and lookup
/// structures; callers never retry, so any error surfaces to the run.
pub trait TableStore {
    /// Create the table if it does not exist. Safe to call repeatedly.
    fn ensure_table(&self, table: &str) -> Result<(), Error>;

    /// Insert a new entity. Fails with [`Error::AlreadyExists`] when the
    /// (partition key, row key) pair is already present.
    fn insert(&self, table: &str, customer: &Customer) -> Result<(), Error>;

    /// Point read by identity.
    fn retrieve(&self, table: &str, key: &EntityKey) -> Result<Option<Customer>, Error>;

    /// Equality scan on the email field.
    ///
    /// Returns every matching entity; the lookup structure is owned by the
    /// backend, not reimplemented here.
    fn query_by_email(&self, table: &str, email: &str) -> Result<Vec<Customer>, Error>;

    /// Overwrite an existing entity in full. Fails with [`Error::NotFound`]
    /// when the entity is absent.
    fn replace(&self, table: &str, customer: &Customer) -> Result<(), Error>;

    /// Remove an entity. Fails with [`Error::NotFound`] when absent.
    fn delete(&self, table: &str, key: &EntityKey) -> Result<(), Error>;
}
