//! Entity model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Two-part identity of an entity within a table.
///
/// The pair (partition key, row key) is unique within a table. The benchmark
/// assigns both from freshly generated UUIDs, so collisions do not occur in
/// practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    /// Partition component of the identity.
    pub partition_key: String,
    /// Row component of the identity.
    pub row_key: String,
}

impl EntityKey {
    /// Create a key from its two components.
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
        }
    }

    /// Encode the key for ordered storage.
    ///
    /// Format: `[partition_key][0x00][row_key]`. Key components must not
    /// contain NUL bytes; the benchmark only generates alphanumeric keys.
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.partition_key.len() + 1 + self.row_key.len());
        buf.extend_from_slice(self.partition_key.as_bytes());
        buf.push(0x00);
        buf.extend_from_slice(self.row_key.as_bytes());
        buf
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.row_key)
    }
}

/// The flat customer record exercised by every benchmark phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identity within the table.
    pub key: EntityKey,
    /// Contact address; equality-queried during the query phase.
    pub email: String,
    /// Mutated to a fixed value during the replace phase.
    pub phone_number: String,
    /// Random payload simulating record weight.
    pub bio: String,
}

impl Customer {
    /// Create a customer record.
    pub fn new(
        key: EntityKey,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        bio: impl Into<String>,
    ) -> Self {
        Self {
            key,
            email: email.into(),
            phone_number: phone_number.into(),
            bio: bio.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_encode_separates_components() {
        let a = EntityKey::new("ab", "c");
        let b = EntityKey::new("a", "bc");
        assert_ne!(a.encode(), b.encode());
    }

    #[test]
    fn test_key_display() {
        let key = EntityKey::new("pk", "rk");
        assert_eq!(key.to_string(), "pk/rk");
    }

    #[test]
    fn test_customer_roundtrip_json() {
        let customer = Customer::new(
            EntityKey::new("p1", "r1"),
            "a@contoso.com",
            "425-555-0102",
            "bio",
        );
        let bytes = serde_json::to_vec(&customer).unwrap();
        let decoded: Customer = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, customer);
    }
}
