//! Store error types.

use thiserror::Error;

use crate::entity::EntityKey;

/// Table-store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend (sled) error.
    #[error("backend error: {0}")]
    Backend(#[from] sled::Error),

    /// Record encoding or decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Entity not found where one was required.
    #[error("entity not found: {0}")]
    NotFound(EntityKey),

    /// Insert collided with an existing entity.
    #[error("entity already exists: {0}")]
    AlreadyExists(EntityKey),
}
