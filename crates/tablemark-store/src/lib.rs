//! Tablemark store - entity model and table-store backends.
//!
//! This crate defines the flat customer record the benchmark drives, the
//! [`TableStore`] seam every phase calls through, and two backends:
//!
//! - [`SledStore`]: durable tables on top of sled, with an email lookup
//!   tree per table for equality queries.
//! - [`MemoryStore`]: a plain in-process map, used by tests and offline runs.
//!
//! All operations are synchronous and fallible; callers are expected to
//! propagate errors rather than retry.

pub mod entity;
pub mod error;
pub mod memory;
pub mod sled_store;
pub mod store;

pub use entity::{Customer, EntityKey};
pub use error::Error;
pub use memory::MemoryStore;
pub use sled_store::SledStore;
pub use store::{TableStore, DEFAULT_TABLE};
