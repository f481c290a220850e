//! Durable local key-value storage.
//!
//! Everything the core persists on-device (the cart snapshot, the guest
//! points ledger) goes through [`KeyValueStorage`]. Backends are deliberately
//! dumb: whole-value overwrite, no append, no transactions.

mod file;
mod memory;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Storage key for the serialized cart snapshot.
pub const CART_KEY: &str = "cart";

/// Storage key for the local points ledger fallback.
pub const POINTS_KEY: &str = "points";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o failed")]
    Io(#[source] std::io::Error),

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Local durable key-value storage collaborator.
#[automock]
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
