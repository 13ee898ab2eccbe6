//! Key-value persistence behind the account store.
//!
//! The store reads and writes whole collections as JSON under fixed keys,
//! so any backend that can keep bytes per key will do.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Returns `None` when nothing is stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces whatever is stored under `key`.
    async fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
