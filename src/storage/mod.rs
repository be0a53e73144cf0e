// Catalog persistence: the store contract and its backends
pub mod memory;
pub mod sqlite;

pub use memory::MemoryCatalog;
pub use sqlite::SqliteStorage;

use crate::model::StorageError;

/// The persistent item table as seen by the listing pipeline.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// True if a row's `name` or `display_name` equals `name` exactly.
    async fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Inserts a row unless one with the same `name` exists.
    /// Returns `true` only when a new row was created.
    async fn insert_if_absent(&self, name: &str, display_name: &str)
        -> Result<bool, StorageError>;
}
