use crate::model::{CatalogEntry, StorageError};
use crate::storage::CatalogStore;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-process catalog keyed by canonical name.
#[derive(Default)]
pub struct MemoryCatalog {
    rows: Mutex<HashMap<String, CatalogEntry>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn get(&self, name: &str) -> Option<CatalogEntry> {
        self.rows.lock().await.get(name).cloned()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalog {
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .values()
            .any(|row| row.name == name || row.display_name == name))
    }

    async fn insert_if_absent(
        &self,
        name: &str,
        display_name: &str,
    ) -> Result<bool, StorageError> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(name) {
            return Ok(false);
        }
        let id = rows.len() as i64 + 1;
        rows.insert(
            name.to_string(),
            CatalogEntry {
                id,
                name: name.to_string(),
                display_name: display_name.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }
}
