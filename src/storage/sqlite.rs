use crate::model::{CatalogEntry, StorageError};
use crate::storage::CatalogStore;
use crate::utils::parse_datetime;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens the catalog database and runs migrations.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    /// Catalog that lives only as long as this handle.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.busy_timeout(Duration::from_secs(5))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL
            );
            ",
        )?;

        // Older catalogs were created without a timestamp column
        Self::migrate_add_column_if_missing(&conn, "items", "created_at", "TEXT NOT NULL DEFAULT ''")?;

        conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_items_display_name ON items (display_name);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Adds `column` to `table` unless it is already there.
    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    /// Looks a row up by canonical name.
    pub async fn get(&self, name: &str) -> Result<Option<CatalogEntry>, StorageError> {
        let conn = self.conn.lock().await;
        let entry = conn
            .query_row(
                "SELECT id, name, display_name, created_at FROM items WHERE name = ?1",
                params![name],
                Self::map_entry,
            )
            .optional()?;
        Ok(entry)
    }

    /// Number of cataloged items.
    pub async fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All rows, oldest first.
    pub async fn get_all_entries(&self) -> Result<Vec<CatalogEntry>, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT id, name, display_name, created_at FROM items ORDER BY id ASC")?;

        let rows = stmt.query_map([], Self::map_entry)?;
        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }

        Ok(entries)
    }

    fn map_entry(row: &Row) -> Result<CatalogEntry, rusqlite::Error> {
        let created_at_str: String = row.get(3)?;
        Ok(CatalogEntry {
            id: row.get(0)?,
            name: row.get(1)?,
            display_name: row.get(2)?,
            // Rows migrated from the old schema have no timestamp
            created_at: parse_datetime(&created_at_str).unwrap_or_default(),
        })
    }
}

#[async_trait::async_trait]
impl CatalogStore for SqliteStorage {
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT 1 FROM items WHERE name = ?1 OR display_name = ?1 LIMIT 1")?;
        let mut rows = stmt.query(params![name])?;
        Ok(rows.next()?.is_some())
    }

    async fn insert_if_absent(
        &self,
        name: &str,
        display_name: &str,
    ) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO items (name, display_name, created_at) VALUES (?1, ?2, ?3)",
            params![name, display_name, Utc::now().to_rfc3339()],
        )?;

        if changed > 0 {
            info!("Created catalog item '{}' (id {})", name, conn.last_insert_rowid());
        }
        Ok(changed > 0)
    }
}
