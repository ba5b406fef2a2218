// Strongbox — Blob Store Repository
//
// The plaintext-capable persistence layer under `SecureStore`. It stores
// opaque bytes by name and knows nothing about encryption; whatever it is
// handed is written verbatim.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::db::Database;
use super::models::EntrySummary;
use super::StoreError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Named byte-blob persistence. Writes to one name are linearizable.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `name`.
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or overwrite the blob under `name`.
    fn put(&self, name: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `name`. Returns true if it existed.
    fn remove(&self, name: &str) -> Result<bool, StoreError>;

    /// List every entry (metadata only), ordered by name.
    fn list(&self) -> Result<Vec<EntrySummary>, StoreError>;

    /// Remove every entry. Returns the number removed.
    fn clear(&self) -> Result<usize, StoreError>;
}

// ─── SQLite Implementation ──────────────────────────────────────────────────

pub struct SqliteBlobStore {
    db: Database,
}

impl SqliteBlobStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Parse an entry summary row.
    fn row_to_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntrySummary> {
        let name: String = row.get(0)?;
        let size: i64 = row.get(1)?;
        let updated_at_str: String = row.get(2)?;

        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(EntrySummary {
            name,
            size: usize::try_from(size).unwrap_or_default(),
            updated_at,
        })
    }
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let value = self
            .db
            .conn()?
            .query_row(
                "SELECT value FROM entries WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, name: &str, value: &[u8]) -> Result<(), StoreError> {
        self.db.conn()?.execute(
            "INSERT INTO entries (name, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![name, value, Utc::now().to_rfc3339()],
        )?;

        tracing::debug!(name = %name, size = value.len(), "Blob written");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let affected = self
            .db
            .conn()?
            .execute("DELETE FROM entries WHERE name = ?1", params![name])?;

        if affected > 0 {
            tracing::debug!(name = %name, "Blob removed");
        }
        Ok(affected > 0)
    }

    fn list(&self) -> Result<Vec<EntrySummary>, StoreError> {
        let conn = self.db.conn()?;
        let mut stmt =
            conn.prepare("SELECT name, length(value), updated_at FROM entries ORDER BY name ASC")?;

        let rows = stmt.query_map([], Self::row_to_summary)?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }

        Ok(summaries)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let removed = self.db.conn()?.execute("DELETE FROM entries", [])?;
        tracing::info!(removed, "Blob store cleared");
        Ok(removed)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
