// Strongbox — SQLite Database Management
//
// Opens the local blob database. The file itself is plain SQLite: values
// are already sealed by the crypto layer before they get here. Secure
// delete is switched on so erased rows do not linger in free pages.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::StoreError;

/// Mutex-guarded SQLite connection, shareable across threads.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for testing only).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        let secure_delete: i64 =
            conn.pragma_update_and_check(None, "secure_delete", 1, |row| row.get(0))?;
        tracing::debug!(secure_delete, "Opened blob database");

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Lock the connection for the duration of one operation.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Run schema migrations to create or update tables.
    fn run_migrations(&self) -> Result<(), StoreError> {
        self.conn()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entries (
                name        TEXT PRIMARY KEY,
                value       BLOB NOT NULL,
                updated_at  TEXT NOT NULL
            );
            ",
        )?;

        tracing::debug!("Database migrations completed successfully");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_succeeds() {
        let db = Database::open_in_memory();
        assert!(db.is_ok(), "Should be able to open an in-memory database");
    }

    #[test]
    fn test_schema_migration_creates_entries_table() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .unwrap()
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='entries'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "entries table should exist");
    }

    #[test]
    fn test_schema_migration_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.run_migrations().is_ok(), "Migrations should be idempotent");
    }

    #[test]
    fn test_secure_delete_is_enabled() {
        let db = Database::open_in_memory().unwrap();
        let secure_delete: i64 = db
            .conn()
            .unwrap()
            .query_row("PRAGMA secure_delete", [], |row| row.get(0))
            .unwrap();
        assert_eq!(secure_delete, 1, "Erased rows must be overwritten on disk");
    }

    #[test]
    fn test_on_disk_database_persists_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strongbox.db");

        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .unwrap()
                .execute(
                    "INSERT INTO entries (name, value, updated_at) VALUES (?1, ?2, ?3)",
                    rusqlite::params!["k", vec![1u8, 2, 3], "2024-01-01T00:00:00Z"],
                )
                .unwrap();
        }

        let reopened = Database::open(&path).unwrap();
        let value: Vec<u8> = reopened
            .conn()
            .unwrap()
            .query_row("SELECT value FROM entries WHERE name = 'k'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }
}
