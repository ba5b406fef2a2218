// Strongbox — Store error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}
