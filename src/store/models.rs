// Strongbox — Stored entry models
//
// Metadata about persisted blobs. Nothing here ever carries a value,
// encrypted or not.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one named entry in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub name: String,
    /// Size of the persisted blob in bytes (envelope included).
    pub size: usize,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for EntrySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes, updated {})",
            self.name,
            self.size,
            self.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
