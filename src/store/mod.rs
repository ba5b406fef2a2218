// Strongbox — Store Module
//
// Blob persistence (SQLite) and the encrypting `SecureStore` façade on top
// of it. Only sealed envelopes are ever written through `SecureStore`.

mod db;
mod error;
mod models;
mod repository;
mod secure;

pub use db::Database;
pub use error::StoreError;
pub use models::EntrySummary;
pub use repository::{BlobStore, SqliteBlobStore};
pub use secure::SecureStore;
