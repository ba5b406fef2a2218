// Strongbox — Key management error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Storage key not found — run `strongbox init` or store a secret first")]
    NotFound,

    #[error("Credential store error: {0}")]
    KeyStore(String),

    #[error("Stored key has invalid length ({0} bytes, expected {1})")]
    InvalidKeyLength(usize, usize),
}
