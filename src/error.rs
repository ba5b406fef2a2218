// Strongbox — Top-level error types
//
// The boundary taxonomy seen by collaborators. Module errors from crypto,
// keys and store are folded into it so callers match on one enum.

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::keys::KeyError;
use crate::store::StoreError;

/// Error type for every Strongbox operation.
#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("Storage key not found")]
    KeyNotFound,

    #[error("Key store error: {0}")]
    KeyStore(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — data was tampered with, corrupted, or sealed under another key")]
    AuthenticationFailure,

    #[error("No entry named '{0}'")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Stored value is not valid UTF-8: {0}")]
    DecodingFailed(#[from] std::str::Utf8Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<KeyError> for SecurityError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::NotFound => SecurityError::KeyNotFound,
            KeyError::KeyStore(detail) => SecurityError::KeyStore(detail),
            other @ KeyError::InvalidKeyLength(..) => SecurityError::KeyStore(other.to_string()),
        }
    }
}

impl From<CryptoError> for SecurityError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::EncryptionFailed(detail) => SecurityError::EncryptionFailed(detail),
            CryptoError::AuthenticationFailure => SecurityError::AuthenticationFailure,
            CryptoError::MalformedRecord(detail) => SecurityError::MalformedRecord(detail),
        }
    }
}

pub type Result<T> = std::result::Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_errors_map_to_boundary_taxonomy() {
        assert!(matches!(SecurityError::from(KeyError::NotFound), SecurityError::KeyNotFound));
        assert!(matches!(
            SecurityError::from(KeyError::KeyStore("denied".into())),
            SecurityError::KeyStore(d) if d == "denied"
        ));
        assert!(matches!(
            SecurityError::from(KeyError::InvalidKeyLength(16, 32)),
            SecurityError::KeyStore(d) if d.contains("16 bytes")
        ));
    }

    #[test]
    fn test_crypto_errors_map_to_boundary_taxonomy() {
        assert!(matches!(
            SecurityError::from(CryptoError::AuthenticationFailure),
            SecurityError::AuthenticationFailure
        ));
        assert!(matches!(
            SecurityError::from(CryptoError::MalformedRecord("x".into())),
            SecurityError::MalformedRecord(_)
        ));
    }
}
