// Strongbox — Crypto error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// The authentication tag did not verify: wrong key, tampering or corruption.
    #[error("Authentication failed — record was tampered with, corrupted, or sealed under another key")]
    AuthenticationFailure,

    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}
