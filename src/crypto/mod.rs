// Strongbox — Crypto Module
//
// AES-256-GCM sealing of individual secrets and the versioned envelope
// they are persisted in. Everything here is stateless.

mod cipher;
mod error;
mod key;
mod record;

pub use cipher::{decrypt, encrypt};
pub use error::CryptoError;
pub use key::{SymmetricKey, KEY_LEN};
pub use record::{EncryptedRecord, FORMAT_MARKER, FORMAT_VERSION, NONCE_LEN, TAG_LEN};
