// Strongbox — Symmetric key material
//
// The single 256-bit storage key. Bytes are zeroized on drop and never
// appear in Debug output.

use std::fmt;

use rand::RngCore;
use zeroize::Zeroizing;

/// Length of the storage key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// A 256-bit AES key. Cloning copies into another zeroizing buffer.
#[derive(Clone)]
pub struct SymmetricKey(Zeroizing<[u8; KEY_LEN]>);

impl SymmetricKey {
    /// Generate a fresh key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        rand::rng().fill_bytes(&mut bytes[..]);
        Self(bytes)
    }

    /// Build a key from raw bytes. Returns `None` unless exactly 32 bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != KEY_LEN {
            return None;
        }
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(bytes);
        Some(Self(key))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}
