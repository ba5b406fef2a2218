// Strongbox — Secure Store
//
// Key-value façade over a `BlobStore`. Values are sealed with the storage
// key before they reach the blob store and opened on the way out; the blob
// store only ever sees envelopes.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::crypto::{self, EncryptedRecord};
use crate::error::{Result, SecurityError};
use crate::keys::KeyManager;

use super::{BlobStore, EntrySummary};

pub struct SecureStore {
    keys: Arc<KeyManager>,
    blobs: Arc<dyn BlobStore>,
}

impl SecureStore {
    pub fn new(keys: Arc<KeyManager>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { keys, blobs }
    }

    /// Encrypt `plaintext` and write it under `name`, replacing any prior value.
    /// Creates the storage key on first use.
    pub fn store(&self, name: &str, plaintext: &[u8]) -> Result<()> {
        let key = self.keys.ensure_key_exists()?;
        let record = crypto::encrypt(&key, plaintext)?;
        self.blobs.put(name, &record.encode()?)?;

        tracing::debug!(name = %name, "Secret stored");
        Ok(())
    }

    /// UTF-8 convenience over [`SecureStore::store`].
    pub fn store_str(&self, name: &str, text: &str) -> Result<()> {
        self.store(name, text.as_bytes())
    }

    /// Read and decrypt the secret stored under `name`.
    pub fn load(&self, name: &str) -> Result<Zeroizing<Vec<u8>>> {
        let raw = self
            .blobs
            .get(name)?
            .ok_or_else(|| SecurityError::NotFound(name.to_string()))?;
        let record = EncryptedRecord::decode(&raw)?;
        let key = self.keys.get_key()?;
        let plaintext = crypto::decrypt(&key, &record)?;

        tracing::debug!(name = %name, "Secret loaded");
        Ok(plaintext)
    }

    /// Load and decode as UTF-8.
    pub fn load_string(&self, name: &str) -> Result<Zeroizing<String>> {
        let bytes = self.load(name)?;
        let text = std::str::from_utf8(&bytes)?;
        Ok(Zeroizing::new(text.to_owned()))
    }

    /// Remove `name`. Deleting an absent entry is not an error.
    pub fn delete(&self, name: &str) -> Result<()> {
        if self.blobs.remove(name)? {
            tracing::info!(name = %name, "Secret deleted");
        } else {
            tracing::debug!(name = %name, "Delete of absent secret ignored");
        }
        Ok(())
    }

    /// Whether anything (encrypted or not) is stored under `name`.
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.blobs.get(name)?.is_some())
    }

    /// Metadata for every stored entry. Nothing is decrypted.
    pub fn list(&self) -> Result<Vec<EntrySummary>> {
        Ok(self.blobs.list()?)
    }

    pub(crate) fn keys(&self) -> &Arc<KeyManager> {
        &self.keys
    }

    pub(crate) fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
