// Strongbox — Key Manager
//
// Flow:
//   1. `ensure_key_exists()` — returns the stored key, or generates + stores one
//   2. `get_key()` — returns the stored key, `NotFound` if absent
//   3. `destroy_key()` — crypto-shreds every record sealed under the key
//
// Creation is exactly-once: a creation guard serializes check-and-create in
// this process and the vault's conditional add settles any remaining race,
// so every caller observes the same key.

use std::sync::{Arc, Mutex};

use crate::crypto::{SymmetricKey, KEY_LEN};

use super::{CredentialVault, KeyError};

pub struct KeyManager {
    vault: Arc<dyn CredentialVault>,
    creation: Mutex<()>,
}

impl KeyManager {
    pub fn new(vault: Arc<dyn CredentialVault>) -> Self {
        Self {
            vault,
            creation: Mutex::new(()),
        }
    }

    /// Make sure a key is persisted, creating it on first use. Idempotent.
    pub fn ensure_key_exists(&self) -> Result<SymmetricKey, KeyError> {
        if let Some(key) = self.read_key()? {
            return Ok(key);
        }

        let _guard = self
            .creation
            .lock()
            .map_err(|_| KeyError::KeyStore("key creation guard poisoned".to_string()))?;

        // Another caller may have created it while we waited.
        if let Some(key) = self.read_key()? {
            tracing::debug!("Storage key created by a concurrent caller");
            return Ok(key);
        }

        tracing::info!("No storage key found — generating new one");
        let key = SymmetricKey::generate();
        if self.vault.add_secret_if_absent(key.as_bytes())? {
            tracing::info!("Storage key stored in platform credential store");
            Ok(key)
        } else {
            // Lost the race to another process; adopt its key.
            tracing::debug!("Storage key appeared during creation, using existing key");
            self.get_key()
        }
    }

    /// Retrieve the persisted key.
    pub fn get_key(&self) -> Result<SymmetricKey, KeyError> {
        self.read_key()?.ok_or(KeyError::NotFound)
    }

    /// Check whether a key is currently retrievable.
    pub fn has_key(&self) -> Result<bool, KeyError> {
        Ok(self.read_key()?.is_some())
    }

    /// Irreversibly delete the key. Returns whether a key existed.
    pub fn destroy_key(&self) -> Result<bool, KeyError> {
        let existed = self.vault.delete_secret()?;
        if existed {
            tracing::warn!("Storage key destroyed — all encrypted records are now irrecoverable");
        } else {
            tracing::debug!("No storage key to destroy");
        }
        Ok(existed)
    }

    fn read_key(&self) -> Result<Option<SymmetricKey>, KeyError> {
        match self.vault.read_secret()? {
            Some(secret) => SymmetricKey::from_slice(&secret)
                .map(Some)
                .ok_or(KeyError::InvalidKeyLength(secret.len(), KEY_LEN)),
            None => Ok(None),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
