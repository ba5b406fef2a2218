// Strongbox — Credential Vault
//
// Thin abstraction over the platform secure credential store. It holds
// exactly one item: the raw bytes of the storage key.
//
// The production backend is the `keyring` crate, which dispatches to:
//   - macOS: login Keychain (Security.framework)
//   - iOS: data-protection Keychain
//   - Windows: Credential Manager
//   - Linux: D-Bus Secret Service (GNOME Keyring / KDE Wallet)
//
// The key must be device-only, unlock-required and never exported. What
// each backend actually guarantees:
//   - macOS: readable only while the login keychain is unlocked; not in
//     iCloud Keychain. The keyring crate cannot set a `ThisDeviceOnly`
//     accessibility class on the file-based keychain.
//   - iOS: `WhenUnlocked` accessibility, not synchronizable. Not
//     `ThisDeviceOnly`, so an encrypted device backup can carry the item.
//   - Windows: protected by the user's logon credentials, readable whenever
//     that user is logged on. Domain roaming profiles may copy it.
//   - Linux: unreadable while the collection is locked. Persistence and
//     sync are whatever the Secret Service provider does.
//
// Writes are refused on backends that do not persist until deleted, so a
// reboot can never silently replace the key.

use keyring::credential::CredentialPersistence;
use zeroize::Zeroizing;

use super::KeyError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Service name identifying Strongbox entries in the platform keyring.
pub const KEYRING_SERVICE: &str = "strongbox-secure-storage";

/// Username for the keyring entry holding the storage key.
pub const KEYRING_USER: &str = "storage-key";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Storage for the single key secret. Implementations must be shareable
/// across threads.
pub trait CredentialVault: Send + Sync {
    /// Read the stored secret, or `None` if nothing is stored.
    fn read_secret(&self) -> Result<Option<Zeroizing<Vec<u8>>>, KeyError>;

    /// Store `secret` only if no secret exists yet. Returns `false` (and
    /// leaves the existing secret untouched) when one was already present.
    fn add_secret_if_absent(&self, secret: &[u8]) -> Result<bool, KeyError>;

    /// Delete the stored secret. Returns whether one existed.
    /// WARNING: every record sealed under that secret becomes unreadable.
    fn delete_secret(&self) -> Result<bool, KeyError>;
}

// ─── Platform Implementation ─────────────────────────────────────────────────

/// Production vault backed by the OS keyring.
pub struct KeyringVault {
    service: String,
    user: String,
}

impl KeyringVault {
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    /// Creates a vault with custom service/user names (per-profile isolation).
    pub fn with_names(service: &str, user: &str) -> Self {
        Self {
            service: service.to_string(),
            user: user.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, KeyError> {
        keyring::Entry::new(&self.service, &self.user)
            .map_err(|e| KeyError::KeyStore(format!("failed to open keyring entry: {}", e)))
    }
}

impl Default for KeyringVault {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVault for KeyringVault {
    fn read_secret(&self) -> Result<Option<Zeroizing<Vec<u8>>>, KeyError> {
        match self.entry()?.get_secret() {
            Ok(secret) => Ok(Some(Zeroizing::new(secret))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(KeyError::KeyStore(format!("failed to read storage key: {}", e))),
        }
    }

    fn add_secret_if_absent(&self, secret: &[u8]) -> Result<bool, KeyError> {
        require_persistent(keyring::default::default_credential_builder().persistence())?;

        // The keyring API has no conditional add, so this is read-then-write.
        // `KeyManager` serializes creators within the process.
        let entry = self.entry()?;
        match entry.get_secret() {
            Ok(_) => return Ok(false),
            Err(keyring::Error::NoEntry) => {}
            Err(e) => {
                return Err(KeyError::KeyStore(format!(
                    "failed to check for storage key: {}",
                    e
                )))
            }
        }

        entry
            .set_secret(secret)
            .map_err(|e| KeyError::KeyStore(format!("failed to store storage key: {}", e)))?;
        Ok(true)
    }

    fn delete_secret(&self) -> Result<bool, KeyError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(KeyError::KeyStore(format!("failed to delete storage key: {}", e))),
        }
    }
}

/// A key that vanishes on reboot or process exit would be recreated on next
/// use, orphaning every record sealed under the old one.
fn require_persistent(persistence: CredentialPersistence) -> Result<(), KeyError> {
    match persistence {
        CredentialPersistence::UntilDelete => Ok(()),
        other => Err(KeyError::KeyStore(format!(
            "platform keyring backend is not persistent ({})",
            persistence_name(&other)
        ))),
    }
}

/// `CredentialPersistence` implements neither `Debug` nor `Clone`; name the
/// variant for messages.
fn persistence_name(persistence: &CredentialPersistence) -> &'static str {
    match persistence {
        CredentialPersistence::EntryOnly => "EntryOnly",
        CredentialPersistence::ProcessOnly => "ProcessOnly",
        CredentialPersistence::UntilReboot => "UntilReboot",
        CredentialPersistence::UntilDelete => "UntilDelete",
        _ => "unknown",
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────


// ─── Tests ───────────────────────────────────────────────────────────────────
