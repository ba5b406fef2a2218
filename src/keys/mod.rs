// Strongbox — Keys Module
//
// Lifecycle of the single storage key. The key itself lives in the
// platform credential store (Keychain / Credential Manager / kernel keyring);
// `KeyManager` is the only component that reads, creates or destroys it.

mod error;
mod manager;
mod vault;

pub use error::KeyError;
pub use manager::KeyManager;
pub use vault::{CredentialVault, KeyringVault, KEYRING_SERVICE, KEYRING_USER};

#[cfg(test)]
pub use vault::mock;
