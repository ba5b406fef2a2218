// Strongbox — Runtime Configuration
//
// Defaults are compiled in; each can be overridden from the environment.
//
// | Variable                     | Description                               | Default                                  |
// |------------------------------|-------------------------------------------|------------------------------------------|
// | `STRONGBOX_DATA_DIR`         | Directory holding the blob database       | `<platform data dir>/strongbox`          |
// | `STRONGBOX_KEYRING_SERVICE`  | Keyring service name for the storage key  | `strongbox-secure-storage`               |
// | `STRONGBOX_KEYRING_USER`     | Keyring user name for the storage key     | `storage-key`                            |
// | `STRONGBOX_SENSITIVE_NAMES`  | Comma-separated names checked by `audit`  | see `DEFAULT_SENSITIVE_NAMES`            |
// | `RUST_LOG`                   | Log filter                                | `strongbox=info`                         |

use std::path::PathBuf;

use crate::keys::{KEYRING_SERVICE, KEYRING_USER};

pub const DATA_DIR_ENV: &str = "STRONGBOX_DATA_DIR";
pub const KEYRING_SERVICE_ENV: &str = "STRONGBOX_KEYRING_SERVICE";
pub const KEYRING_USER_ENV: &str = "STRONGBOX_KEYRING_USER";
pub const SENSITIVE_NAMES_ENV: &str = "STRONGBOX_SENSITIVE_NAMES";

/// File name of the blob database inside the data directory.
pub const DB_FILE_NAME: &str = "strongbox.db";

/// Entries the auditor expects to find encrypted whenever they exist.
pub const DEFAULT_SENSITIVE_NAMES: &[&str] = &[
    "session-credential",
    "refresh-token",
    "userEmail",
    "pending-signup-email",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub keyring_service: String,
    pub keyring_user: String,
    pub sensitive_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            keyring_service: KEYRING_SERVICE.to_string(),
            keyring_user: KEYRING_USER.to_string(),
            sensitive_names: DEFAULT_SENSITIVE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup. Empty values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(service) = get(KEYRING_SERVICE_ENV) {
            config.keyring_service = service;
        }
        if let Some(user) = get(KEYRING_USER_ENV) {
            config.keyring_user = user;
        }
        if let Some(names) = get(SENSITIVE_NAMES_ENV) {
            config.sensitive_names = names
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        config
    }

    /// Path to the blob database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("strongbox")
}
