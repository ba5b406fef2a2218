// Strongbox — Service Façade
//
// The boundary collaborators talk to. Wires KeyManager, SecureStore,
// ComplianceManager and SecurityAuditor over injected backends, or over
// the platform keyring and an on-disk SQLite database via `open`.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::audit::{SecurityAuditor, ValidationReport};
use crate::compliance::{ComplianceManager, DataExport, ErasureReport, LegacyPolicy, MigrationReport};
use crate::config::Config;
use crate::error::Result;
use crate::keys::{CredentialVault, KeyManager, KeyringVault};
use crate::store::{BlobStore, Database, EntrySummary, SecureStore, SqliteBlobStore};

pub struct Strongbox {
    keys: Arc<KeyManager>,
    store: Arc<SecureStore>,
    compliance: ComplianceManager,
    auditor: SecurityAuditor,
}

impl Strongbox {
    /// Build over explicit backends.
    pub fn new(
        vault: Arc<dyn CredentialVault>,
        blobs: Arc<dyn BlobStore>,
        sensitive_names: Vec<String>,
    ) -> Self {
        let keys = Arc::new(KeyManager::new(vault));
        let store = Arc::new(SecureStore::new(keys.clone(), blobs));
        Self {
            compliance: ComplianceManager::new(store.clone()),
            auditor: SecurityAuditor::new(store.clone(), sensitive_names),
            keys,
            store,
        }
    }

    /// Build over the platform keyring and the configured SQLite file.
    /// Creates the data directory if needed. Does not create the key.
    pub fn open(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let db = Database::open(&config.db_path())?;
        tracing::debug!(path = %config.db_path().display(), "Blob database opened");

        Ok(Self::new(
            Arc::new(KeyringVault::with_names(&config.keyring_service, &config.keyring_user)),
            Arc::new(SqliteBlobStore::new(db)),
            config.sensitive_names.clone(),
        ))
    }

    /// Ensure the storage key exists. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<()> {
        self.keys.ensure_key_exists()?;
        Ok(())
    }

    pub fn store(&self, name: &str, value: &[u8]) -> Result<()> {
        self.store.store(name, value)
    }

    pub fn store_str(&self, name: &str, value: &str) -> Result<()> {
        self.store.store_str(name, value)
    }

    pub fn load(&self, name: &str) -> Result<Zeroizing<Vec<u8>>> {
        self.store.load(name)
    }

    pub fn load_string(&self, name: &str) -> Result<Zeroizing<String>> {
        self.store.load_string(name)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(name)
    }

    pub fn list(&self) -> Result<Vec<EntrySummary>> {
        self.store.list()
    }

    /// Clear every entry and crypto-shred the key.
    pub fn erase_all_data(&self) -> Result<ErasureReport> {
        self.compliance.erase_all()
    }

    pub fn export_all_data(&self, policy: LegacyPolicy) -> Result<DataExport> {
        self.compliance.export_all(policy)
    }

    pub fn migrate_legacy(&self) -> Result<MigrationReport> {
        self.compliance.migrate_legacy()
    }

    pub fn validate_security_posture(&self) -> ValidationReport {
        self.auditor.validate()
    }

    /// Names the auditor expects to find encrypted.
    pub fn sensitive_names(&self) -> &[String] {
        self.auditor.sensitive_names()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
