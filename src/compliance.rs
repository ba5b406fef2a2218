// Strongbox — Compliance Operations
//
// Data portability (export everything readable) and right-to-erasure
// (clear every entry, then destroy the key). Erasure relies on
// crypto-shredding: once the key is gone, any envelope that survived the
// clear is permanently unreadable.
//
// Export never guesses. Blobs carrying the envelope marker are decrypted or
// reported as undecryptable; blobs without it are legacy plaintext and are
// only passed through when the caller explicitly asks for it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use zeroize::Zeroizing;

use crate::crypto::{self, EncryptedRecord};
use crate::error::{Result, SecurityError};
use crate::keys::KeyError;
use crate::store::SecureStore;

// ─── Types ───────────────────────────────────────────────────────────────────

/// What export does with entries that are not in envelope form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegacyPolicy {
    /// Leave them out and list them as skipped.
    #[default]
    Exclude,
    /// Include the stored bytes as-is, flagged `LegacyPlaintext`.
    IncludeAsPlaintext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportSource {
    Decrypted,
    LegacyPlaintext,
}

/// One exported value and where it came from.
pub struct ExportedEntry {
    pub source: ExportSource,
    value: Zeroizing<Vec<u8>>,
}

impl ExportedEntry {
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl fmt::Debug for ExportedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedEntry")
            .field("source", &self.source)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Not in envelope form and legacy pass-through was not requested.
    LegacyPlaintext,
    /// In envelope form but could not be opened (corruption, tampering, missing key).
    Undecryptable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: SkipReason,
}

/// Result of [`ComplianceManager::export_all`].
#[derive(Debug)]
pub struct DataExport {
    pub exported_at: DateTime<Utc>,
    entries: BTreeMap<String, ExportedEntry>,
    skipped: Vec<SkippedEntry>,
}

impl DataExport {
    pub fn entries(&self) -> &BTreeMap<String, ExportedEntry> {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ExportedEntry> {
        self.entries.get(name)
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Plain `name -> bytes` view of everything exported.
    pub fn values(&self) -> BTreeMap<&str, &[u8]> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.value()))
            .collect()
    }

    /// Portable JSON document. UTF-8 values are written as text, anything
    /// else as base64.
    pub fn to_json(&self) -> Value {
        let entries: serde_json::Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, entry)| {
                let (encoding, value) = match std::str::from_utf8(entry.value()) {
                    Ok(text) => ("utf8", text.to_string()),
                    Err(_) => ("base64", BASE64.encode(entry.value())),
                };
                (
                    name.clone(),
                    json!({ "source": entry.source, "encoding": encoding, "value": value }),
                )
            })
            .collect();

        json!({
            "exported_at": self.exported_at.to_rfc3339(),
            "entries": entries,
            "skipped": self.skipped,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErasureReport {
    pub entries_removed: usize,
    pub key_destroyed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Entries that were plaintext and are now sealed.
    pub migrated: Vec<String>,
    /// Entries already in envelope form, left untouched.
    pub already_encrypted: usize,
}

// ─── Manager ─────────────────────────────────────────────────────────────────

pub struct ComplianceManager {
    store: Arc<SecureStore>,
}

impl ComplianceManager {
    pub fn new(store: Arc<SecureStore>) -> Self {
        Self { store }
    }

    /// Remove every entry and destroy the storage key. Irreversible.
    ///
    /// The key is destroyed even if clearing the entries fails; the clearing
    /// error is then returned.
    pub fn erase_all(&self) -> Result<ErasureReport> {
        tracing::warn!("Erasing all secure storage data");

        let cleared = self.store.blobs().clear();
        if let Err(ref e) = cleared {
            tracing::error!(error = %e, "Clearing entries failed, destroying key anyway");
        }
        let destroyed = self.store.keys().destroy_key();

        let entries_removed = cleared?;
        let key_destroyed = destroyed?;

        tracing::info!(entries_removed, key_destroyed, "Erase-all completed");
        Ok(ErasureReport {
            entries_removed,
            key_destroyed,
        })
    }

    /// Export every readable entry. Never creates a key.
    pub fn export_all(&self, policy: LegacyPolicy) -> Result<DataExport> {
        let key = match self.store.keys().get_key() {
            Ok(key) => Some(key),
            Err(KeyError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        let mut entries = BTreeMap::new();
        let mut skipped = Vec::new();

        for summary in self.store.blobs().list()? {
            let name = summary.name;
            // Entry may have been deleted since listing.
            let Some(raw) = self.store.blobs().get(&name)? else {
                continue;
            };

            if EncryptedRecord::carries_marker(&raw) {
                let opened = EncryptedRecord::decode(&raw)
                    .map_err(SecurityError::from)
                    .and_then(|record| match &key {
                        Some(key) => crypto::decrypt(key, &record).map_err(SecurityError::from),
                        None => Err(SecurityError::KeyNotFound),
                    });

                match opened {
                    Ok(plaintext) => {
                        entries.insert(
                            name,
                            ExportedEntry {
                                source: ExportSource::Decrypted,
                                value: plaintext,
                            },
                        );
                    }
                    Err(e) => {
                        tracing::warn!(name = %name, error = %e, "Encrypted entry could not be exported");
                        skipped.push(SkippedEntry {
                            name,
                            reason: SkipReason::Undecryptable(e.to_string()),
                        });
                    }
                }
                continue;
            }

            match policy {
                LegacyPolicy::IncludeAsPlaintext => {
                    tracing::warn!(name = %name, "Exporting legacy unencrypted entry as-is");
                    entries.insert(
                        name,
                        ExportedEntry {
                            source: ExportSource::LegacyPlaintext,
                            value: Zeroizing::new(raw),
                        },
                    );
                }
                LegacyPolicy::Exclude => {
                    tracing::info!(name = %name, "Skipping legacy unencrypted entry");
                    skipped.push(SkippedEntry {
                        name,
                        reason: SkipReason::LegacyPlaintext,
                    });
                }
            }
        }

        tracing::info!(
            exported = entries.len(),
            skipped = skipped.len(),
            "Data export completed"
        );

        Ok(DataExport {
            exported_at: Utc::now(),
            entries,
            skipped,
        })
    }

    /// Seal every entry that is not yet in envelope form.
    pub fn migrate_legacy(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        for summary in self.store.blobs().list()? {
            let Some(raw) = self.store.blobs().get(&summary.name)? else {
                continue;
            };
            let raw = Zeroizing::new(raw);

            if EncryptedRecord::carries_marker(&raw) {
                report.already_encrypted += 1;
                continue;
            }

            self.store.store(&summary.name, &raw)?;
            tracing::info!(name = %summary.name, "Legacy entry encrypted in place");
            report.migrated.push(summary.name);
        }

        Ok(report)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::mock::MemoryVault;
    use crate::keys::{CredentialVault, KeyManager};
    use crate::store::{BlobStore, Database, EntrySummary, SqliteBlobStore, StoreError};

    struct Fixture {
        vault: Arc<MemoryVault>,
        blobs: Arc<SqliteBlobStore>,
        store: Arc<SecureStore>,
        compliance: ComplianceManager,
    }

    fn setup() -> Fixture {
        let vault = Arc::new(MemoryVault::new());
        let blobs = Arc::new(SqliteBlobStore::new(Database::open_in_memory().unwrap()));
        let keys = Arc::new(KeyManager::new(vault.clone()));
        let store = Arc::new(SecureStore::new(keys, blobs.clone()));
        let compliance = ComplianceManager::new(store.clone());
        Fixture {
            vault,
            blobs,
            store,
            compliance,
        }
    }

    /// Blob store whose `clear` always fails.
    struct StuckBlobStore(SqliteBlobStore);

    impl BlobStore for StuckBlobStore {
        fn get(&self, name: &str) -> std::result::Result<Option<Vec<u8>>, StoreError> {
            self.0.get(name)
        }
        fn put(&self, name: &str, value: &[u8]) -> std::result::Result<(), StoreError> {
            self.0.put(name, value)
        }
        fn remove(&self, name: &str) -> std::result::Result<bool, StoreError> {
            self.0.remove(name)
        }
        fn list(&self) -> std::result::Result<Vec<EntrySummary>, StoreError> {
            self.0.list()
        }
        fn clear(&self) -> std::result::Result<usize, StoreError> {
            Err(StoreError::LockPoisoned)
        }
    }

    #[test]
    fn test_erase_all_clears_entries_and_key() {
        let f = setup();
        f.store.store_str("a", "1").unwrap();
        f.store.store_str("b", "2").unwrap();

        let report = f.compliance.erase_all().unwrap();
        assert_eq!(
            report,
            ErasureReport {
                entries_removed: 2,
                key_destroyed: true
            }
        );
        assert!(f.blobs.list().unwrap().is_empty());
        assert!(f.vault.read_secret().unwrap().is_none());
        assert!(f.store.load("a").is_err());
    }

    #[test]
    fn test_erase_all_on_empty_installation() {
        let f = setup();
        let report = f.compliance.erase_all().unwrap();
        assert_eq!(report.entries_removed, 0);
        assert!(!report.key_destroyed);
    }

    #[test]
    fn test_erase_all_destroys_key_even_if_clear_fails() {
        let vault = Arc::new(MemoryVault::new());
        let blobs = Arc::new(StuckBlobStore(SqliteBlobStore::new(
            Database::open_in_memory().unwrap(),
        )));
        let keys = Arc::new(KeyManager::new(vault.clone()));
        let store = Arc::new(SecureStore::new(keys, blobs));
        store.store_str("survivor", "secret").unwrap();

        let compliance = ComplianceManager::new(store.clone());
        assert!(matches!(compliance.erase_all(), Err(SecurityError::Storage(_))));

        assert!(vault.read_secret().unwrap().is_none(), "Key must be shredded regardless");
        assert!(
            matches!(store.load("survivor"), Err(SecurityError::KeyNotFound)),
            "Surviving envelope is unreadable"
        );
    }

    #[test]
    fn test_export_decrypts_encrypted_entries() {
        let f = setup();
        f.store.store_str("userEmail", "a@b.com").unwrap();
        f.store.store("blob", &[0xff, 0x00]).unwrap();

        let export = f.compliance.export_all(LegacyPolicy::Exclude).unwrap();
        let values = export.values();
        assert_eq!(values.get("userEmail"), Some(&&b"a@b.com"[..]));
        assert_eq!(values.get("blob"), Some(&&[0xffu8, 0x00][..]));
        assert!(export.skipped().is_empty());
        assert_eq!(export.get("userEmail").unwrap().source, ExportSource::Decrypted);
    }

    #[test]
    fn test_export_excludes_legacy_plaintext_by_default() {
        let f = setup();
        f.store.store_str("sealed", "v").unwrap();
        f.blobs.put("legacy", b"old plaintext").unwrap();

        let export = f.compliance.export_all(LegacyPolicy::default()).unwrap();
        assert!(export.get("legacy").is_none());
        assert_eq!(
            export.skipped(),
            &[SkippedEntry {
                name: "legacy".to_string(),
                reason: SkipReason::LegacyPlaintext
            }]
        );
    }

    #[test]
    fn test_export_passes_legacy_through_when_requested() {
        let f = setup();
        f.blobs.put("legacy", b"old plaintext").unwrap();

        let export = f.compliance.export_all(LegacyPolicy::IncludeAsPlaintext).unwrap();
        let entry = export.get("legacy").expect("legacy entry should be exported");
        assert_eq!(entry.source, ExportSource::LegacyPlaintext);
        assert_eq!(entry.value(), b"old plaintext");
    }

    #[test]
    fn test_export_never_passes_corrupted_envelopes_through() {
        let f = setup();
        f.store.store_str("x", "secret").unwrap();
        let mut record = EncryptedRecord::decode(&f.blobs.get("x").unwrap().unwrap()).unwrap();
        record.tag[0] ^= 0x01;
        f.blobs.put("x", &record.encode().unwrap()).unwrap();

        let export = f.compliance.export_all(LegacyPolicy::IncludeAsPlaintext).unwrap();
        assert!(export.get("x").is_none(), "Corrupted ciphertext must not masquerade as plaintext");
        assert!(matches!(
            &export.skipped()[0],
            SkippedEntry { name, reason: SkipReason::Undecryptable(_) } if name == "x"
        ));
    }

    #[test]
    fn test_export_without_key_does_not_create_one() {
        let f = setup();
        f.store.store_str("x", "secret").unwrap();
        f.store.keys().destroy_key().unwrap();

        let export = f.compliance.export_all(LegacyPolicy::Exclude).unwrap();
        assert!(export.entries().is_empty());
        assert_eq!(export.skipped().len(), 1);
        assert!(f.vault.read_secret().unwrap().is_none(), "Export must never create a key");
    }

    #[test]
    fn test_export_json_document() {
        let f = setup();
        f.store.store_str("text", "hello").unwrap();
        f.store.store("bytes", &[0xff, 0xfe]).unwrap();
        f.blobs.put("legacy", b"plain").unwrap();

        let doc = f.compliance.export_all(LegacyPolicy::Exclude).unwrap().to_json();
        assert_eq!(doc["entries"]["text"]["encoding"], "utf8");
        assert_eq!(doc["entries"]["text"]["value"], "hello");
        assert_eq!(doc["entries"]["text"]["source"], "decrypted");
        assert_eq!(doc["entries"]["bytes"]["encoding"], "base64");
        assert_eq!(doc["entries"]["bytes"]["value"], BASE64.encode([0xff, 0xfe]));
        assert_eq!(doc["skipped"][0]["name"], "legacy");
        assert_eq!(doc["skipped"][0]["reason"]["kind"], "legacy_plaintext");
        assert!(doc["exported_at"].is_string());
    }

    #[test]
    fn test_exported_entry_debug_is_redacted() {
        let f = setup();
        f.store.store_str("pw", "hunter2").unwrap();
        let export = f.compliance.export_all(LegacyPolicy::Exclude).unwrap();
        let rendered = format!("{:?}", export);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_migrate_legacy_seals_plaintext_entries() {
        let f = setup();
        f.store.store_str("sealed", "v").unwrap();
        f.blobs.put("legacy", b"old value").unwrap();

        let report = f.compliance.migrate_legacy().unwrap();
        assert_eq!(report.migrated, vec!["legacy".to_string()]);
        assert_eq!(report.already_encrypted, 1);

        let raw = f.blobs.get("legacy").unwrap().unwrap();
        assert!(EncryptedRecord::carries_marker(&raw));
        assert_eq!(f.store.load_string("legacy").unwrap().as_str(), "old value");

        let again = f.compliance.migrate_legacy().unwrap();
        assert!(again.migrated.is_empty(), "Migration is idempotent");
        assert_eq!(again.already_encrypted, 2);
    }
}
