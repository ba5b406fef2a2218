// Strongbox — Security Posture Auditor
//
// Read-only checks over the storage key and a configured list of sensitive
// entry names. Safe to run at any time, including before initialization;
// it never creates a key or writes an entry.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::SecurityError;
use crate::store::SecureStore;

/// One posture problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", content = "name", rename_all = "snake_case")]
pub enum Issue {
    /// No storage key is retrievable.
    KeyMissing,
    /// A sensitive name holds a value that does not load as an encrypted record.
    UnencryptedSensitiveData(String),
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::KeyMissing => write!(f, "storage key is missing"),
            Issue::UnencryptedSensitiveData(name) => {
                write!(f, "sensitive entry '{}' is not stored encrypted", name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<Issue>,
}

pub struct SecurityAuditor {
    store: Arc<SecureStore>,
    sensitive_names: Vec<String>,
}

impl SecurityAuditor {
    pub fn new(store: Arc<SecureStore>, sensitive_names: Vec<String>) -> Self {
        Self {
            store,
            sensitive_names,
        }
    }

    pub fn sensitive_names(&self) -> &[String] {
        &self.sensitive_names
    }

    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        match self.store.keys().has_key() {
            Ok(true) => {}
            Ok(false) => issues.push(Issue::KeyMissing),
            Err(e) => {
                tracing::warn!(error = %e, "Storage key could not be read during audit");
                issues.push(Issue::KeyMissing);
            }
        }

        for name in &self.sensitive_names {
            match self.store.contains(name) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "Could not inspect sensitive entry");
                    continue;
                }
            }

            match self.store.load(name) {
                Ok(_) | Err(SecurityError::NotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "Sensitive entry failed to load as encrypted data");
                    issues.push(Issue::UnencryptedSensitiveData(name.clone()));
                }
            }
        }

        let report = ValidationReport {
            is_valid: issues.is_empty(),
            issues,
        };
        if report.is_valid {
            tracing::debug!("Security posture validated");
        } else {
            tracing::warn!(issues = report.issues.len(), "Security posture has issues");
        }
        report
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
