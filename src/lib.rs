// Strongbox — Library root
//
// Encrypted local storage: crypto primitives, the keyring-held storage key,
// the blob store, compliance operations, the posture auditor and the CLI.

pub mod audit;
pub mod cli;
pub mod compliance;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keys;
pub mod store;
pub mod strongbox;

pub use audit::{Issue, SecurityAuditor, ValidationReport};
pub use compliance::{ComplianceManager, DataExport, ErasureReport, LegacyPolicy, MigrationReport};
pub use config::Config;
pub use error::{Result, SecurityError};
pub use strongbox::Strongbox;
