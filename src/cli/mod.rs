// Strongbox — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: init, put, get, delete, list, export, migrate, erase, audit.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// Strongbox — encrypted local storage for sensitive values.
#[derive(Parser, Debug)]
#[command(name = "strongbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the storage key in the platform keyring and the blob database.
    Init,

    /// Encrypt and store a value under a name, replacing any previous value.
    Put {
        /// Entry name (e.g., "session-credential").
        name: String,

        /// The value to store. Read from stdin when omitted, which keeps it
        /// out of shell history.
        #[arg(long)]
        value: Option<String>,
    },

    /// Decrypt and print the value stored under a name.
    Get {
        name: String,
    },

    /// Delete an entry. Deleting a missing entry succeeds.
    Delete {
        name: String,
    },

    /// List stored entries (names and sizes only, nothing is decrypted).
    List,

    /// Export every readable entry as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Include entries that were never encrypted, marked as legacy plaintext.
        #[arg(long, default_value = "false")]
        include_legacy: bool,
    },

    /// Re-encrypt entries left in plaintext by older installations.
    Migrate,

    /// Delete every entry and destroy the storage key.
    Erase {
        /// Confirm the irreversible erase.
        #[arg(long, default_value = "false")]
        yes: bool,
    },

    /// Check the security posture. Exits with status 2 when issues are found.
    Audit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_put_with_value() {
        let cli = Cli::try_parse_from(["strongbox", "put", "userEmail", "--value", "a@b.com"]).unwrap();
        match cli.command {
            Commands::Put { name, value } => {
                assert_eq!(name, "userEmail");
                assert_eq!(value.as_deref(), Some("a@b.com"));
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from(["strongbox", "export", "--include-legacy", "--out", "dump.json"]).unwrap();
        match cli.command {
            Commands::Export { out, include_legacy } => {
                assert!(include_legacy);
                assert_eq!(out, Some(PathBuf::from("dump.json")));
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_erase_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["strongbox", "erase"]).unwrap();
        assert!(matches!(cli.command, Commands::Erase { yes: false }));
    }

    #[test]
    fn test_get_requires_name() {
        assert!(Cli::try_parse_from(["strongbox", "get"]).is_err());
    }
}
