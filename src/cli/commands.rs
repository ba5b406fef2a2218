// Strongbox — CLI Command Handlers
//
// Each function handles one CLI subcommand against an opened `Strongbox`.
// Values are only ever printed by `get` and `export`, which exist to
// return them.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::compliance::LegacyPolicy;
use crate::config::Config;
use zeroize::Zeroizing;

use crate::error::{Result, SecurityError};
use crate::strongbox::Strongbox;

use super::Commands;

/// Exit status of `audit` when the posture has issues.
const AUDIT_FAILED: u8 = 2;

/// Execute the parsed CLI command.
pub fn execute(command: Commands, config: &Config) -> Result<ExitCode> {
    let strongbox = Strongbox::open(config)?;

    match command {
        Commands::Init => cmd_init(&strongbox, config)?,
        Commands::Put { name, value } => cmd_put(&strongbox, &name, value)?,
        Commands::Get { name } => cmd_get(&strongbox, &name)?,
        Commands::Delete { name } => cmd_delete(&strongbox, &name)?,
        Commands::List => cmd_list(&strongbox)?,
        Commands::Export { out, include_legacy } => cmd_export(&strongbox, out, include_legacy)?,
        Commands::Migrate => cmd_migrate(&strongbox)?,
        Commands::Erase { yes } => cmd_erase(&strongbox, yes)?,
        Commands::Audit => {
            if !cmd_audit(&strongbox)? {
                return Ok(ExitCode::from(AUDIT_FAILED));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

// ─── Init ────────────────────────────────────────────────────────────────────

fn cmd_init(strongbox: &Strongbox, config: &Config) -> Result<()> {
    strongbox.initialize()?;

    println!("✓ Strongbox initialized");
    println!("  Database: {}", config.db_path().display());
    println!("  Storage key held in platform keyring ({})", config.keyring_service);
    println!();
    println!("Next: store a value with `strongbox put <name>`");

    Ok(())
}

// ─── Put / Get / Delete ──────────────────────────────────────────────────────

fn cmd_put(strongbox: &Strongbox, name: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => strongbox.store_str(name, &Zeroizing::new(v))?,
        None => strongbox.store(name, &read_value(std::io::stdin().lock())?)?,
    }
    println!("✓ Stored '{}'", name);

    Ok(())
}

/// Writes the bare value to stdout. A missing entry is an error, so a
/// shell substitution never captures a message in place of the secret.
fn cmd_get(strongbox: &Strongbox, name: &str) -> Result<()> {
    write_value(&mut std::io::stdout().lock(), &strongbox.load(name)?)
}

fn cmd_delete(strongbox: &Strongbox, name: &str) -> Result<()> {
    strongbox.delete(name)?;
    println!("✓ '{}' deleted", name);

    Ok(())
}

// ─── List ────────────────────────────────────────────────────────────────────

fn cmd_list(strongbox: &Strongbox) -> Result<()> {
    let entries = strongbox.list()?;

    if entries.is_empty() {
        println!("No entries stored yet.");
        println!("Add one with: strongbox put <name> --value <value>");
        return Ok(());
    }

    println!("Stored entries ({}):\n", entries.len());
    for entry in &entries {
        println!("  {}", entry);
    }

    Ok(())
}

// ─── Compliance (Export, Migrate, Erase) ─────────────────────────────────────

fn cmd_export(strongbox: &Strongbox, out: Option<PathBuf>, include_legacy: bool) -> Result<()> {
    let policy = if include_legacy {
        LegacyPolicy::IncludeAsPlaintext
    } else {
        LegacyPolicy::Exclude
    };

    let export = strongbox.export_all_data(policy)?;
    let json = serde_json::to_string_pretty(&export.to_json())?;

    match out {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("✓ Exported {} entries to {}", export.entries().len(), path.display());
        }
        None => println!("{}", json),
    }

    // Stderr so a redirected stdout stays valid JSON.
    for skipped in export.skipped() {
        eprintln!("Skipped '{}': {:?}", skipped.name, skipped.reason);
    }

    Ok(())
}

fn cmd_migrate(strongbox: &Strongbox) -> Result<()> {
    let report = strongbox.migrate_legacy()?;

    if report.migrated.is_empty() {
        println!("Nothing to migrate ({} entries already encrypted).", report.already_encrypted);
        return Ok(());
    }

    println!("✓ Re-encrypted {} legacy entries:", report.migrated.len());
    for name in &report.migrated {
        println!("  {}", name);
    }

    Ok(())
}

fn cmd_erase(strongbox: &Strongbox, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(SecurityError::Other(
            "Erase is irreversible. Re-run with `strongbox erase --yes` to confirm.".to_string(),
        ));
    }

    let report = strongbox.erase_all_data()?;
    println!("✓ Erased {} entries", report.entries_removed);
    if report.key_destroyed {
        println!("  Storage key destroyed");
    } else {
        println!("  No storage key was present");
    }

    Ok(())
}

// ─── Audit ───────────────────────────────────────────────────────────────────

/// Print the posture report. Returns whether it is valid.
fn cmd_audit(strongbox: &Strongbox) -> Result<bool> {
    let report = strongbox.validate_security_posture();

    let checked = strongbox.sensitive_names();
    if !checked.is_empty() {
        println!("Sensitive entries checked: {}", checked.join(", "));
    }

    if report.is_valid {
        println!("✓ Security posture is valid");
    } else {
        println!("Security posture has {} issue(s):", report.issues.len());
        for issue in &report.issues {
            println!("  - {}", issue);
        }
    }

    Ok(report.is_valid)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Read raw bytes from `reader`, dropping one trailing line ending.
fn read_value<R: Read>(mut reader: R) -> Result<Zeroizing<Vec<u8>>> {
    let mut value = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut value)?;

    if value.ends_with(b"\n") {
        value.pop();
        if value.ends_with(b"\r") {
            value.pop();
        }
    }
    Ok(value)
}

/// Text gets a trailing newline; anything else is written byte for byte.
fn write_value<W: Write>(out: &mut W, value: &[u8]) -> Result<()> {
    out.write_all(value)?;
    if std::str::from_utf8(value).is_ok() {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
