//! CLI module — Clap argument parser, output helpers, and command implementations.
//!
//! The CLI is only a caller of the vault: every command opens a
//! `SecretVault`, invokes one vault or comparator operation, and prints
//! the outcome.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::storage::{FileStore, KeyValueStore};
use crate::vault::SecretVault;

/// ShardVault CLI: sharded local secret vault.
#[derive(Parser)]
#[command(
    name = "shardvault",
    about = "Sharded local secret vault with constant-time comparison",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store file (default: `store_path` from .shardvault.toml, else .shardvault/store.json)
    #[arg(long, env = "SHARDVAULT_STORE", global = true)]
    pub store: Option<String>,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = Backend::File, global = true)]
    pub backend: Backend,

    /// Enable debug logging (overridden by SHARDVAULT_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where vault slots are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// A JSON file on disk
    File,
    /// The operating system keyring
    #[cfg(feature = "keyring-store")]
    Keyring,
}

/// How `compare` should interpret its two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompareFormat {
    Raw,
    Hex,
    Base64,
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt and store a secret, printing its key id
    Store {
        /// Service label used to build the key id (e.g. openai)
        service: String,
        /// Secret value (omit for interactive prompt or piped stdin)
        secret: Option<String>,
    },

    /// Print a stored secret
    Get {
        /// Key id returned by `store`
        key_id: String,
    },

    /// Check that every slot of a secret exists (exit code 1 if not)
    Verify {
        /// Key id returned by `store`
        key_id: String,
    },

    /// Delete a stored secret
    Delete {
        /// Key id returned by `store`
        key_id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Replace a secret with a new value under a new key id
    Rotate {
        /// Key id of the secret to replace
        key_id: String,
        /// Service label for the new key id
        service: String,
        /// New secret value (omit for interactive prompt or piped stdin)
        secret: Option<String>,
    },

    /// List the key ids of all stored secrets
    List,

    /// Compare two values in constant time (exit code 1 if they differ)
    Compare {
        a: String,
        b: String,
        /// Input format to validate before comparing
        #[arg(short, long, value_enum, default_value_t = CompareFormat::Raw)]
        format: CompareFormat,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.shardvault.toml` from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the store file from `--store` or the settings.
pub fn store_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.store {
        Some(path) => cwd.join(path),
        None => settings.resolve_store_path(&cwd),
    })
}

/// Build the vault for the selected backend.
///
/// Returns the store file path alongside, which also locates the audit
/// database.
pub fn open_vault(cli: &Cli) -> Result<(SecretVault<Box<dyn KeyValueStore>>, PathBuf)> {
    let settings = load_settings()?;
    let path = store_path(cli, &settings)?;

    let store: Box<dyn KeyValueStore> = match cli.backend {
        Backend::File => Box::new(FileStore::open(&path)),
        #[cfg(feature = "keyring-store")]
        Backend::Keyring => Box::new(crate::storage::KeyringStore::default()),
    };

    let vault = SecretVault::with_options(store, settings.vault_options()?)?;
    Ok((vault, path))
}

/// Obtain a secret value from one of three sources: the command line,
/// piped stdin, or a hidden interactive prompt.
pub fn read_secret_value(label: &str, value: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end().len();
        buf.truncate(trimmed);
        return Ok(buf);
    }

    let secret = dialoguer::Password::new()
        .with_prompt(format!("Enter secret for {label}"))
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(secret))
}

/// Record an audit event if audit logging is compiled in.
pub fn audit_event(
    store_path: &std::path::Path,
    op: &str,
    key_id: Option<&str>,
    outcome: &str,
    details: Option<&str>,
) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(store_path, op, key_id, outcome, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (store_path, op, key_id, outcome, details);
}
