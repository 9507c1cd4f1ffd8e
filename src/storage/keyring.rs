//! OS keyring backend.
//!
//! Stores each vault slot as its own credential in the operating
//! system's secure credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! The keyring cannot enumerate entries, so `keys` is unsupported and
//! `SecretVault::list_key_ids` fails on this backend.

use super::KeyValueStore;
use crate::errors::{Result, VaultError};

/// Service name used in the OS keyring when none is given.
pub const DEFAULT_SERVICE_NAME: &str = "shardvault";

/// A `KeyValueStore` where every slot is one keyring credential.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<::keyring::Entry> {
        ::keyring::Entry::new(&self.service, key)
            .map_err(|e| VaultError::KeyringError(format!("failed to create keyring entry: {e}")))
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(::keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VaultError::StorageFailure(format!(
                "failed to read from keyring: {e}"
            ))),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| VaultError::StorageFailure(format!("failed to write to keyring: {e}")))
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(::keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::StorageFailure(format!(
                "failed to delete from keyring: {e}"
            ))),
        }
    }

    fn keys(&self, _prefix: &str) -> Result<Vec<String>> {
        Err(VaultError::StorageFailure(
            "the OS keyring cannot enumerate stored slots".into(),
        ))
    }
}
