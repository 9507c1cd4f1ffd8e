//! `shardvault get` — retrieve and print a single secret's value.

use crate::cli::{audit_event, open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(cli: &Cli, key_id: &str) -> Result<()> {
    let (vault, path) = open_vault(cli)?;

    match vault.retrieve_key(key_id)? {
        Some(secret) => {
            audit_event(&path, "get", Some(key_id), "ok", None);
            println!("{}", secret.as_str());
            Ok(())
        }
        None => {
            audit_event(&path, "get", Some(key_id), "absent", None);
            Err(VaultError::NotFound)
        }
    }
}
