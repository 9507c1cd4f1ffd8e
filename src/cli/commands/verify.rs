//! `shardvault verify` — structural presence check, no decryption.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `verify` command.  A missing slot is `CheckFailed`.
pub fn execute(cli: &Cli, key_id: &str) -> Result<()> {
    let (vault, _path) = open_vault(cli)?;

    if !vault.verify_key(key_id)? {
        return Err(VaultError::CheckFailed(format!(
            "'{key_id}' is missing or incomplete"
        )));
    }
    output::success(&format!("'{key_id}' is complete"));
    Ok(())
}
