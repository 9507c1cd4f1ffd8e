//! `shardvault rotate` — store a replacement secret and delete the old one.

use crate::cli::output;
use crate::cli::{audit_event, open_vault, read_secret_value, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `rotate` command.
pub fn execute(cli: &Cli, key_id: &str, service: &str, secret: Option<&str>) -> Result<()> {
    let (vault, path) = open_vault(cli)?;

    if !vault.verify_key(key_id)? {
        return Err(VaultError::NotFound);
    }

    let value = read_secret_value(service, secret)?;

    match vault.rotate_key(key_id, service, &value) {
        Ok(new_id) => {
            audit_event(&path, "rotate", Some(key_id), "ok", Some(&new_id));
            output::success(&format!("Rotated '{key_id}'"));
            println!("{new_id}");
            Ok(())
        }
        Err(e) => {
            audit_event(&path, "rotate", Some(key_id), "failed", Some(&e.to_string()));
            Err(e)
        }
    }
}
