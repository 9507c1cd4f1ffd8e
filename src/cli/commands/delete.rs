//! `shardvault delete` — remove every slot of a stored secret.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{audit_event, open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, key_id: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete secret '{key_id}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let (vault, path) = open_vault(cli)?;

    if !vault.delete_key(key_id) {
        audit_event(&path, "delete", Some(key_id), "failed", None);
        return Err(VaultError::StorageFailure(format!(
            "could not delete '{key_id}'"
        )));
    }

    audit_event(&path, "delete", Some(key_id), "ok", None);
    output::success(&format!("Deleted secret '{key_id}'"));

    Ok(())
}
