//! `shardvault store` — encrypt, shard and persist a new secret.

use crate::cli::output;
use crate::cli::{audit_event, open_vault, read_secret_value, Cli};
use crate::errors::Result;

/// Execute the `store` command.
pub fn execute(cli: &Cli, service: &str, secret: Option<&str>) -> Result<()> {
    let value = read_secret_value(service, secret)?;
    let (vault, path) = open_vault(cli)?;

    let key_id = match vault.store_key(service, &value) {
        Ok(id) => id,
        Err(e) => {
            audit_event(&path, "store", None, "failed", Some(&e.to_string()));
            return Err(e);
        }
    };

    audit_event(&path, "store", Some(&key_id), "ok", Some(service));
    output::success(&format!(
        "Stored secret for '{service}' in {} shards",
        vault.options().shard_count
    ));
    println!("{key_id}");

    Ok(())
}
