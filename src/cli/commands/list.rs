//! `shardvault list` — display every complete record's key id.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (vault, path) = open_vault(cli)?;
    let ids = vault.list_key_ids()?;

    output::info(&format!("{} — {} secret(s)", path.display(), ids.len()));
    output::print_key_ids_table(&ids);

    Ok(())
}
