//! `shardvault audit` — display the audit log.
//!
//! Usage:
//!   shardvault audit               # show last 50 entries
//!   shardvault audit --last 20     # show last 20
//!   shardvault audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::{load_settings, output, store_path};

    let settings = load_settings()?;
    let path = store_path(cli, &settings)?;
    let dir = path
        .parent()
        .map_or_else(|| std::path::PathBuf::from("."), std::path::Path::to_path_buf);

    let audit = AuditLog::open(&dir)
        .ok_or_else(|| VaultError::AuditError("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    output::print_audit_table(&entries);

    Ok(())
}

/// Execute the `audit` command (audit logging compiled out).
#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, since: Option<&str>) -> Result<()> {
    if let Some(s) = since {
        parse_duration(s)?;
    }
    Err(VaultError::AuditError(
        "this build does not include audit logging (feature `audit-log`)".into(),
    ))
}

/// Turn `7d`, `24h` or `30m` into the instant that long ago.
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}' (expected a number followed by d, h or m)"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;

    let span = match unit {
        'd' => chrono::Duration::days(amount),
        'h' => chrono::Duration::hours(amount),
        'm' => chrono::Duration::minutes(amount),
        _ => return Err(invalid()),
    };
    Ok(Utc::now() - span)
}
