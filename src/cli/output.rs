//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Status lines go to stderr
//! so stdout carries only data (key ids, secret values).

use comfy_table::{ContentArrangement, Table};
use console::style;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    eprintln!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of key ids with the service label split out.
pub fn print_key_ids_table(ids: &[String]) {
    if ids.is_empty() {
        info("No secrets stored yet.");
        tip("Run `shardvault store <SERVICE>` to add your first secret.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key id", "Service", "Created"]);

    for id in ids {
        let (service, created) = describe_key_id(id);
        table.add_row(vec![id.clone(), service, created]);
    }

    println!("{table}");
}

/// Split `{service}_{millis}_{suffix}` back into service and timestamp.
fn describe_key_id(id: &str) -> (String, String) {
    let mut parts = id.rsplitn(3, '_');
    let _suffix = parts.next();
    let millis = parts.next().and_then(|m| m.parse::<i64>().ok());
    let service = parts.next();

    match (service, millis.and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)) {
        (Some(service), Some(ts)) => (
            service.to_string(),
            ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        _ => ("-".to_string(), "-".to_string()),
    }
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
pub fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Key id", "Outcome", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.key_id.clone().unwrap_or_else(|| "-".into()),
            entry.outcome.clone(),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    match op {
        "store" => style(op).green().to_string(),
        "get" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "rotate" => style(op).yellow().to_string(),
        _ => op.to_string(),
    }
}
