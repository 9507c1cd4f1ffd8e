//! Operation history kept in SQLite next to the store file.
//!
//! One row per CLI vault call: which operation, which key id, and how it
//! ended.  Secret values and data keys never reach this table.
//!
//! The log is best effort.  An unopenable or unwritable database turns
//! auditing off for that call and the vault operation proceeds.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::errors::{Result, VaultError};

const DB_FILE: &str = "audit.db";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS vault_events (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    at         TEXT NOT NULL,
    operation  TEXT NOT NULL,
    key_id     TEXT,
    outcome    TEXT NOT NULL,
    details    TEXT
);";

/// One recorded vault operation.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub key_id: Option<String>,
    pub outcome: String,
    pub details: Option<String>,
}

impl AuditEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let at: String = row.get("at")?;
        // A row with an unparseable stamp still shows up, dated now.
        let timestamp = DateTime::parse_from_rfc3339(&at)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(Self {
            id: row.get("id")?,
            timestamp,
            operation: row.get("operation")?,
            key_id: row.get("key_id")?,
            outcome: row.get("outcome")?,
            details: row.get("details")?,
        })
    }
}

/// Handle to the audit database of one store directory.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open or create `<dir>/audit.db`.  `None` means auditing is
    /// unavailable for this directory.
    pub fn open(dir: &Path) -> Option<Self> {
        let path = Self::db_path(dir);
        let conn = Connection::open(&path).ok()?;
        restrict_permissions(&path);
        conn.execute_batch(SCHEMA).ok()?;
        Some(Self { conn })
    }

    /// Append one event.  Write errors are dropped.
    pub fn log(&self, operation: &str, key_id: Option<&str>, outcome: &str, details: Option<&str>) {
        let inserted = self.conn.execute(
            "INSERT INTO vault_events (at, operation, key_id, outcome, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![Utc::now().to_rfc3339(), operation, key_id, outcome, details],
        );
        if let Err(e) = inserted {
            tracing::debug!(error = %e, operation, "audit write skipped");
        }
    }

    /// Newest-first events, at most `limit`, optionally no older than `since`.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let since = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, at, operation, key_id, outcome, details
                 FROM vault_events
                 WHERE ?1 IS NULL OR at >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| VaultError::AuditError(format!("prepare: {e}")))?;

        let rows = stmt
            .query_map(params![since, limit], AuditEntry::from_row)
            .map_err(|e| VaultError::AuditError(format!("query: {e}")))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| VaultError::AuditError(format!("read row: {e}")))
    }

    /// Location of the database for a store directory.
    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join(DB_FILE)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// Record an event in the audit database beside `store_path`.
pub fn log_audit(
    store_path: &Path,
    op: &str,
    key_id: Option<&str>,
    outcome: &str,
    details: Option<&str>,
) {
    let dir = store_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Some(audit) = AuditLog::open(dir) {
        audit.log(op, key_id, outcome, details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn fresh() -> (TempDir, AuditLog) {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::open(dir.path()).unwrap();
        (dir, log)
    }

    #[test]
    fn opening_creates_the_db_file() {
        let (dir, _log) = fresh();
        assert!(AuditLog::db_path(dir.path()).is_file());
    }

    #[test]
    fn events_come_back_newest_first() {
        let (_dir, log) = fresh();
        for op in ["store", "get", "rotate", "delete"] {
            log.log(op, Some("openai_1_a"), "ok", None);
        }

        let ops: Vec<String> = log
            .query(10, None)
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, ["delete", "rotate", "get", "store"]);
    }

    #[test]
    fn limit_caps_the_result() {
        let (_dir, log) = fresh();
        for n in 0..6 {
            log.log("store", Some(&format!("svc_{n}_x")), "ok", None);
        }
        assert_eq!(log.query(2, None).unwrap().len(), 2);
        assert_eq!(log.query(100, None).unwrap().len(), 6);
    }

    #[test]
    fn since_excludes_older_events() {
        let (_dir, log) = fresh();
        log.log("verify", Some("svc_1_x"), "ok", None);

        let hour_ago = Utc::now() - Duration::hours(1);
        let in_an_hour = Utc::now() + Duration::hours(1);
        assert_eq!(log.query(10, Some(hour_ago)).unwrap().len(), 1);
        assert_eq!(log.query(10, Some(in_an_hour)).unwrap().len(), 0);
    }

    #[test]
    fn optional_columns_survive_storage() {
        let (_dir, log) = fresh();
        log.log("store", None, "failed", Some("storage failure"));
        log.log("get", Some("svc_1_x"), "absent", None);

        let entries = log.query(10, None).unwrap();
        assert_eq!(entries[0].key_id.as_deref(), Some("svc_1_x"));
        assert_eq!(entries[0].outcome, "absent");
        assert!(entries[0].details.is_none());
        assert!(entries[1].key_id.is_none());
        assert_eq!(entries[1].details.as_deref(), Some("storage failure"));
    }

    #[test]
    fn helper_uses_the_store_directory() {
        let dir = TempDir::new().unwrap();
        log_audit(&dir.path().join("store.json"), "delete", Some("svc_1_x"), "ok", None);

        let log = AuditLog::open(dir.path()).unwrap();
        let entries = log.query(10, None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, "delete");
    }

    #[test]
    fn missing_directory_disables_auditing() {
        assert!(AuditLog::open(Path::new("/definitely/not/a/real/dir")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn db_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, _log) = fresh();
        let mode = std::fs::metadata(AuditLog::db_path(dir.path()))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
