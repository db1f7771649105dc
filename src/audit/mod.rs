//! Audit log — operation history for the vault.
//!
//! Collaborators report events through the `AuditSink` trait; the sink
//! is built once at startup and handed to whoever needs it.  With the
//! `audit-log` feature, `AuditLog` stores entries in a local SQLite
//! database at `<audit_dir>/audit.db`.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.  Secret
//! values must never be passed to a sink; names are fine.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

#[cfg(feature = "audit-log")]
use std::path::PathBuf;

#[cfg(feature = "audit-log")]
use chrono::{DateTime, Duration, Utc};
#[cfg(feature = "audit-log")]
use rusqlite::Connection;

#[cfg(feature = "audit-log")]
use crate::errors::{Result, VaultKeepError};

/// Severity attached to every audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    LoadSucceeded,
    WrongPassword,
    SaveSucceeded,
    VaultCreated,
    SecretAdded,
    SecretUpdated,
    SecretDeleted,
    PasswordChanged,
    FileLocked,
    FileUnlocked,
    OperationFailed,
    SessionClosed,
}

impl AuditKind {
    /// Stable label written to the log.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadSucceeded => "load",
            Self::WrongPassword => "wrong-password",
            Self::SaveSucceeded => "save",
            Self::VaultCreated => "init",
            Self::SecretAdded => "add",
            Self::SecretUpdated => "update",
            Self::SecretDeleted => "delete",
            Self::PasswordChanged => "passwd",
            Self::FileLocked => "lock",
            Self::FileUnlocked => "unlock",
            Self::OperationFailed => "error",
            Self::SessionClosed => "close",
        }
    }

    pub fn level(self) -> Level {
        match self {
            Self::WrongPassword => Level::Warn,
            Self::OperationFailed => Level::Error,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver for audit events.
///
/// Implementations must never fail the caller: `record` has no return
/// value on purpose.
pub trait AuditSink {
    fn record(&self, kind: AuditKind, description: &str);
}

/// A sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudit;

impl AuditSink for NullAudit {
    fn record(&self, _kind: AuditKind, _description: &str) {}
}

/// A single audit log entry.
#[cfg(feature = "audit-log")]
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub operation: String,
    pub details: String,
}

/// SQLite-backed audit log.
#[cfg(feature = "audit-log")]
pub struct AuditLog {
    conn: Connection,
}

#[cfg(feature = "audit-log")]
impl AuditLog {
    /// Open (or create) the audit database at `<audit_dir>/audit.db`
    /// and drop entries older than `retention_days`.
    ///
    /// Pruning happens here and nowhere else.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(audit_dir: &Path, retention_days: u32) -> Option<Self> {
        if !audit_dir.exists() {
            std::fs::create_dir_all(audit_dir).ok()?;
        }

        let db_path = Self::db_path(audit_dir);
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                level       TEXT NOT NULL,
                operation   TEXT NOT NULL,
                details     TEXT NOT NULL
            );",
        )
        .ok()?;

        let log = Self { conn };
        let _ = log.prune_older_than(Utc::now() - Duration::days(i64::from(retention_days)));
        Some(log)
    }

    /// Delete every entry recorded before `cutoff`.  Returns how many
    /// rows were removed.
    pub fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.conn
            .execute(
                "DELETE FROM audit_log WHERE timestamp < ?1",
                rusqlite::params![cutoff.to_rfc3339()],
            )
            .map_err(|e| VaultKeepError::AuditError(format!("prune: {e}")))
    }

    /// Insert an entry with an explicit timestamp.
    fn insert(&self, timestamp: DateTime<Utc>, kind: AuditKind, description: &str) {
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, level, operation, details)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                timestamp.to_rfc3339(),
                kind.level().as_str(),
                kind.as_str(),
                description
            ],
        );
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since = since.map_or_else(String::new, |ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, level, operation, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| VaultKeepError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    level: row.get(2)?,
                    operation: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(|e| VaultKeepError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| VaultKeepError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database (for testing/display).
    pub fn db_path(audit_dir: &Path) -> PathBuf {
        audit_dir.join("audit.db")
    }
}

#[cfg(feature = "audit-log")]
impl AuditSink for AuditLog {
    fn record(&self, kind: AuditKind, description: &str) {
        self.insert(Utc::now(), kind, description);
    }
}

#[cfg(feature = "audit-log")]
impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}

/// Build the process-wide sink: the SQLite log when available, a no-op
/// sink otherwise.
pub fn open_sink(audit_dir: &Path, retention_days: u32) -> Rc<dyn AuditSink> {
    #[cfg(feature = "audit-log")]
    if let Some(log) = AuditLog::open(audit_dir, retention_days) {
        return Rc::new(log);
    }

    #[cfg(not(feature = "audit-log"))]
    let _ = (audit_dir, retention_days);

    Rc::new(NullAudit)
}

#[cfg(all(test, feature = "audit-log"))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path(), 7);
        assert!(audit.is_some(), "should open successfully");
        assert!(dir.path().join("audit.db").exists());
    }

    #[test]
    fn open_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("logs");
        assert!(AuditLog::open(&nested, 7).is_some());
        assert!(nested.join("audit.db").exists());
    }

    #[test]
    fn record_and_query_roundtrip() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path(), 7).unwrap();

        audit.record(AuditKind::SecretAdded, "secret 'Gmail' added");
        audit.record(AuditKind::WrongPassword, "failed attempt to decrypt the vault");
        audit.record(AuditKind::SaveSucceeded, "vault saved (1 secrets)");

        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 3);

        // Most recent first.
        assert_eq!(entries[0].operation, "save");
        assert_eq!(entries[1].operation, "wrong-password");
        assert_eq!(entries[1].level, "WARN");
        assert_eq!(entries[2].details, "secret 'Gmail' added");
    }

    #[test]
    fn query_with_limit() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path(), 7).unwrap();

        for i in 0..10 {
            audit.record(AuditKind::SecretAdded, &format!("secret 'KEY_{i}' added"));
        }

        assert_eq!(audit.query(3, None).unwrap().len(), 3);
    }

    #[test]
    fn query_with_since_filter() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path(), 7).unwrap();

        audit.record(AuditKind::LoadSucceeded, "vault loaded");

        let past = Utc::now() - Duration::hours(1);
        assert_eq!(audit.query(10, Some(past)).unwrap().len(), 1);

        let future = Utc::now() + Duration::hours(1);
        assert!(audit.query(10, Some(future)).unwrap().is_empty());
    }

    #[test]
    fn reopening_prunes_expired_entries() {
        let dir = TempDir::new().unwrap();
        {
            let audit = AuditLog::open(dir.path(), 7).unwrap();
            audit.insert(Utc::now() - Duration::days(30), AuditKind::SaveSucceeded, "old");
            audit.insert(Utc::now() - Duration::days(2), AuditKind::SaveSucceeded, "recent");
            assert_eq!(audit.query(10, None).unwrap().len(), 2);
        }

        let audit = AuditLog::open(dir.path(), 7).unwrap();
        let entries = audit.query(10, None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details, "recent");
    }

    #[test]
    fn open_returns_none_on_bad_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        assert!(AuditLog::open(&file, 7).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn audit_db_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path(), 7).unwrap();

        let perms = std::fs::metadata(dir.path().join("audit.db"))
            .unwrap()
            .permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
