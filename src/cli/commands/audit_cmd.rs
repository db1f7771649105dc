//! `vaultkeep audit` — display the audit log.
//!
//! Usage:
//!   vaultkeep audit               # show last 50 entries
//!   vaultkeep audit --last 20     # show last 20
//!   vaultkeep audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::cli::Context;
use crate::errors::{Result, VaultKeepError};

#[cfg(feature = "audit-log")]
use crate::audit::{AuditEntry, AuditLog};
#[cfg(feature = "audit-log")]
use crate::cli::output;

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(ctx: &Context, last: usize, since: Option<&str>) -> Result<()> {
    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let audit = AuditLog::open(&ctx.audit_dir, ctx.settings.audit_retention_days)
        .ok_or_else(|| VaultKeepError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Execute the `audit` command (built without the audit log).
#[cfg(not(feature = "audit-log"))]
pub fn execute(ctx: &Context, last: usize, since: Option<&str>) -> Result<()> {
    let _ = (ctx, last);
    if let Some(s) = since {
        parse_duration(s)?;
    }
    Err(VaultKeepError::AuditError(
        "this build does not include the audit log (feature `audit-log`)".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(VaultKeepError::InvalidInput(format!(
            "invalid duration '{input}', use a format like 7d, 24h or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        VaultKeepError::InvalidInput(format!("invalid duration '{input}', bad number"))
    })?;
    if num < 0 {
        return Err(VaultKeepError::InvalidInput(format!(
            "invalid duration '{input}', must not be negative"
        )));
    }

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        _ => chrono::Duration::minutes(num),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Level", "Operation", "Details"]);

    for entry in entries {
        let time = entry
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        table.add_row(vec![
            time,
            colorize_level(&entry.level),
            entry.operation.clone(),
            entry.details.clone(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

#[cfg(feature = "audit-log")]
fn colorize_level(level: &str) -> String {
    use console::style;

    match level {
        "WARN" => style(level).yellow().to_string(),
        "ERROR" => style(level).red().to_string(),
        _ => style(level).green().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_days() {
        let dt = parse_duration("7d").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_duration_hours() {
        let dt = parse_duration("24h").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_hours() - 24).abs() <= 1);
    }

    #[test]
    fn parse_duration_minutes() {
        let dt = parse_duration(" 30m ").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("-3d").is_err());
    }

    #[cfg(feature = "audit-log")]
    #[test]
    fn colorize_level_keeps_text() {
        for level in ["INFO", "WARN", "ERROR"] {
            assert!(console::strip_ansi_codes(&colorize_level(level)).contains(level));
        }
    }

    #[cfg(feature = "audit-log")]
    #[test]
    fn since_filter_includes_recent_entries() {
        use crate::audit::{AuditKind, AuditSink};

        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path(), 7).unwrap();
        audit.record(AuditKind::SecretAdded, "secret 'Gmail' added");

        let since = parse_duration("1h").unwrap();
        let entries = audit.query(10, Some(since)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, "add");
    }
}
