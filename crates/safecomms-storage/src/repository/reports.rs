//! Error reports repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::models::{ErrorReport, NewErrorReport};

/// Repository for error report operations.
pub struct ReportsRepo;

impl ReportsRepo {
    /// Insert a new error report, returning its id.
    pub fn insert(conn: &Connection, report: NewErrorReport) -> Result<i64> {
        conn.execute(
            "INSERT INTO error_reports (source, path, message, created_at, resolved_at, resolved_by)
             VALUES (?1, ?2, ?3, ?4, NULL, NULL)",
            params![
                report.source,
                report.path,
                report.message,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a report by ID.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<ErrorReport>> {
        let mut stmt = conn.prepare(
            "SELECT id, source, path, message, created_at, resolved_at, resolved_by
             FROM error_reports WHERE id = ?1",
        )?;

        let report = stmt.query_row([id], map_report).ok();

        Ok(report)
    }

    /// List reports, newest first, optionally hiding resolved ones.
    pub fn list(conn: &Connection, include_resolved: bool) -> Result<Vec<ErrorReport>> {
        let query = if include_resolved {
            "SELECT id, source, path, message, created_at, resolved_at, resolved_by
             FROM error_reports ORDER BY id DESC"
        } else {
            "SELECT id, source, path, message, created_at, resolved_at, resolved_by
             FROM error_reports WHERE resolved_at IS NULL ORDER BY id DESC"
        };

        let mut stmt = conn.prepare(query)?;
        let reports = stmt
            .query_map([], map_report)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    /// Mark an unresolved report as resolved. Returns false if the
    /// report does not exist or is already resolved.
    pub fn resolve(conn: &Connection, id: i64, resolved_by: &str) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE error_reports
             SET resolved_at = ?1, resolved_by = ?2
             WHERE id = ?3 AND resolved_at IS NULL",
            params![Utc::now().to_rfc3339(), resolved_by, id],
        )?;

        Ok(changed > 0)
    }

    /// Delete a report. Returns false if it did not exist.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let changed = conn.execute("DELETE FROM error_reports WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Count all reports.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM error_reports", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn map_report(row: &Row<'_>) -> rusqlite::Result<ErrorReport> {
    Ok(ErrorReport {
        id: row.get(0)?,
        source: row.get(1)?,
        path: row.get(2)?,
        message: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        resolved_at: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_datetime(&s)),
        resolved_by: row.get(6)?,
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}
