//! High-level database interface.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::models::{ErrorReport, NewErrorReport};
use crate::pool::ConnectionPool;
use crate::repository::ReportsRepo;

/// High-level database interface for SafeComms.
#[derive(Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Create a new database at a specific path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        info!("Opening database at: {:?}", path);
        let pool = ConnectionPool::new(&path)?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = ConnectionPool::in_memory()?;
        Ok(Self { pool })
    }

    /// Record a collaborator failure and return the stored report.
    pub fn report_error(&self, source: &str, path: &str, message: &str) -> Result<ErrorReport> {
        let conn = self.pool.get()?;

        let id = ReportsRepo::insert(
            &conn,
            NewErrorReport {
                source: source.to_string(),
                path: path.to_string(),
                message: message.to_string(),
            },
        )?;

        let report = ReportsRepo::get_by_id(&conn, id)?.ok_or_else(|| {
            crate::error::StorageError::NotFound(format!("error report {id}"))
        })?;

        Ok(report)
    }

    /// List error reports, newest first.
    pub fn list_error_reports(&self, include_resolved: bool) -> Result<Vec<ErrorReport>> {
        let conn = self.pool.get()?;
        ReportsRepo::list(&conn, include_resolved)
    }

    /// Resolve an open error report. Returns false if it does not exist
    /// or was already resolved.
    pub fn resolve_error(&self, id: i64, resolved_by: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        ReportsRepo::resolve(&conn, id, resolved_by)
    }

    /// Delete an error report.
    pub fn delete_error(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        ReportsRepo::delete(&conn, id)
    }

    /// Count all error reports.
    pub fn count_error_reports(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        ReportsRepo::count(&conn)
    }
}
