//! Data models for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded collaborator failure.
///
/// The match engine itself cannot fail on well-formed input; reports
/// come from the layers around it (transport, classifier, storage).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Unique identifier.
    pub id: i64,
    /// Which collaborator reported the failure.
    pub source: String,
    /// Request path or component location.
    pub path: String,
    /// Human-readable failure message.
    pub message: String,
    /// When the failure was recorded.
    pub created_at: DateTime<Utc>,
    /// When the report was resolved, if it has been.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Operator who resolved the report.
    pub resolved_by: Option<String>,
}

impl ErrorReport {
    /// Whether this report is still open.
    pub fn is_open(&self) -> bool {
        self.resolved_at.is_none()
    }
}

/// Parameters for recording a new error report.
#[derive(Debug, Clone)]
pub struct NewErrorReport {
    /// Which collaborator reported the failure.
    pub source: String,
    /// Request path or component location.
    pub path: String,
    /// Human-readable failure message.
    pub message: String,
}
