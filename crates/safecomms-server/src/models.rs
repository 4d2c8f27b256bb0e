//! API request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use safecomms_core::Verdict;
use safecomms_storage::ErrorReport;

/// Maximum accepted input length, in characters.
///
/// Enforced here, at the validation layer; the match engine itself
/// places no limit and only degrades linearly on longer input.
pub const MAX_TEXT_LEN: usize = 20_000;

/// Request body for POST /check/text.
#[derive(Debug, Deserialize)]
pub struct TextCheckRequest {
    /// The text to evaluate.
    pub text: String,
}

/// Request body for POST /check/audio.
#[derive(Debug, Deserialize)]
pub struct AudioCheckRequest {
    /// The transcript to evaluate.
    pub transcript: String,
}

/// Request body for POST /check/image.
#[derive(Debug, Deserialize)]
pub struct ImageCheckRequest {
    /// The image description to evaluate.
    pub description: String,
}

/// Response body for the check endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub safe: bool,
    pub category: String,
    pub matched_terms: Vec<String>,
    pub reason: String,
}

impl From<Verdict> for CheckResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            safe: verdict.safe,
            category: verdict.category.label().to_string(),
            matched_terms: verdict.matched_terms,
            reason: verdict.reason,
        }
    }
}

/// Query parameters for POST /check/text-ai.
#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    /// Decision threshold in 0.0..=1.0 (default 0.5).
    pub threshold: Option<f32>,
}

/// Response body for GET /corpus/stats.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorpusStatsResponse {
    /// Realized count of seed + affix-derived terms.
    pub base_terms: usize,
    /// Realized count of generator-derived obfuscated terms.
    pub obfuscated_terms: usize,
    /// Total terms across all categories.
    pub total_terms: usize,
}

/// Request body for POST /admin/login.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    /// Operator password.
    pub password: String,
}

/// Response body for POST /admin/login.
#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    /// Whether authentication was successful.
    pub success: bool,
    /// Session token (only present on success).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

/// Request body for POST /admin/logout.
#[derive(Debug, Deserialize)]
pub struct AdminLogoutRequest {
    pub session_token: String,
}

/// Request body for POST /admin/errors.
#[derive(Debug, Deserialize)]
pub struct ReportErrorRequest {
    /// Which collaborator failed.
    pub source: String,
    /// Request path or component location.
    pub path: String,
    /// Failure message.
    pub message: String,
}

/// Query parameters for GET /admin/errors.
#[derive(Debug, Deserialize)]
pub struct ErrorReportsQuery {
    /// Include resolved reports (default: true).
    #[serde(default = "default_include_resolved")]
    pub include_resolved: bool,
    /// Operator session token.
    pub session_token: String,
}

fn default_include_resolved() -> bool {
    true
}

/// Query parameters for DELETE /admin/errors/{id}.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_token: String,
}

/// Request body for POST /admin/errors/{id}/resolve.
#[derive(Debug, Deserialize)]
pub struct ResolveErrorRequest {
    pub session_token: String,
    /// Operator name to record on the report.
    pub resolved_by: String,
}

/// An error report in API responses.
#[derive(Debug, Serialize)]
pub struct ErrorReportEntry {
    pub id: i64,
    pub source: String,
    pub path: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
}

impl From<ErrorReport> for ErrorReportEntry {
    fn from(report: ErrorReport) -> Self {
        Self {
            id: report.id,
            source: report.source,
            path: report.path,
            message: report.message,
            created_at: report.created_at,
            resolved_at: report.resolved_at,
            resolved_by: report.resolved_by,
        }
    }
}

/// Response body for GET /admin/errors.
#[derive(Debug, Serialize)]
pub struct ErrorReportsResponse {
    pub reports: Vec<ErrorReportEntry>,
    pub total: usize,
}
