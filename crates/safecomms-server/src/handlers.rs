//! API route handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use safecomms_core::{score_verdict, DEFAULT_THRESHOLD};

use crate::auth::SessionToken;
use crate::error::{ApiError, Result};
use crate::models::{
    AdminLoginRequest, AdminLoginResponse, AdminLogoutRequest, AudioCheckRequest, CheckResponse,
    CorpusStatsResponse, ErrorReportEntry, ErrorReportsQuery, ErrorReportsResponse,
    ImageCheckRequest, ReportErrorRequest, ResolveErrorRequest, SessionQuery, TextCheckRequest,
    ThresholdQuery, MAX_TEXT_LEN,
};
use crate::state::AppState;

/// GET /health - Liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "terms_loaded": state.corpus_stats.total_terms,
    }))
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::BadRequest(format!(
            "text exceeds maximum length of {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

fn check_rate(state: &AppState) -> Result<()> {
    if !state.limiter.try_acquire() {
        warn!("Rate limit exceeded");
        return Err(ApiError::RateLimited);
    }
    Ok(())
}

/// POST /check/text - Evaluate text against the term corpus.
pub async fn check_text(
    State(state): State<AppState>,
    Json(req): Json<TextCheckRequest>,
) -> Result<Json<CheckResponse>> {
    check_rate(&state)?;
    validate_text(&req.text)?;

    debug!(text_len = req.text.len(), "Checking text");
    let verdict = state.engine.evaluate(&req.text);
    if !verdict.safe {
        info!(
            category = verdict.category.label(),
            matches = verdict.matched_terms.len(),
            "Text flagged"
        );
    }

    Ok(Json(verdict.into()))
}

/// POST /check/audio - Evaluate an audio transcript against the corpus.
pub async fn check_audio(
    State(state): State<AppState>,
    Json(req): Json<AudioCheckRequest>,
) -> Result<Json<CheckResponse>> {
    check_rate(&state)?;
    validate_text(&req.transcript)?;

    debug!(transcript_len = req.transcript.len(), "Checking transcript");
    let verdict = state.engine.evaluate(&req.transcript);
    if !verdict.safe {
        info!(
            category = verdict.category.label(),
            matches = verdict.matched_terms.len(),
            "Transcript flagged"
        );
    }

    Ok(Json(verdict.into()))
}

/// POST /check/image - Evaluate an image description against the corpus.
pub async fn check_image(
    State(state): State<AppState>,
    Json(req): Json<ImageCheckRequest>,
) -> Result<Json<CheckResponse>> {
    check_rate(&state)?;
    validate_text(&req.description)?;

    debug!(description_len = req.description.len(), "Checking image description");
    let verdict = state.engine.evaluate(&req.description);
    if !verdict.safe {
        info!(
            category = verdict.category.label(),
            matches = verdict.matched_terms.len(),
            "Image description flagged"
        );
    }

    Ok(Json(verdict.into()))
}

/// POST /check/text-ai - Evaluate text with the secondary toxicity model.
pub async fn check_text_ai(
    State(state): State<AppState>,
    Query(query): Query<ThresholdQuery>,
    Json(req): Json<TextCheckRequest>,
) -> Result<Json<CheckResponse>> {
    check_rate(&state)?;
    validate_text(&req.text)?;

    let threshold = query.threshold.unwrap_or(DEFAULT_THRESHOLD);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ApiError::BadRequest(
            "threshold must be between 0.0 and 1.0".to_string(),
        ));
    }

    let classifier = state
        .toxicity
        .as_ref()
        .ok_or_else(|| ApiError::ModelUnavailable("no classifier configured".to_string()))?;

    let score = match classifier.classify(&req.text) {
        Ok(score) => score,
        Err(e) => {
            warn!(error = %e, "Toxicity classifier failed");
            if let Err(storage_err) = state
                .db
                .report_error("classifier", "/check/text-ai", &e.to_string())
            {
                warn!(error = %storage_err, "Failed to record classifier failure");
            }
            return Err(ApiError::ModelUnavailable(e.to_string()));
        }
    };

    debug!(label = %score.label, score = score.score, threshold, "Model score");
    Ok(Json(score_verdict(&score, threshold).into()))
}

/// GET /corpus/stats - Realized corpus size counters.
pub async fn corpus_stats(State(state): State<AppState>) -> Json<CorpusStatsResponse> {
    Json(CorpusStatsResponse {
        base_terms: state.corpus_stats.base_terms,
        obfuscated_terms: state.corpus_stats.obfuscated_terms,
        total_terms: state.corpus_stats.total_terms,
    })
}

/// POST /admin/login - Open an operator session.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>> {
    let token = state.auth.login(&req.password)?;
    info!("Operator session opened");
    Ok(Json(AdminLoginResponse {
        success: true,
        session_token: Some(token.as_str().to_string()),
    }))
}

/// POST /admin/logout - Close an operator session.
pub async fn admin_logout(
    State(state): State<AppState>,
    Json(req): Json<AdminLogoutRequest>,
) -> Json<Value> {
    state
        .auth
        .logout(&SessionToken::from_string(req.session_token));
    Json(json!({ "success": true }))
}

fn require_session(state: &AppState, token: &str) -> Result<()> {
    if !state.auth.validate(&SessionToken::from_string(token)) {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

/// POST /admin/errors - Record a collaborator failure.
///
/// Unauthenticated by design: failing clients must be able to report
/// without operator credentials.
pub async fn report_error(
    State(state): State<AppState>,
    Json(req): Json<ReportErrorRequest>,
) -> Result<Json<ErrorReportEntry>> {
    if req.source.trim().is_empty() || req.message.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "source and message must not be empty".to_string(),
        ));
    }

    let report = state
        .db
        .report_error(&req.source, &req.path, &req.message)?;
    info!(id = report.id, source = %report.source, "Error report recorded");
    Ok(Json(report.into()))
}

/// GET /admin/errors - List error reports.
pub async fn list_errors(
    State(state): State<AppState>,
    Query(query): Query<ErrorReportsQuery>,
) -> Result<Json<ErrorReportsResponse>> {
    require_session(&state, &query.session_token)?;

    let reports = state.db.list_error_reports(query.include_resolved)?;
    let entries: Vec<ErrorReportEntry> = reports.into_iter().map(Into::into).collect();
    let total = entries.len();

    Ok(Json(ErrorReportsResponse {
        reports: entries,
        total,
    }))
}

/// POST /admin/errors/{id}/resolve - Mark a report resolved.
pub async fn resolve_error(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ResolveErrorRequest>,
) -> Result<Json<Value>> {
    require_session(&state, &req.session_token)?;

    let resolved = state.db.resolve_error(id, &req.resolved_by)?;
    if !resolved {
        return Err(ApiError::NotFound(format!(
            "no open error report with id {id}"
        )));
    }

    info!(id, resolved_by = %req.resolved_by, "Error report resolved");
    Ok(Json(json!({ "success": true })))
}

/// DELETE /admin/errors/{id} - Delete a report.
pub async fn delete_error(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>> {
    require_session(&state, &query.session_token)?;

    let deleted = state.db.delete_error(id)?;
    if !deleted {
        return Err(ApiError::NotFound(format!("no error report with id {id}")));
    }

    info!(id, "Error report deleted");
    Ok(Json(json!({ "success": true })))
}
