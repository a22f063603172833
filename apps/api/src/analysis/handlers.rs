//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::analysis::run_analysis;
use crate::analysis::upload::read_analyze_form;
use crate::errors::AppError;
use crate::history::store::{insert_analysis, NewAnalysis};
use crate::scoring::{resolve_value, ResolvedScore};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Id of the saved history row; `None` for anonymous or unsaved analyses.
    pub id: Option<Uuid>,
    pub filename: String,
    pub score: ResolvedScore,
    pub raw: Value,
}

/// POST /api/v1/analyses
///
/// Multipart upload: resume file plus optional job description and user id.
/// Saves the result to history when a user id is given; a failed save is
/// logged and the analysis is still returned.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_analyze_form(multipart).await?;
    let outcome = run_analysis(state.analyzer.as_ref(), &form.upload).await?;

    let id = match form.user_id {
        Some(user_id) => {
            let saved = insert_analysis(
                &state.db,
                NewAnalysis {
                    user_id,
                    filename: &form.upload.filename,
                    job_description: form.upload.jd_text.as_deref().unwrap_or_default(),
                    raw: &outcome.raw,
                    score: &outcome.score,
                },
            )
            .await;
            match saved {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Could not save analysis for user {user_id}: {e}");
                    None
                }
            }
        }
        None => None,
    };

    Ok(Json(AnalyzeResponse {
        id,
        filename: form.upload.filename,
        score: outcome.score,
        raw: outcome.raw,
    }))
}

/// POST /api/v1/analyses/resolve
///
/// Resolves an already-fetched analysis payload. Any JSON value is accepted;
/// non-objects resolve to the all-default score.
pub async fn handle_resolve(Json(raw): Json<Value>) -> Json<ResolvedScore> {
    Json(resolve_value(&raw))
}
