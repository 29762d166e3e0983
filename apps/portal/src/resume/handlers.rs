//! Axum route handlers for resume uploads and analysis history.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::resume::ResumeAnalysis;
use crate::models::user::Role;
use crate::resume::analysis::{
    analyze_resume, latest_analysis, LatestAnalysisResponse, ResumeAnalysisResponse,
};
use crate::resume::extract::ResumeUpload;
use crate::resume::store::get_resume_history;
use crate::state::AppState;

/// POST /api/v1/students/me/resume
///
/// Multipart body with either a `file` part (PDF) or a `text` part.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    ctx: RequestContext,
    mut multipart: Multipart,
) -> Result<Json<ResumeAnalysisResponse>, AppError> {
    ctx.require_role(Role::Student)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?;
                upload = Some(ResumeUpload::Pdf(bytes));
            }
            Some("text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read text: {e}")))?;
                upload = Some(ResumeUpload::Text(text));
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| {
        AppError::Validation("Expected a 'file' or 'text' part".to_string())
    })?;

    let response = analyze_resume(&state.db, state.resume_scorer.as_ref(), &ctx.user, upload).await?;
    Ok(Json(response))
}

/// GET /api/v1/students/me/resume
///
/// Latest analysis plus the placement-readiness band for it.
pub async fn handle_latest_resume(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<LatestAnalysisResponse>, AppError> {
    ctx.require_role(Role::Student)?;
    let analysis = latest_analysis(&state.db, ctx.username())
        .await?
        .ok_or_else(|| AppError::NotFound("No resume analysis yet".to_string()))?;
    Ok(Json(analysis))
}

/// GET /api/v1/students/me/resume/history
pub async fn handle_resume_history(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<ResumeAnalysis>>, AppError> {
    ctx.require_role(Role::Student)?;
    let history = get_resume_history(&state.db, ctx.username()).await?;
    Ok(Json(history))
}
