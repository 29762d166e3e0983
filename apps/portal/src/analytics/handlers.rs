use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::analytics::recruiters::{get_top_recruiters, RecruiterStat, DEFAULT_RECRUITER_LIMIT};
use crate::analytics::skill_gap::{get_skill_gap_insights, SkillGapInsights, DEFAULT_TOP_K};
use crate::analytics::stats::{get_department_stats, DepartmentStats};
use crate::analytics::students::{get_department_students, DepartmentStudents};
use crate::analytics::summary::{build_department_summary, DepartmentSummary};
use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::user::Department;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecruitersQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapQuery {
    pub top_k: Option<usize>,
}

fn authorize(ctx: &RequestContext, raw: &str) -> Result<Department, AppError> {
    let department: Department = raw.parse().map_err(AppError::Validation)?;
    ctx.require_department_access(department)?;
    Ok(department)
}

/// GET /api/v1/departments/:dept/stats
pub async fn handle_department_stats(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(dept): Path<String>,
) -> Result<Json<DepartmentStats>, AppError> {
    let department = authorize(&ctx, &dept)?;
    Ok(Json(get_department_stats(&state.db, department).await?))
}

/// GET /api/v1/departments/:dept/recruiters?limit=5
pub async fn handle_top_recruiters(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(dept): Path<String>,
    Query(q): Query<RecruitersQuery>,
) -> Result<Json<Vec<RecruiterStat>>, AppError> {
    let department = authorize(&ctx, &dept)?;
    let limit = q.limit.unwrap_or(DEFAULT_RECRUITER_LIMIT);
    Ok(Json(get_top_recruiters(&state.db, department, limit).await?))
}

/// GET /api/v1/departments/:dept/skill-gap?top_k=10
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(dept): Path<String>,
    Query(q): Query<SkillGapQuery>,
) -> Result<Json<SkillGapInsights>, AppError> {
    let department = authorize(&ctx, &dept)?;
    let top_k = q.top_k.unwrap_or(DEFAULT_TOP_K);
    Ok(Json(
        get_skill_gap_insights(&state.db, department, top_k).await?,
    ))
}

/// GET /api/v1/departments/:dept/students
pub async fn handle_department_students(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(dept): Path<String>,
) -> Result<Json<DepartmentStudents>, AppError> {
    let department = authorize(&ctx, &dept)?;
    Ok(Json(get_department_students(&state.db, department).await?))
}

/// GET /api/v1/departments/:dept/summary
pub async fn handle_department_summary(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(dept): Path<String>,
) -> Result<Json<DepartmentSummary>, AppError> {
    let department = authorize(&ctx, &dept)?;
    Ok(Json(build_department_summary(&state.db, department).await?))
}
