use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::student::{PlacementRow, StudentProfileRow};
use crate::models::user::{Department, Role};
use crate::state::AppState;
use crate::students::store::{
    get_placements, get_student_profile, mark_student_placed, update_student_profile,
};

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub department: Option<Department>,
    pub cgpa: Option<f64>,
    pub reg_no: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub department: Option<Department>,
    pub profile: Option<StudentProfileRow>,
}

#[derive(Debug, Deserialize)]
pub struct MarkPlacedRequest {
    pub company: String,
    pub package: f64,
}

/// GET /api/v1/students/me/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<ProfileResponse>, AppError> {
    ctx.require_role(Role::Student)?;
    let profile = get_student_profile(&state.db, ctx.username()).await?;
    Ok(Json(ProfileResponse {
        username: ctx.user.username,
        department: ctx.user.department,
        profile,
    }))
}

/// PUT /api/v1/students/me/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    ctx.require_role(Role::Student)?;

    let reg_no = req.reg_no.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let profile =
        update_student_profile(&state.db, ctx.username(), reg_no, req.cgpa, req.department)
            .await?;
    let department = req.department.or(ctx.user.department);

    Ok(Json(ProfileResponse {
        username: ctx.user.username,
        department,
        profile: Some(profile),
    }))
}

/// POST /api/v1/admin/students/:username/placement
pub async fn handle_mark_placed(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(username): Path<String>,
    Json(req): Json<MarkPlacedRequest>,
) -> Result<(StatusCode, Json<PlacementRow>), AppError> {
    ctx.require_role(Role::Admin)?;
    let placement = mark_student_placed(&state.db, &username, &req.company, req.package).await?;
    Ok((StatusCode::CREATED, Json(placement)))
}

/// GET /api/v1/admin/students/:username/placement
///
/// The placement ledger for one student, newest first.
pub async fn handle_list_placements(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(username): Path<String>,
) -> Result<Json<Vec<PlacementRow>>, AppError> {
    ctx.require_role(Role::Admin)?;
    Ok(Json(get_placements(&state.db, &username).await?))
}
