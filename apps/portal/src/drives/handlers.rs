use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::RequestContext;
use crate::drives::store::{
    apply_to_drive, close_drive, create_drive, delete_drive, list_drives, list_open_drives,
    list_student_applications, seed_demo_drives, update_application_status, NewDrive,
    StudentDriveView,
};
use crate::errors::AppError;
use crate::models::drive::{ApplicationRow, ApplicationStatus, DriveRow, StudentApplicationRow};
use crate::models::user::Role;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub status: ApplicationStatus,
    /// Omit to keep the current remarks; send `""` to clear them.
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub inserted: usize,
}

/// GET /api/v1/drives
pub async fn handle_list_drives(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<DriveRow>>, AppError> {
    ctx.require_role(Role::Admin)?;
    Ok(Json(list_drives(&state.db).await?))
}

/// POST /api/v1/drives
pub async fn handle_create_drive(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(req): Json<NewDrive>,
) -> Result<(StatusCode, Json<DriveRow>), AppError> {
    ctx.require_role(Role::Admin)?;
    let drive = create_drive(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(drive)))
}

/// POST /api/v1/drives/seed
pub async fn handle_seed_drives(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<SeedResponse>, AppError> {
    ctx.require_role(Role::Admin)?;
    let inserted = seed_demo_drives(&state.db).await?;
    Ok(Json(SeedResponse { inserted }))
}

/// POST /api/v1/drives/:id/close
pub async fn handle_close_drive(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(drive_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ctx.require_role(Role::Admin)?;
    close_drive(&state.db, drive_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/drives/:id
pub async fn handle_delete_drive(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(drive_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ctx.require_role(Role::Admin)?;
    delete_drive(&state.db, drive_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/drives/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(drive_id): Path<i64>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    ctx.require_role(Role::Student)?;
    let application = apply_to_drive(&state.db, &ctx.user, drive_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/students/me/drives
pub async fn handle_open_drives(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<StudentDriveView>>, AppError> {
    ctx.require_role(Role::Student)?;
    let drives = list_open_drives(&state.db, ctx.username(), ctx.user.department).await?;
    Ok(Json(drives))
}

/// GET /api/v1/students/me/applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<StudentApplicationRow>>, AppError> {
    ctx.require_role(Role::Student)?;
    Ok(Json(list_student_applications(&state.db, ctx.username()).await?))
}

/// PATCH /api/v1/admin/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(application_id): Path<i64>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    ctx.require_role(Role::Admin)?;
    let remarks = req.remarks.as_deref().map(str::trim);
    let row = update_application_status(&state.db, application_id, req.status, remarks).await?;
    Ok(Json(row))
}
