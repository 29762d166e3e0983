use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::user::{Department, Role, UserRow};
use crate::state::AppState;
use crate::users::export::export_users_csv;
use crate::users::store::{
    create_user, create_users, get_all_users, get_system_summary, GeneratedCredential, SystemSummary,
};

#[derive(Debug, Deserialize)]
pub struct CreateUsersRequest {
    pub role: Role,
    pub department: Option<Department>,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct CreateUsersResponse {
    pub created: Vec<GeneratedCredential>,
}

/// GET /api/v1/admin/summary
pub async fn handle_system_summary(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<SystemSummary>, AppError> {
    ctx.require_role(Role::Admin)?;
    Ok(Json(get_system_summary(&state.db).await?))
}

/// GET /api/v1/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<UserRow>>, AppError> {
    ctx.require_role(Role::Admin)?;
    Ok(Json(get_all_users(&state.db).await?))
}

/// POST /api/v1/admin/users
///
/// Generates accounts and returns their credentials. This is the only time
/// the generated passwords are returned in a JSON body.
pub async fn handle_create_users(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(req): Json<CreateUsersRequest>,
) -> Result<(StatusCode, Json<CreateUsersResponse>), AppError> {
    ctx.require_role(Role::Admin)?;
    let created = if req.count == 1 {
        vec![create_user(&state.db, req.role, req.department).await?]
    } else {
        create_users(&state.db, req.role, req.department, req.count).await?
    };
    Ok((StatusCode::CREATED, Json(CreateUsersResponse { created })))
}

/// GET /api/v1/admin/users/export
pub async fn handle_export_users(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<impl IntoResponse, AppError> {
    ctx.require_role(Role::Admin)?;
    let body = export_users_csv(&state.db).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"all_users_export.csv\"",
            ),
        ],
        body,
    ))
}
