use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{authenticate, RequestContext};
use crate::errors::AppError;
use crate::models::user::{Department, Role};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub role: Role,
    pub department: Option<Department>,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = authenticate(&state.db, req.username.trim(), &req.password, req.role).await?;
    info!("User {} logged in as {}", user.username, user.role);
    Ok(Json(LoginResponse {
        username: user.username,
        role: user.role,
        department: user.department,
    }))
}

/// GET /api/v1/me
pub async fn handle_me(ctx: RequestContext) -> Json<LoginResponse> {
    Json(LoginResponse {
        username: ctx.user.username,
        role: ctx.user.role,
        department: ctx.user.department,
    })
}
