//! Request-scoped identity.
//!
//! The acting user is resolved per request from the `x-portal-user` header and
//! handed to handlers as a [`RequestContext`]. Nothing about the caller is kept
//! between requests.

pub mod handlers;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Department, Role, UserRow};
use crate::state::AppState;

pub const USER_HEADER: &str = "x-portal-user";

#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub user: UserRow,
}

impl RequestContext {
    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.user.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Admin may read every department; a HOD only their own.
    pub fn require_department_access(&self, department: Department) -> Result<(), AppError> {
        match self.user.role {
            Role::Admin => Ok(()),
            Role::Hod if self.user.department == Some(department) => Ok(()),
            _ => Err(AppError::Forbidden),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let username = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let user = find_user(&state.db, username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let request_id = Uuid::new_v4();
        debug!(%request_id, user = %user.username, role = %user.role, "request context resolved");
        Ok(RequestContext { request_id, user })
    }
}

pub async fn find_user(pool: &SqlitePool, username: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password, role, department FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Returns the user when username, password and role all match.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: Role,
) -> Result<UserRow, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password, role, department FROM users
         WHERE username = $1 AND password = $2 AND role = $3",
    )
    .bind(username)
    .bind(password)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    user.ok_or(AppError::Unauthorized)
}
