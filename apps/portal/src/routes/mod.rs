pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::analytics::handlers as analytics;
use crate::assistant;
use crate::auth::handlers as auth;
use crate::drives::handlers as drives;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::students::handlers as students;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/me", get(auth::handle_me))
        // Admin
        .route("/api/v1/admin/summary", get(users::handle_system_summary))
        .route(
            "/api/v1/admin/users",
            get(users::handle_list_users).post(users::handle_create_users),
        )
        .route(
            "/api/v1/admin/users/export",
            get(users::handle_export_users),
        )
        .route(
            "/api/v1/admin/students/:username/placement",
            get(students::handle_list_placements).post(students::handle_mark_placed),
        )
        .route(
            "/api/v1/admin/applications/:id",
            patch(drives::handle_update_application),
        )
        // Drives
        .route(
            "/api/v1/drives",
            get(drives::handle_list_drives).post(drives::handle_create_drive),
        )
        .route("/api/v1/drives/seed", post(drives::handle_seed_drives))
        .route("/api/v1/drives/:id", delete(drives::handle_delete_drive))
        .route("/api/v1/drives/:id/close", post(drives::handle_close_drive))
        .route("/api/v1/drives/:id/apply", post(drives::handle_apply))
        // Student self-service
        .route(
            "/api/v1/students/me/profile",
            get(students::handle_get_profile).put(students::handle_update_profile),
        )
        .route(
            "/api/v1/students/me/resume",
            get(resume::handle_latest_resume).post(resume::handle_upload_resume),
        )
        .route(
            "/api/v1/students/me/resume/history",
            get(resume::handle_resume_history),
        )
        .route("/api/v1/students/me/drives", get(drives::handle_open_drives))
        .route(
            "/api/v1/students/me/applications",
            get(drives::handle_my_applications),
        )
        // Department analytics
        .route(
            "/api/v1/departments/:dept/stats",
            get(analytics::handle_department_stats),
        )
        .route(
            "/api/v1/departments/:dept/recruiters",
            get(analytics::handle_top_recruiters),
        )
        .route(
            "/api/v1/departments/:dept/skill-gap",
            get(analytics::handle_skill_gap),
        )
        .route(
            "/api/v1/departments/:dept/students",
            get(analytics::handle_department_students),
        )
        .route(
            "/api/v1/departments/:dept/summary",
            get(analytics::handle_department_summary),
        )
        // Assistant
        .route("/api/v1/assistant/chat", post(assistant::handle_chat))
        .with_state(state)
}
