// Test utilities shared across unit tests. Only compiled when running tests.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::db::MIGRATOR;
use crate::models::user::{Department, Role};

/// In-memory database with migrations applied.
///
/// A single connection that never expires: every new connection to
/// `sqlite::memory:` would open a fresh, empty database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create test database");
    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    role: Role,
    department: Option<Department>,
) {
    sqlx::query("INSERT INTO users (username, password, role, department) VALUES ($1, 'pw', $2, $3)")
        .bind(username)
        .bind(role)
        .bind(department)
        .execute(pool)
        .await
        .expect("insert user");
}

/// Inserts a student with a profile.
pub async fn insert_student(
    pool: &SqlitePool,
    username: &str,
    department: Department,
    cgpa: Option<f64>,
    placed: bool,
) {
    insert_user(pool, username, Role::Student, Some(department)).await;
    sqlx::query("INSERT INTO student_profiles (username, cgpa, placed) VALUES ($1, $2, $3)")
        .bind(username)
        .bind(cgpa)
        .bind(placed)
        .execute(pool)
        .await
        .expect("insert profile");
}

pub async fn insert_resume(pool: &SqlitePool, username: &str, skills: &str) {
    sqlx::query(
        "INSERT INTO resume_analysis (username, score, feedback, skills, created_at) VALUES ($1, 50, '', $2, $3)",
    )
    .bind(username)
    .bind(skills)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await
    .expect("insert resume");
}

pub async fn insert_placement(pool: &SqlitePool, username: &str, company: &str, package: f64) {
    sqlx::query("INSERT INTO placements (username, company, package, placed_on) VALUES ($1, $2, $3, $4)")
        .bind(username)
        .bind(company)
        .bind(package)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await
        .expect("insert placement");
}
