use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::models::user::Role;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// Creates and returns a SQLite connection pool, creating the file if needed.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Applies the schema. Safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;
    info!("Database migrations applied");
    Ok(())
}

/// Inserts the default `admin` account when no Admin exists yet.
/// Returns true when an account was created.
pub async fn bootstrap_admin(pool: &SqlitePool, password: &str) -> Result<bool, sqlx::Error> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(Role::Admin)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(false);
    }

    sqlx::query("INSERT INTO users (username, password, role, department) VALUES ($1, $2, $3, NULL)")
        .bind(BOOTSTRAP_ADMIN_USERNAME)
        .bind(password)
        .bind(Role::Admin)
        .execute(pool)
        .await?;

    info!("Default Admin account created: {BOOTSTRAP_ADMIN_USERNAME}");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let pool = test_pool().await;
        assert!(bootstrap_admin(&pool, "admin123").await.unwrap());
        assert!(!bootstrap_admin(&pool, "other").await.unwrap());

        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'Admin'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[tokio::test]
    async fn test_migrations_run_twice() {
        let pool = test_pool().await;
        run_migrations(&pool).await.unwrap();
    }
}
