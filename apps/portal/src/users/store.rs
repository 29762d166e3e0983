use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{Department, Role, UserRow};

pub const MAX_BATCH: u32 = 200;
const PASSWORD_LEN: usize = 8;
const USERNAME_ATTEMPTS: usize = 50;

/// Credentials handed back once at creation time.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedCredential {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub department: Option<Department>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SystemSummary {
    pub students: i64,
    pub hods: i64,
    pub admins: i64,
}

/// `STU` + 4 random digits, e.g. `STU0427`.
pub fn generate_username(role: Role) -> String {
    let digits: u32 = rand::rng().random_range(0..10_000);
    format!("{}{:04}", role.username_prefix(), digits)
}

pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Creates one account with generated credentials.
pub async fn create_user(
    pool: &SqlitePool,
    role: Role,
    department: Option<Department>,
) -> Result<GeneratedCredential, AppError> {
    let mut created = create_users(pool, role, department, 1).await?;
    created
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("account batch came back empty")))
}

/// Creates `count` accounts in one transaction; either all are created or none.
///
/// HOD requires a department and must be the only HOD there; only one Admin
/// may ever exist.
pub async fn create_users(
    pool: &SqlitePool,
    role: Role,
    department: Option<Department>,
    count: u32,
) -> Result<Vec<GeneratedCredential>, AppError> {
    if count == 0 || count > MAX_BATCH {
        return Err(AppError::Validation(format!(
            "count must be between 1 and {MAX_BATCH}"
        )));
    }

    let mut tx = pool.begin().await?;

    match role {
        Role::Admin => {
            if count > 1 || role_count(&mut tx, Role::Admin).await? > 0 {
                return Err(AppError::Conflict(
                    "Only one Admin account is allowed".to_string(),
                ));
            }
        }
        Role::Hod => {
            let department = department.ok_or_else(|| {
                AppError::Validation("Department is required when creating a HOD account".to_string())
            })?;
            if count > 1 || hod_exists(&mut tx, department).await? {
                return Err(AppError::Conflict(format!(
                    "A HOD already exists for department '{department}'"
                )));
            }
        }
        Role::Student => {}
    }

    let mut created = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let username = unused_username(&mut tx, role).await?;
        let password = generate_password();

        sqlx::query("INSERT INTO users (username, password, role, department) VALUES ($1, $2, $3, $4)")
            .bind(&username)
            .bind(&password)
            .bind(role)
            .bind(department)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_unique_violation(e, format!("{role} account already exists")))?;

        created.push(GeneratedCredential {
            username,
            password,
            role,
            department,
        });
    }

    tx.commit().await?;
    info!("Created {} {role} account(s)", created.len());
    Ok(created)
}

async fn unused_username(tx: &mut Transaction<'_, Sqlite>, role: Role) -> Result<String, AppError> {
    for _ in 0..USERNAME_ATTEMPTS {
        let candidate = generate_username(role);
        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
            .bind(&candidate)
            .fetch_one(&mut **tx)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
    }
    Err(AppError::Conflict(format!(
        "Could not find a free {role} username; the namespace is nearly full"
    )))
}

async fn role_count(tx: &mut Transaction<'_, Sqlite>, role: Role) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(role)
        .fetch_one(&mut **tx)
        .await
}

async fn hod_exists(
    tx: &mut Transaction<'_, Sqlite>,
    department: Department,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1 AND department = $2")
        .bind(Role::Hod)
        .bind(department)
        .fetch_one(&mut **tx)
        .await?;
    Ok(count > 0)
}

/// Every account, newest first.
pub async fn get_all_users(pool: &SqlitePool) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password, role, department FROM users ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_system_summary(pool: &SqlitePool) -> Result<SystemSummary, sqlx::Error> {
    let rows: Vec<(Role, i64)> =
        sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
            .fetch_all(pool)
            .await?;

    let count = |role: Role| {
        rows.iter()
            .find(|(r, _)| *r == role)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    };

    Ok(SystemSummary {
        students: count(Role::Student),
        hods: count(Role::Hod),
        admins: count(Role::Admin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::bootstrap_admin;
    use crate::test_support::test_pool;

    #[test]
    fn test_generated_username_shape() {
        let name = generate_username(Role::Student);
        assert_eq!(name.len(), 7);
        assert!(name.starts_with("STU"));
        assert!(name[3..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generated_password_is_alphanumeric() {
        let pw = generate_password();
        assert_eq!(pw.len(), 8);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_second_hod_for_department_rejected() {
        let pool = test_pool().await;
        create_user(&pool, Role::Hod, Some(Department::Cse)).await.unwrap();

        let err = create_user(&pool, Role::Hod, Some(Department::Cse))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Other departments are unaffected
        create_user(&pool, Role::Hod, Some(Department::Ece)).await.unwrap();
    }

    #[tokio::test]
    async fn test_hod_without_department_rejected() {
        let pool = test_pool().await;
        let err = create_user(&pool, Role::Hod, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(get_all_users(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_admin_rejected() {
        let pool = test_pool().await;
        bootstrap_admin(&pool, "admin123").await.unwrap();
        let err = create_user(&pool, Role::Admin, None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_batch_creates_distinct_students() {
        let pool = test_pool().await;
        let created = create_users(&pool, Role::Student, Some(Department::Mech), 25)
            .await
            .unwrap();
        assert_eq!(created.len(), 25);

        let mut names: Vec<_> = created.iter().map(|c| c.username.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 25);

        let summary = get_system_summary(&pool).await.unwrap();
        assert_eq!(
            summary,
            SystemSummary {
                students: 25,
                hods: 0,
                admins: 0
            }
        );
    }

    #[tokio::test]
    async fn test_batch_bounds() {
        let pool = test_pool().await;
        assert!(matches!(
            create_users(&pool, Role::Student, None, 0).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_users(&pool, Role::Student, None, MAX_BATCH + 1).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_all_users_newest_first() {
        let pool = test_pool().await;
        bootstrap_admin(&pool, "admin123").await.unwrap();
        let student = create_user(&pool, Role::Student, None).await.unwrap();

        let users = get_all_users(&pool).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, student.username);
        assert_eq!(users[1].username, "admin");
    }
}
