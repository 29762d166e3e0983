use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;

use crate::auth::find_user;
use crate::errors::AppError;
use crate::models::student::{PlacementRow, StudentProfileRow};
use crate::models::user::{Department, Role};

pub const MAX_CGPA: f64 = 10.0;

pub fn validate_cgpa(cgpa: f64) -> Result<(), AppError> {
    if cgpa.is_finite() && (0.0..=MAX_CGPA).contains(&cgpa) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "CGPA must be between 0.0 and {MAX_CGPA:.1}, got {cgpa}"
        )))
    }
}

pub async fn get_student_profile(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<StudentProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentProfileRow>(
        "SELECT id, username, reg_no, cgpa, placed, package FROM student_profiles WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Creates or updates the profile. A `None` field keeps the stored value.
pub async fn upsert_student_profile<'e, E>(
    executor: E,
    username: &str,
    reg_no: Option<&str>,
    cgpa: Option<f64>,
) -> Result<StudentProfileRow, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    if let Some(cgpa) = cgpa {
        validate_cgpa(cgpa)?;
    }

    let profile = sqlx::query_as::<_, StudentProfileRow>(
        r#"
        INSERT INTO student_profiles (username, reg_no, cgpa)
        VALUES ($1, $2, $3)
        ON CONFLICT (username) DO UPDATE SET
            reg_no = COALESCE(excluded.reg_no, student_profiles.reg_no),
            cgpa = COALESCE(excluded.cgpa, student_profiles.cgpa)
        RETURNING id, username, reg_no, cgpa, placed, package
        "#,
    )
    .bind(username)
    .bind(reg_no)
    .bind(cgpa)
    .fetch_one(executor)
    .await?;

    Ok(profile)
}

pub async fn set_department<'e, E>(
    executor: E,
    username: &str,
    department: Department,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE users SET department = $1 WHERE username = $2")
        .bind(department)
        .bind(username)
        .execute(executor)
        .await?;
    Ok(())
}

/// Student self-service update. The profile fields and the department are
/// written in one transaction.
pub async fn update_student_profile(
    pool: &SqlitePool,
    username: &str,
    reg_no: Option<&str>,
    cgpa: Option<f64>,
    department: Option<Department>,
) -> Result<StudentProfileRow, AppError> {
    if let Some(cgpa) = cgpa {
        validate_cgpa(cgpa)?;
    }

    let mut tx = pool.begin().await?;
    let profile = upsert_student_profile(&mut *tx, username, reg_no, cgpa).await?;
    if let Some(department) = department {
        set_department(&mut *tx, username, department).await?;
    }
    tx.commit().await?;

    info!("Updated profile for {username}");
    Ok(profile)
}

/// Records a placement and flips the student's profile to placed.
///
/// Both writes share one transaction so the ledger and the profile never
/// disagree. The profile is created if the student never saved one.
pub async fn mark_student_placed(
    pool: &SqlitePool,
    username: &str,
    company: &str,
    package: f64,
) -> Result<PlacementRow, AppError> {
    let company = company.trim();
    if company.is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }
    if !package.is_finite() || package < 0.0 {
        return Err(AppError::Validation(format!(
            "package must be a non-negative number, got {package}"
        )));
    }

    let user = find_user(pool, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))?;
    if user.role != Role::Student {
        return Err(AppError::Validation(format!(
            "{username} is not a student account"
        )));
    }

    let mut tx = pool.begin().await?;

    let placement = sqlx::query_as::<_, PlacementRow>(
        r#"
        INSERT INTO placements (username, company, package, placed_on)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, company, package, placed_on
        "#,
    )
    .bind(username)
    .bind(company)
    .bind(package)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO student_profiles (username, placed, package)
        VALUES ($1, 1, $2)
        ON CONFLICT (username) DO UPDATE SET placed = 1, package = excluded.package
        "#,
    )
    .bind(username)
    .bind(package)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("Marked {username} placed at {company} ({package} LPA)");
    Ok(placement)
}

pub async fn get_placements(
    pool: &SqlitePool,
    username: &str,
) -> Result<Vec<PlacementRow>, sqlx::Error> {
    sqlx::query_as::<_, PlacementRow>(
        "SELECT id, username, company, package, placed_on FROM placements WHERE username = $1 ORDER BY id DESC",
    )
    .bind(username)
    .fetch_all(pool)
    .await
}
