use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::errors::AppError;
use crate::models::drive::{ApplicationRow, ApplicationStatus, DriveRow, StudentApplicationRow};
use crate::models::user::{Department, UserRow};

const DRIVE_COLUMNS: &str = "id, company, role, package, target_department, drive_date, deadline, description, is_active, created_at";

#[derive(Debug, Clone, Deserialize)]
pub struct NewDrive {
    pub company: String,
    pub role: String,
    pub package: f64,
    /// Omit to open the drive to every department.
    pub target_department: Option<Department>,
    pub drive_date: NaiveDate,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub description: String,
}

/// A drive as seen by a student, with their application status if any.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentDriveView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub drive: DriveRow,
    pub application_status: Option<ApplicationStatus>,
}

pub async fn create_drive(pool: &SqlitePool, new: &NewDrive) -> Result<DriveRow, AppError> {
    let company = new.company.trim();
    let role = new.role.trim();
    if company.is_empty() || role.is_empty() {
        return Err(AppError::Validation(
            "company and role are required".to_string(),
        ));
    }
    if !new.package.is_finite() || new.package <= 0.0 {
        return Err(AppError::Validation(
            "package must be greater than zero".to_string(),
        ));
    }

    let drive = sqlx::query_as::<_, DriveRow>(&format!(
        r#"
        INSERT INTO drives
            (company, role, package, target_department, drive_date, deadline, description, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 1, $8)
        RETURNING {DRIVE_COLUMNS}
        "#
    ))
    .bind(company)
    .bind(role)
    .bind(new.package)
    .bind(new.target_department)
    .bind(new.drive_date)
    .bind(new.deadline)
    .bind(new.description.trim())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    info!("Created drive {} for {} ({})", drive.id, drive.company, drive.role);
    Ok(drive)
}

/// Every drive, newest first.
pub async fn list_drives(pool: &SqlitePool) -> Result<Vec<DriveRow>, sqlx::Error> {
    sqlx::query_as::<_, DriveRow>(&format!(
        "SELECT {DRIVE_COLUMNS} FROM drives ORDER BY id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_drive(pool: &SqlitePool, drive_id: i64) -> Result<Option<DriveRow>, sqlx::Error> {
    sqlx::query_as::<_, DriveRow>(&format!(
        "SELECT {DRIVE_COLUMNS} FROM drives WHERE id = $1"
    ))
    .bind(drive_id)
    .fetch_optional(pool)
    .await
}

/// Active drives a student may apply to, soonest first, with their application status.
pub async fn list_open_drives(
    pool: &SqlitePool,
    username: &str,
    department: Option<Department>,
) -> Result<Vec<StudentDriveView>, sqlx::Error> {
    sqlx::query_as::<_, StudentDriveView>(
        r#"
        SELECT d.id, d.company, d.role, d.package, d.target_department, d.drive_date,
               d.deadline, d.description, d.is_active, d.created_at,
               a.status AS application_status
        FROM drives d
        LEFT JOIN applications a ON a.drive_id = d.id AND a.username = $1
        WHERE d.is_active = 1
          AND (d.target_department IS NULL OR d.target_department = $2)
        ORDER BY d.drive_date ASC, d.id ASC
        "#,
    )
    .bind(username)
    .bind(department)
    .fetch_all(pool)
    .await
}

pub async fn close_drive(pool: &SqlitePool, drive_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE drives SET is_active = 0 WHERE id = $1")
        .bind(drive_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Drive {drive_id} not found")));
    }
    info!("Closed drive {drive_id}");
    Ok(())
}

/// Deletes a drive together with its applications.
pub async fn delete_drive(pool: &SqlitePool, drive_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM applications WHERE drive_id = $1")
        .bind(drive_id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM drives WHERE id = $1")
        .bind(drive_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Drive {drive_id} not found")));
    }
    tx.commit().await?;
    info!("Deleted drive {drive_id}");
    Ok(())
}

/// Inserts a few sample drives when the table is empty. Returns how many were added.
pub async fn seed_demo_drives(pool: &SqlitePool) -> Result<usize, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drives")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let demo = [
        ("Infosys", "Software Engineer", 6.5, Some(Department::Cse), (2025, 2, 10), (2025, 2, 28), "On-campus hiring for freshers"),
        ("TCS", "System Engineer", 5.0, None, (2025, 2, 15), (2025, 3, 5), "Apply if CGPA >= 6.0"),
        ("FinTech Pvt Ltd", "Data Analyst Intern", 4.0, Some(Department::AiDs), (2025, 2, 20), (2025, 3, 1), "Internship with conversion"),
    ];

    let mut inserted = 0;
    for (company, role, package, target_department, date, deadline, description) in demo {
        let new = NewDrive {
            company: company.to_string(),
            role: role.to_string(),
            package,
            target_department,
            drive_date: ymd(date)?,
            deadline: ymd(deadline)?,
            description: description.to_string(),
        };
        create_drive(pool, &new).await?;
        inserted += 1;
    }
    Ok(inserted)
}

fn ymd((y, m, d): (i32, u32, u32)) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid demo date {y}-{m}-{d}")))
}

/// Records one application per (student, drive).
pub async fn apply_to_drive(
    pool: &SqlitePool,
    student: &UserRow,
    drive_id: i64,
) -> Result<ApplicationRow, AppError> {
    let drive = get_drive(pool, drive_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Drive {drive_id} not found")))?;
    if !drive.is_active {
        return Err(AppError::Validation(format!("Drive {drive_id} is closed")));
    }
    if !drive.is_open_to(student.department) {
        return Err(AppError::Validation(format!(
            "Drive {drive_id} is not open to your department"
        )));
    }

    let already: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE username = $1 AND drive_id = $2")
            .bind(&student.username)
            .bind(drive_id)
            .fetch_one(pool)
            .await?;
    if already > 0 {
        return Err(AppError::Conflict(format!(
            "You already applied to drive {drive_id}"
        )));
    }

    let application = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (username, drive_id, applied_on, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, drive_id, applied_on, status, remarks
        "#,
    )
    .bind(&student.username)
    .bind(drive_id)
    .bind(Utc::now())
    .bind(ApplicationStatus::Applied)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_unique_violation(e, format!("You already applied to drive {drive_id}")))?;

    info!("{} applied to drive {drive_id}", student.username);
    Ok(application)
}

pub async fn list_student_applications(
    pool: &SqlitePool,
    username: &str,
) -> Result<Vec<StudentApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentApplicationRow>(
        r#"
        SELECT a.id, a.drive_id, d.company, d.role, d.package, d.drive_date, d.deadline,
               a.applied_on, a.status, a.remarks
        FROM applications a
        JOIN drives d ON a.drive_id = d.id
        WHERE a.username = $1
        ORDER BY a.applied_on DESC, a.id DESC
        "#,
    )
    .bind(username)
    .fetch_all(pool)
    .await
}

/// Moves an application to `status`. `remarks`: `None` keeps the stored
/// remarks, an empty string clears them, anything else replaces them.
pub async fn update_application_status(
    pool: &SqlitePool,
    application_id: i64,
    status: ApplicationStatus,
    remarks: Option<&str>,
) -> Result<ApplicationRow, AppError> {
    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications SET status = $1,
            remarks = CASE WHEN $2 IS NULL THEN remarks WHEN $2 = '' THEN NULL ELSE $2 END
        WHERE id = $3
        RETURNING id, username, drive_id, applied_on, status, remarks
        "#,
    )
    .bind(status)
    .bind(remarks)
    .bind(application_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    info!("Application {application_id} moved to {status:?}");
    Ok(row)
}
