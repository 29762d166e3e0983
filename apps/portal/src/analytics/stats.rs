use serde::Serialize;
use sqlx::SqlitePool;

use crate::analytics::round2;
use crate::models::user::{Department, Role};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStats {
    pub department: Department,
    pub total_students: i64,
    pub placed_count: i64,
    pub unplaced_count: i64,
    pub placed_percentage: f64,
    /// 0.0 when no placed student has a GPA on record; see `cgpa_sample_size`.
    pub avg_cgpa_placed: f64,
    pub cgpa_sample_size: i64,
}

pub async fn get_department_stats(
    pool: &SqlitePool,
    department: Department,
) -> Result<DepartmentStats, sqlx::Error> {
    let (total, placed, avg_cgpa, sample): (i64, i64, Option<f64>, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COALESCE(SUM(CASE WHEN sp.placed = 1 THEN 1 ELSE 0 END), 0),
               AVG(CASE WHEN sp.placed = 1 THEN sp.cgpa END),
               COUNT(CASE WHEN sp.placed = 1 AND sp.cgpa IS NOT NULL THEN 1 END)
        FROM users u
        LEFT JOIN student_profiles sp ON sp.username = u.username
        WHERE u.role = $1 AND u.department = $2
        "#,
    )
    .bind(Role::Student)
    .bind(department)
    .fetch_one(pool)
    .await?;

    let placed_percentage = if total > 0 {
        round2(placed as f64 * 100.0 / total as f64)
    } else {
        0.0
    };

    Ok(DepartmentStats {
        department,
        total_students: total,
        placed_count: placed,
        unplaced_count: total - placed,
        placed_percentage,
        avg_cgpa_placed: round2(avg_cgpa.unwrap_or(0.0)),
        cgpa_sample_size: sample,
    })
}
