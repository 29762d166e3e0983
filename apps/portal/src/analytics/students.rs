use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::user::{Department, Role};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DepartmentStudent {
    pub username: String,
    pub reg_no: Option<String>,
    pub cgpa: Option<f64>,
    pub placed: bool,
    pub package: f64,
    pub latest_resume_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentStudents {
    pub department: Department,
    pub placed: Vec<DepartmentStudent>,
    pub unplaced: Vec<DepartmentStudent>,
}

pub async fn get_department_students(
    pool: &SqlitePool,
    department: Department,
) -> Result<DepartmentStudents, sqlx::Error> {
    let rows = sqlx::query_as::<_, DepartmentStudent>(
        r#"
        SELECT u.username,
               sp.reg_no,
               sp.cgpa,
               COALESCE(sp.placed, 0) AS placed,
               COALESCE(sp.package, 0.0) AS package,
               (SELECT ra.score FROM resume_analysis ra
                WHERE ra.username = u.username
                ORDER BY ra.id DESC LIMIT 1) AS latest_resume_score
        FROM users u
        LEFT JOIN student_profiles sp ON sp.username = u.username
        WHERE u.role = $1 AND u.department = $2
        ORDER BY u.username
        "#,
    )
    .bind(Role::Student)
    .bind(department)
    .fetch_all(pool)
    .await?;

    let (placed, unplaced) = rows.into_iter().partition(|s| s.placed);
    Ok(DepartmentStudents {
        department,
        placed,
        unplaced,
    })
}
