use serde::Serialize;
use sqlx::SqlitePool;

use crate::analytics::round2;
use crate::models::user::Department;

pub const DEFAULT_RECRUITER_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecruiterStat {
    pub company: String,
    pub placements: i64,
    pub avg_package: f64,
}

/// Companies that placed the most students of a department. Ties go to the
/// alphabetically first company.
pub async fn get_top_recruiters(
    pool: &SqlitePool,
    department: Department,
    limit: u32,
) -> Result<Vec<RecruiterStat>, sqlx::Error> {
    let rows: Vec<(String, i64, Option<f64>)> = sqlx::query_as(
        r#"
        SELECT p.company, COUNT(*) AS placements, AVG(p.package) AS avg_package
        FROM placements p
        JOIN users u ON p.username = u.username
        WHERE u.department = $1
        GROUP BY p.company
        ORDER BY placements DESC, p.company ASC
        LIMIT $2
        "#,
    )
    .bind(department)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(company, placements, avg_package)| RecruiterStat {
            company,
            placements,
            avg_package: round2(avg_package.unwrap_or(0.0)),
        })
        .collect())
}
