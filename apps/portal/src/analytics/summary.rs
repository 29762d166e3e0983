use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::analytics::skill_gap::{get_skill_gap_insights, DEFAULT_TOP_K};
use crate::analytics::stats::{get_department_stats, DepartmentStats};
use crate::models::user::Department;

/// Plain-text department report handed to mail and PDF collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentSummary {
    pub department: Department,
    pub stats: DepartmentStats,
    pub recommendation: String,
    pub generated_at: DateTime<Utc>,
    pub text: String,
}

pub async fn build_department_summary(
    pool: &SqlitePool,
    department: Department,
) -> Result<DepartmentSummary, sqlx::Error> {
    let stats = get_department_stats(pool, department).await?;
    let insights = get_skill_gap_insights(pool, department, DEFAULT_TOP_K).await?;
    let generated_at = Utc::now();
    let text = render_summary(&stats, &insights.recommendation, generated_at);

    Ok(DepartmentSummary {
        department,
        stats,
        recommendation: insights.recommendation,
        generated_at,
        text,
    })
}

pub fn render_summary(
    stats: &DepartmentStats,
    recommendation: &str,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "Department: {}\n\
         Total Students: {}\n\
         Placed Students: {}\n\
         Unplaced Students: {}\n\
         Placement Rate: {:.2}%\n\
         Avg CGPA (Placed): {:.2}\n\
         Recommendation: {}\n\
         Generated on {}\n",
        stats.department,
        stats.total_students,
        stats.placed_count,
        stats.unplaced_count,
        stats.placed_percentage,
        stats.avg_cgpa_placed,
        recommendation,
        generated_at.format("%d %b %Y, %I:%M %p"),
    )
}
