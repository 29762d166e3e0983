use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::resume::{join_skills, ResumeAnalysis, ResumeAnalysisRow};

/// Appends an analysis row. History is never rewritten.
pub async fn save_resume_analysis(
    pool: &SqlitePool,
    username: &str,
    score: f64,
    feedback: &str,
    skills: &[String],
) -> Result<ResumeAnalysisRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeAnalysisRow>(
        r#"
        INSERT INTO resume_analysis (username, score, feedback, skills, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, score, feedback, skills, created_at
        "#,
    )
    .bind(username)
    .bind(score)
    .bind(feedback)
    .bind(join_skills(skills))
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Latest analysis by insertion order.
pub async fn get_resume_analysis(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<ResumeAnalysis>, sqlx::Error> {
    let row = sqlx::query_as::<_, ResumeAnalysisRow>(
        "SELECT id, username, score, feedback, skills, created_at
         FROM resume_analysis WHERE username = $1 ORDER BY id DESC LIMIT 1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(ResumeAnalysis::from))
}

pub async fn get_resume_history(
    pool: &SqlitePool,
    username: &str,
) -> Result<Vec<ResumeAnalysis>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ResumeAnalysisRow>(
        "SELECT id, username, score, feedback, skills, created_at
         FROM resume_analysis WHERE username = $1 ORDER BY id DESC",
    )
    .bind(username)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ResumeAnalysis::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    #[tokio::test]
    async fn test_skills_read_back_in_order() {
        let pool = test_pool().await;
        let skills = vec!["Python".to_string(), "SQL".to_string()];
        save_resume_analysis(&pool, "STU0001", 72.0, "ok", &skills)
            .await
            .unwrap();

        let analysis = get_resume_analysis(&pool, "STU0001").await.unwrap().unwrap();
        assert_eq!(analysis.skills, vec!["Python", "SQL"]);
        assert_eq!(analysis.score, 72.0);
    }

    #[tokio::test]
    async fn test_latest_wins_history_kept() {
        let pool = test_pool().await;
        save_resume_analysis(&pool, "STU0001", 40.0, "first", &["java".to_string()])
            .await
            .unwrap();
        save_resume_analysis(&pool, "STU0001", 80.0, "second", &[])
            .await
            .unwrap();

        let latest = get_resume_analysis(&pool, "STU0001").await.unwrap().unwrap();
        assert_eq!(latest.feedback, "second");
        assert!(latest.skills.is_empty());

        let history = get_resume_history(&pool, "STU0001").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].skills, vec!["java"]);
    }

    #[tokio::test]
    async fn test_missing_analysis_is_none() {
        let pool = test_pool().await;
        assert!(get_resume_analysis(&pool, "nobody").await.unwrap().is_none());
    }
}
