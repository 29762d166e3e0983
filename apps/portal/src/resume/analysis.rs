use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeAnalysis;
use crate::models::user::UserRow;
use crate::resume::extract::{extract_text, ResumeUpload};
use crate::resume::scoring::{PlacementReadiness, ResumeInput, ResumeScore, ResumeScorer};
use crate::resume::store::{get_resume_analysis, save_resume_analysis};
use crate::students::store::get_student_profile;

#[derive(Debug, Serialize)]
pub struct ResumeAnalysisResponse {
    pub report: ResumeScore,
    pub analysis: ResumeAnalysis,
    pub readiness: PlacementReadiness,
}

#[derive(Debug, Serialize)]
pub struct LatestAnalysisResponse {
    pub analysis: ResumeAnalysis,
    pub readiness: PlacementReadiness,
}

/// Extracts, scores and stores one resume upload for `student`.
/// The GPA bonus uses the GPA on the student's profile.
pub async fn analyze_resume(
    pool: &SqlitePool,
    scorer: &dyn ResumeScorer,
    student: &UserRow,
    upload: ResumeUpload,
) -> Result<ResumeAnalysisResponse, AppError> {
    let text = extract_text(upload).await?;
    let cgpa = get_student_profile(pool, &student.username)
        .await?
        .and_then(|p| p.cgpa);

    let report = scorer
        .score(&ResumeInput {
            text: &text,
            cgpa,
            department: student.department,
        })
        .await?;

    let row = save_resume_analysis(
        pool,
        &student.username,
        report.total_score,
        &report.feedback,
        &report.detected_skills,
    )
    .await?;

    info!(
        "Stored resume analysis {} for {} (score {:.1})",
        row.id, student.username, report.total_score
    );

    let readiness = PlacementReadiness::assess(report.total_score, cgpa);
    Ok(ResumeAnalysisResponse {
        report,
        analysis: row.into(),
        readiness,
    })
}

/// Latest stored analysis with readiness against the current profile GPA.
pub async fn latest_analysis(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<LatestAnalysisResponse>, sqlx::Error> {
    let Some(analysis) = get_resume_analysis(pool, username).await? else {
        return Ok(None);
    };
    let cgpa = get_student_profile(pool, username)
        .await?
        .and_then(|p| p.cgpa);
    let readiness = PlacementReadiness::assess(analysis.score, cgpa);
    Ok(Some(LatestAnalysisResponse {
        analysis,
        readiness,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::find_user;
    use crate::models::user::{Department, Role};
    use crate::resume::scoring::{KeywordResumeScorer, ReadinessBand};
    use crate::students::store::upsert_student_profile;
    use crate::test_support::insert_user;
    use crate::test_support::test_pool;

    #[tokio::test]
    async fn test_analysis_uses_profile_gpa_and_persists() {
        let pool = test_pool().await;
        insert_user(&pool, "STU0001", Role::Student, Some(Department::Cse)).await;
        upsert_student_profile(&pool, "STU0001", None, Some(9.1))
            .await
            .unwrap();
        let student = find_user(&pool, "STU0001").await.unwrap().unwrap();

        let response = analyze_resume(
            &pool,
            &KeywordResumeScorer,
            &student,
            ResumeUpload::Text("Skills: Python, React, Django".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(response.report.gpa_score, 20.0);
        assert_eq!(response.analysis.skills, vec!["python", "django", "react"]);

        let stored = get_resume_analysis(&pool, "STU0001").await.unwrap().unwrap();
        assert_eq!(stored, response.analysis);
        // 8 + 12 + 20 = 40 points; 40 * 0.6 + 91 * 0.4
        assert_eq!(response.readiness.readiness, 60.4);
    }

    #[tokio::test]
    async fn test_latest_analysis_carries_readiness() {
        let pool = test_pool().await;
        insert_user(&pool, "STU0002", Role::Student, Some(Department::Ece)).await;
        assert!(latest_analysis(&pool, "STU0002").await.unwrap().is_none());

        upsert_student_profile(&pool, "STU0002", None, Some(8.0))
            .await
            .unwrap();
        let student = find_user(&pool, "STU0002").await.unwrap().unwrap();
        let text = "education skills projects experience certifications \
            python java sql css cloud";
        analyze_resume(
            &pool,
            &KeywordResumeScorer,
            &student,
            ResumeUpload::Text(text.to_string()),
        )
        .await
        .unwrap();

        // 40 + 20 + 15 = 75
        let latest = latest_analysis(&pool, "STU0002").await.unwrap().unwrap();
        assert_eq!(latest.analysis.score, 75.0);
        assert_eq!(latest.readiness.band, ReadinessBand::ModeratelyReady);
        assert_eq!(latest.readiness.readiness, 77.0);
    }
}
