use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::user::{Department, Role};

pub const DEFAULT_TOP_K: usize = 10;

pub const NO_GAP_RECOMMENDATION: &str =
    "No significant skill gap detected between placed and unplaced students.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGapInsights {
    pub department: Department,
    pub placed_students: usize,
    pub unplaced_students: usize,
    pub placed_top_skills: Vec<SkillCount>,
    pub unplaced_top_skills: Vec<SkillCount>,
    /// Frequent among placed students, absent from the unplaced top skills.
    pub missing_skills: Vec<String>,
    pub recommendation: String,
}

/// One department student with the skills of their latest resume, if any.
#[derive(Debug, Clone)]
pub struct StudentSkills {
    pub placed: bool,
    pub skills: Option<String>,
}

pub async fn get_skill_gap_insights(
    pool: &SqlitePool,
    department: Department,
    top_k: usize,
) -> Result<SkillGapInsights, sqlx::Error> {
    let rows: Vec<(i64, Option<String>)> = sqlx::query_as(
        r#"
        SELECT COALESCE(sp.placed, 0), ra.skills
        FROM users u
        LEFT JOIN student_profiles sp ON sp.username = u.username
        LEFT JOIN resume_analysis ra ON ra.id = (
            SELECT MAX(r.id) FROM resume_analysis r WHERE r.username = u.username
        )
        WHERE u.role = $1 AND u.department = $2
        "#,
    )
    .bind(Role::Student)
    .bind(department)
    .fetch_all(pool)
    .await?;

    let students: Vec<StudentSkills> = rows
        .into_iter()
        .map(|(placed, skills)| StudentSkills {
            placed: placed == 1,
            skills,
        })
        .collect();

    Ok(compute_skill_gap(department, &students, top_k))
}

pub fn compute_skill_gap(
    department: Department,
    students: &[StudentSkills],
    top_k: usize,
) -> SkillGapInsights {
    let (placed, unplaced): (Vec<&StudentSkills>, Vec<&StudentSkills>) =
        students.iter().partition(|s| s.placed);

    let placed_top = top_skills(count_skills(&placed), top_k);
    let unplaced_top = top_skills(count_skills(&unplaced), top_k);

    let missing_skills: Vec<String> = placed_top
        .iter()
        .filter(|p| !unplaced_top.iter().any(|u| u.skill == p.skill))
        .map(|p| p.skill.clone())
        .collect();

    let recommendation = if missing_skills.is_empty() {
        NO_GAP_RECOMMENDATION.to_string()
    } else {
        format!(
            "Unplaced students should focus on: {}.",
            missing_skills.join(", ")
        )
    };

    SkillGapInsights {
        department,
        placed_students: placed.len(),
        unplaced_students: unplaced.len(),
        placed_top_skills: placed_top,
        unplaced_top_skills: unplaced_top,
        missing_skills,
        recommendation,
    }
}

fn count_skills(students: &[&StudentSkills]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for skills in students.iter().filter_map(|s| s.skills.as_deref()) {
        for token in skills.split(',') {
            let token = token.trim().to_lowercase();
            if !token.is_empty() {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
    }
    counts
}

// Most frequent first; equal counts in alphabetical order.
fn top_skills(counts: HashMap<String, usize>, top_k: usize) -> Vec<SkillCount> {
    let mut ranked: Vec<SkillCount> = counts
        .into_iter()
        .map(|(skill, count)| SkillCount { skill, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    ranked.truncate(top_k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_resume, insert_student, insert_user, test_pool};

    fn student(placed: bool, skills: &str) -> StudentSkills {
        StudentSkills {
            placed,
            skills: Some(skills.to_string()),
        }
    }

    #[test]
    fn test_tokens_normalised_case_insensitively() {
        let students = vec![
            student(true, "Python, SQL"),
            student(true, " python ,sql,React"),
            student(false, "PYTHON"),
        ];
        let insights = compute_skill_gap(Department::Cse, &students, 10);

        assert_eq!(
            insights.placed_top_skills,
            vec![
                SkillCount { skill: "python".into(), count: 2 },
                SkillCount { skill: "sql".into(), count: 2 },
                SkillCount { skill: "react".into(), count: 1 },
            ]
        );
        assert_eq!(insights.missing_skills, vec!["sql", "react"]);
        assert_eq!(
            insights.recommendation,
            "Unplaced students should focus on: sql, react."
        );
    }

    #[test]
    fn test_top_k_limits_both_sets() {
        let students = vec![
            student(true, "java,sql,css"),
            student(true, "java,sql"),
            student(false, "css,html"),
        ];
        let insights = compute_skill_gap(Department::Cse, &students, 2);
        assert_eq!(insights.placed_top_skills.len(), 2);
        assert_eq!(insights.missing_skills, vec!["java", "sql"]);
        assert_eq!(insights.unplaced_top_skills.len(), 2);
    }

    #[test]
    fn test_no_gap_message() {
        let students = vec![student(true, "python"), student(false, "Python,sql")];
        let insights = compute_skill_gap(Department::Ece, &students, 10);
        assert!(insights.missing_skills.is_empty());
        assert_eq!(insights.recommendation, NO_GAP_RECOMMENDATION);

        let empty = compute_skill_gap(Department::Ece, &[], 10);
        assert_eq!(empty.placed_students, 0);
        assert_eq!(empty.recommendation, NO_GAP_RECOMMENDATION);
    }

    #[tokio::test]
    async fn test_only_latest_resume_counts() {
        let pool = test_pool().await;
        insert_student(&pool, "STU0001", Department::Cse, Some(8.0), true).await;
        insert_resume(&pool, "STU0001", "HTML").await;
        insert_resume(&pool, "STU0001", "Python,Cloud").await;

        insert_student(&pool, "STU0002", Department::Cse, Some(6.0), false).await;
        insert_resume(&pool, "STU0002", "python").await;

        // No profile and no resume: still an unplaced student.
        insert_user(&pool, "STU0003", Role::Student, Some(Department::Cse)).await;

        let insights = get_skill_gap_insights(&pool, Department::Cse, 10)
            .await
            .unwrap();
        assert_eq!(insights.placed_students, 1);
        assert_eq!(insights.unplaced_students, 2);
        assert_eq!(insights.missing_skills, vec!["cloud"]);
        assert!(insights
            .placed_top_skills
            .iter()
            .all(|s| s.skill != "html"));
    }
}
