use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeAnalysisRow {
    pub id: i64,
    pub username: String,
    pub score: f64,
    pub feedback: String,
    /// Comma-joined skill list, in the order the scorer detected them.
    pub skills: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumeAnalysis {
    pub score: f64,
    pub feedback: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeAnalysisRow> for ResumeAnalysis {
    fn from(row: ResumeAnalysisRow) -> Self {
        Self {
            score: row.score,
            feedback: row.feedback,
            skills: split_skills(&row.skills),
            created_at: row.created_at,
        }
    }
}

pub fn join_skills(skills: &[String]) -> String {
    skills.join(",")
}

/// Splits a stored skill list. Order and duplicates are preserved.
pub fn split_skills(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(',').map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skills_preserves_order_and_duplicates() {
        assert_eq!(
            split_skills("Python,SQL,Python"),
            vec!["Python", "SQL", "Python"]
        );
    }

    #[test]
    fn test_split_empty_is_empty() {
        assert!(split_skills("").is_empty());
    }
}
