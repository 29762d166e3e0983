//! Resume scoring behind a pluggable trait.
//!
//! Default: `KeywordResumeScorer` (pure-Rust, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`, chosen at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analytics::round2;
use crate::errors::AppError;
use crate::models::user::Department;

// ────────────────────────────────────────────────────────────────────────────
// Scoring constants
// ────────────────────────────────────────────────────────────────────────────

/// Headings a complete resume is expected to contain.
pub const EXPECTED_SECTIONS: [&str; 5] = [
    "education",
    "skills",
    "projects",
    "experience",
    "certifications",
];

/// Fixed skill vocabulary. Detected skills are reported in this order.
pub const SKILL_VOCABULARY: [&str; 16] = [
    "python",
    "java",
    "c++",
    "sql",
    "html",
    "css",
    "javascript",
    "ml",
    "ai",
    "data",
    "network",
    "cloud",
    "django",
    "react",
    "node",
    "flask",
];

const SECTION_WEIGHT: f64 = 40.0;
const SKILL_WEIGHT: f64 = 40.0;
const SKILL_CAP: usize = 10;
const FEW_SKILLS: usize = 5;
const QUALITY_THRESHOLD: f64 = 60.0;

// ────────────────────────────────────────────────────────────────────────────
// Input / output models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ResumeInput<'a> {
    pub text: &'a str,
    pub cgpa: Option<f64>,
    pub department: Option<Department>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumeScore {
    pub total_score: f64,        // 0 – 100
    pub section_score: f64,      // 0 – 40
    pub skill_score: f64,        // 0 – 40
    pub gpa_score: f64,          // 0, 10, 15 or 20
    pub detected_skills: Vec<String>,
    pub missing_sections: Vec<String>,
    pub feedback: String,
    pub scorer_backend: String, // "keyword"
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The resume scorer trait. Implement this to swap backends without touching
/// the upload handler.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(&self, input: &ResumeInput<'_>) -> Result<ResumeScore, AppError>;
}

/// Keyword scorer. Fast, deterministic, no network call.
///
/// Algorithm:
/// 1. section score = sections found (substring, case-insensitive) / 5 × 40
/// 2. skill score = min(vocabulary terms found as tokens, 10) / 10 × 40
/// 3. GPA bonus: ≥9 → 20, ≥8 → 15, ≥7 → 10, else 0
/// 4. total = sum, bounded by construction at 100
pub struct KeywordResumeScorer;

#[async_trait]
impl ResumeScorer for KeywordResumeScorer {
    async fn score(&self, input: &ResumeInput<'_>) -> Result<ResumeScore, AppError> {
        Ok(score_resume(input.text, input.cgpa, input.department))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn score_resume(text: &str, cgpa: Option<f64>, department: Option<Department>) -> ResumeScore {
    let text_lower = text.to_lowercase();

    let missing_sections: Vec<String> = EXPECTED_SECTIONS
        .iter()
        .filter(|s| !text_lower.contains(*s))
        .map(|s| s.to_string())
        .collect();
    let found_sections = EXPECTED_SECTIONS.len() - missing_sections.len();
    // Multiply before dividing so the documented values come out exact.
    let section_score = found_sections as f64 * SECTION_WEIGHT / EXPECTED_SECTIONS.len() as f64;

    let detected_skills = detect_skills(&text_lower);
    let skill_score =
        detected_skills.len().min(SKILL_CAP) as f64 * SKILL_WEIGHT / SKILL_CAP as f64;

    let gpa_score = gpa_bonus(cgpa);
    let total_score = section_score + skill_score + gpa_score;

    let feedback = build_feedback(
        &missing_sections,
        detected_skills.len(),
        total_score,
        department,
    );

    ResumeScore {
        total_score,
        section_score,
        skill_score,
        gpa_score,
        detected_skills,
        missing_sections,
        feedback,
        scorer_backend: "keyword".to_string(),
    }
}

/// Vocabulary terms found anywhere in the text, in vocabulary order.
/// Matching is by substring, so `java` also hits inside `javascript`.
fn detect_skills(text_lower: &str) -> Vec<String> {
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| text_lower.contains(*skill))
        .map(|s| s.to_string())
        .collect()
}

pub fn gpa_bonus(cgpa: Option<f64>) -> f64 {
    match cgpa {
        Some(g) if g >= 9.0 => 20.0,
        Some(g) if g >= 8.0 => 15.0,
        Some(g) if g >= 7.0 => 10.0,
        _ => 0.0,
    }
}

fn build_feedback(
    missing_sections: &[String],
    skill_count: usize,
    total_score: f64,
    department: Option<Department>,
) -> String {
    let mut parts = Vec::new();
    if !missing_sections.is_empty() {
        parts.push(format!(
            "Add these sections: {}.",
            missing_sections.join(", ")
        ));
    }
    if skill_count < FEW_SKILLS {
        parts.push("Add more technical skills for better visibility.".to_string());
    }
    if total_score < QUALITY_THRESHOLD {
        parts.push(
            "Consider improving formatting and including quantifiable results in projects."
                .to_string(),
        );
    }

    let mut feedback = if parts.is_empty() {
        "Resume looks strong!".to_string()
    } else {
        parts.join(" ")
    };

    if let Some(department) = department {
        feedback.push_str(&format!(
            " Your department ({department}) has strong placement scope — tailor your projects accordingly."
        ));
    }
    feedback
}

// ────────────────────────────────────────────────────────────────────────────
// Placement readiness
// ────────────────────────────────────────────────────────────────────────────

const READINESS_SCORE_WEIGHT: f64 = 0.6;
const READINESS_CGPA_WEIGHT: f64 = 0.4;

/// Readiness band derived from the resume score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessBand {
    HighlyReady,
    ModeratelyReady,
    ImprovementNeeded,
}

impl ReadinessBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            ReadinessBand::HighlyReady
        } else if score >= 70.0 {
            ReadinessBand::ModeratelyReady
        } else {
            ReadinessBand::ImprovementNeeded
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ReadinessBand::HighlyReady => "Highly placement-ready.",
            ReadinessBand::ModeratelyReady => "Moderately ready.",
            ReadinessBand::ImprovementNeeded => "Improvement needed.",
        }
    }
}

/// Blend of resume score and GPA on a 0–100 scale, rounded to 2 decimals.
/// A missing GPA counts as 0.
pub fn placement_readiness(score: f64, cgpa: Option<f64>) -> f64 {
    let gpa_percent = cgpa.unwrap_or(0.0) * 10.0;
    round2(score * READINESS_SCORE_WEIGHT + gpa_percent * READINESS_CGPA_WEIGHT)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementReadiness {
    /// Percentage, see [`placement_readiness`].
    pub readiness: f64,
    pub band: ReadinessBand,
    pub message: &'static str,
}

impl PlacementReadiness {
    pub fn assess(score: f64, cgpa: Option<f64>) -> Self {
        let band = ReadinessBand::from_score(score);
        Self {
            readiness: placement_readiness(score, cgpa),
            band,
            message: band.message(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PARTIAL_RESUME: &str = "\
        EDUCATION\nB.Tech, Computer Science\n\
        SKILLS\nPython, SQL\n\
        PROJECTS\nBuilt a library management portal";

    #[test]
    fn test_partial_resume_scores_47() {
        let score = score_resume(PARTIAL_RESUME, Some(8.2), None);
        assert_eq!(score.section_score, 24.0);
        assert_eq!(score.skill_score, 8.0);
        assert_eq!(score.gpa_score, 15.0);
        assert_eq!(score.total_score, 47.0);
        assert_eq!(score.detected_skills, vec!["python", "sql"]);
        assert_eq!(score.missing_sections, vec!["experience", "certifications"]);
        assert!(score
            .feedback
            .contains("Add these sections: experience, certifications."));
        assert!(score.feedback.contains("Add more technical skills"));
        assert!(score.feedback.contains("quantifiable results"));
    }

    #[test]
    fn test_full_resume_is_bounded_at_100() {
        let text = "education skills projects experience certifications \
            python java c++ sql html css javascript ml ai data network cloud";
        let score = score_resume(text, Some(9.4), None);
        assert_eq!(score.detected_skills.len(), 12);
        assert_eq!(score.skill_score, 40.0);
        assert_eq!(score.total_score, 100.0);
        assert_eq!(score.feedback, "Resume looks strong!");
    }

    #[test]
    fn test_skills_match_as_substrings() {
        let score = score_resume("Skills: JavaScript, Networking, Databases, NodeJS", None, None);
        assert_eq!(
            score.detected_skills,
            vec!["java", "javascript", "data", "network", "node"]
        );
        assert_eq!(score.skill_score, 20.0);
    }

    #[test]
    fn test_gpa_tiers() {
        assert_eq!(gpa_bonus(Some(9.0)), 20.0);
        assert_eq!(gpa_bonus(Some(8.99)), 15.0);
        assert_eq!(gpa_bonus(Some(7.0)), 10.0);
        assert_eq!(gpa_bonus(Some(6.9)), 0.0);
        assert_eq!(gpa_bonus(None), 0.0);
    }

    #[test]
    fn test_department_remark_appended() {
        let score = score_resume("", None, Some(Department::Ece));
        assert!(score.feedback.ends_with("tailor your projects accordingly."));
        assert!(score.feedback.contains("(ECE)"));
        assert_eq!(score.total_score, 0.0);
    }

    #[tokio::test]
    async fn test_keyword_scorer_backend_label() {
        let input = ResumeInput {
            text: PARTIAL_RESUME,
            cgpa: None,
            department: None,
        };
        let score = KeywordResumeScorer.score(&input).await.unwrap();
        assert_eq!(score.scorer_backend, "keyword");
        assert_eq!(score.total_score, 32.0);
    }

    #[test]
    fn test_readiness_band_boundaries() {
        assert_eq!(ReadinessBand::from_score(85.0), ReadinessBand::HighlyReady);
        assert_eq!(ReadinessBand::from_score(84.99), ReadinessBand::ModeratelyReady);
        assert_eq!(ReadinessBand::from_score(70.0), ReadinessBand::ModeratelyReady);
        assert_eq!(ReadinessBand::from_score(69.99), ReadinessBand::ImprovementNeeded);
        assert_eq!(ReadinessBand::from_score(0.0).message(), "Improvement needed.");
    }

    #[test]
    fn test_placement_readiness_blend() {
        // 47 * 0.6 + 82 * 0.4
        assert_eq!(placement_readiness(47.0, Some(8.2)), 61.0);
        assert_eq!(placement_readiness(100.0, Some(10.0)), 100.0);
        assert_eq!(placement_readiness(50.0, None), 30.0);

        let assessed = PlacementReadiness::assess(90.0, Some(7.5));
        assert_eq!(assessed.readiness, 84.0);
        assert_eq!(assessed.band, ReadinessBand::HighlyReady);
        assert_eq!(assessed.message, "Highly placement-ready.");
    }
}
