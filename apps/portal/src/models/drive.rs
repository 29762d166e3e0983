use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::Department;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Selected,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriveRow {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub package: f64,
    /// `None` means the drive is open to every department.
    pub target_department: Option<Department>,
    pub drive_date: NaiveDate,
    pub deadline: NaiveDate,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DriveRow {
    pub fn is_open_to(&self, department: Option<Department>) -> bool {
        match self.target_department {
            None => true,
            Some(target) => department == Some(target),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: i64,
    pub username: String,
    pub drive_id: i64,
    pub applied_on: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub remarks: Option<String>,
}

/// An application joined with the drive it targets, as shown to the student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentApplicationRow {
    pub id: i64,
    pub drive_id: i64,
    pub company: String,
    pub role: String,
    pub package: f64,
    pub drive_date: NaiveDate,
    pub deadline: NaiveDate,
    pub applied_on: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub remarks: Option<String>,
}
