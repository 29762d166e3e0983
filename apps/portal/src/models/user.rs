use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    Student,
    #[serde(rename = "HOD")]
    #[sqlx(rename = "HOD")]
    Hod,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Hod => "HOD",
            Role::Admin => "Admin",
        }
    }

    /// Username prefix for generated accounts: first three letters, upper-cased.
    pub fn username_prefix(&self) -> &'static str {
        match self {
            Role::Student => "STU",
            Role::Hod => "HOD",
            Role::Admin => "ADM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Academic departments known to the portal. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Department {
    #[serde(rename = "CSE")]
    #[sqlx(rename = "CSE")]
    Cse,
    #[serde(rename = "ECE")]
    #[sqlx(rename = "ECE")]
    Ece,
    #[serde(rename = "EEE")]
    #[sqlx(rename = "EEE")]
    Eee,
    #[serde(rename = "MECH")]
    #[sqlx(rename = "MECH")]
    Mech,
    #[serde(rename = "CIVIL")]
    #[sqlx(rename = "CIVIL")]
    Civil,
    #[serde(rename = "AI&DS")]
    #[sqlx(rename = "AI&DS")]
    AiDs,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Cse,
        Department::Ece,
        Department::Eee,
        Department::Mech,
        Department::Civil,
        Department::AiDs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Cse => "CSE",
            Department::Ece => "ECE",
            Department::Eee => "EEE",
            Department::Mech => "MECH",
            Department::Civil => "CIVIL",
            Department::AiDs => "AI&DS",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Unknown department '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub department: Option<Department>,
}
