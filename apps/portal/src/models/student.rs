use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProfileRow {
    pub id: i64,
    pub username: String,
    pub reg_no: Option<String>,
    pub cgpa: Option<f64>,
    pub placed: bool,
    pub package: f64,
}

/// One confirmed hiring event. The ledger is append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlacementRow {
    pub id: i64,
    pub username: String,
    pub company: String,
    pub package: f64,
    pub placed_on: DateTime<Utc>,
}
