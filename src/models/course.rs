use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog listing row: a course plus per-user aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lesson_count: i64,
    pub completed: bool,
}
